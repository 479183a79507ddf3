// src/commands/methods.rs

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use proxyz_sema::{Engine, MethodSet, SourceTree, StdlibLocator};

use crate::cli::{ColorMode, OutputFormat, RootArg};
use crate::errors::render_resolve_error;

/// Options for `proxyz methods`
pub struct MethodsOptions<'a> {
    pub format: OutputFormat,
    pub roots: &'a [RootArg],
    pub stdlib: Option<&'a Path>,
    pub dir: Option<&'a Path>,
    pub color: ColorMode,
}

/// Resolve and print the method set of `type_name` in the package matched
/// by `pattern`.
pub fn print_methods(pattern: &str, type_name: &str, options: MethodsOptions<'_>) -> ExitCode {
    let dir = match options.dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("error: could not read current directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let tree = source_tree(&dir, options.roots, options.stdlib);
    let mut engine = Engine::new(tree);
    let set = match engine.build_method_set(pattern, type_name) {
        Ok(set) => set,
        Err(e) => {
            render_resolve_error(e, options.color);
            return ExitCode::FAILURE;
        }
    };

    match options.format {
        OutputFormat::Text => print!("{}", render_text(&set)),
        OutputFormat::Json => match serde_json::to_string_pretty(&set) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize method set: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn source_tree(dir: &Path, roots: &[RootArg], stdlib: Option<&Path>) -> SourceTree {
    let mut tree = SourceTree::new(dir);
    for root in roots {
        tree = tree.with_root(&root.prefix, &root.dir);
    }
    let stdlib: Option<PathBuf> = stdlib
        .map(Path::to_path_buf)
        .or_else(|| StdlibLocator::locate().map(|loc| loc.path));
    if let Some(stdlib) = stdlib {
        tracing::debug!(stdlib = %stdlib.display(), "using standard library");
        tree = tree.with_stdlib(stdlib);
    }
    tree
}

/// `type <identity>.<Type> (interface|concrete)` followed by one line per
/// method.
pub fn render_text(set: &MethodSet) -> String {
    let kind = if set.type_is_interface {
        "interface"
    } else {
        "concrete"
    };
    let mut out = format!("type {}.{} ({kind})\n", set.module.path, set.type_name);
    for method in &set.methods {
        out.push_str(&method.render_from(&set.module));
        out.push('\n');
    }
    out
}
