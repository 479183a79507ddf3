//! The module service seam: whatever turns a pattern or identity into
//! parsed source files plus a dependency table.

use proxyz_frontend::{Interner, Parser, SourceFile};
use rustc_hash::FxHashMap;

use crate::errors::ServiceError;

/// A parsed source file of a module.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path or name used in diagnostics
    pub path: String,
    pub ast: SourceFile,
}

/// What a service knows about one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleDescriptor {
    /// Canonical identity, e.g. `io`, `example.com/m/vendor/x/y`, `_/abs/dir`
    pub identity: String,
    /// Package name from the package clauses
    pub name: String,
    pub files: Vec<ParsedFile>,
    /// Import path as written in the files -> canonical identity
    pub dependencies: FxHashMap<String, String>,
    /// Module-level problems: parse errors, inconsistent package names,
    /// imports the service could not locate
    pub errors: Vec<String>,
}

pub trait ModuleService {
    /// Every module matched by a top-level pattern.
    fn load_pattern(
        &mut self,
        pattern: &str,
        interner: &mut Interner,
    ) -> Result<Vec<ModuleDescriptor>, ServiceError>;

    /// The module with the given canonical identity.
    fn load_module(
        &mut self,
        identity: &str,
        interner: &mut Interner,
    ) -> Result<ModuleDescriptor, ServiceError>;
}

/// Import path of cgo's pseudo-package. Files importing it are left out of
/// a module, as in a build with cgo disabled.
pub const CGO_PSEUDO_PACKAGE: &str = "C";

/// Parse a module's sources into a descriptor with an empty dependency
/// table. Parse failures and package-name mismatches are recorded in
/// `errors`; the failing file is left out. Cgo files are dropped silently.
pub(crate) fn parse_sources<'a>(
    identity: &str,
    sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    interner: &mut Interner,
) -> ModuleDescriptor {
    let mut descriptor = ModuleDescriptor {
        identity: identity.to_string(),
        ..ModuleDescriptor::default()
    };

    for (path, source) in sources {
        let mut parser = Parser::new(source, interner);
        let result = parser.parse_file();
        let lexer_errors = parser.take_lexer_errors();
        let package = parser.package_name();
        descriptor
            .errors
            .extend(lexer_errors.iter().map(|error| format!("{path}: {error}")));

        let agrees = match package {
            Some(package) => check_package(&mut descriptor, interner.resolve(package), path),
            None => true,
        };
        let ast = match result {
            Ok(ast) => ast,
            Err(e) => {
                tracing::debug!(%path, error = %e, "parse failed");
                descriptor.errors.push(format!("{path}:{e}"));
                continue;
            }
        };
        if ast.imports.iter().any(|i| i.path == CGO_PSEUDO_PACKAGE) {
            tracing::trace!(%path, "skipping cgo file");
            continue;
        }
        if agrees {
            descriptor.files.push(ParsedFile {
                path: path.to_string(),
                ast,
            });
        }
    }
    descriptor
}

/// Adopt the first package name seen; record any later file that disagrees.
fn check_package(descriptor: &mut ModuleDescriptor, package: &str, path: &str) -> bool {
    if descriptor.name.is_empty() {
        descriptor.name = package.to_string();
        return true;
    }
    if descriptor.name == package {
        return true;
    }
    descriptor.errors.push(format!(
        "found packages {} and {package} ({path}) in {}",
        descriptor.name, descriptor.identity
    ));
    false
}

/// Every import path used by the descriptor's files, in first-use order.
pub(crate) fn import_paths(descriptor: &ModuleDescriptor) -> Vec<String> {
    let mut seen = Vec::new();
    for file in &descriptor.files {
        for import in &file.ast.imports {
            if !seen.contains(&import.path) {
                seen.push(import.path.clone());
            }
        }
    }
    seen
}
