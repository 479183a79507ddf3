//! A module service over Go source directories on disk.

use std::path::{Component, Path, PathBuf};

use proxyz_frontend::Interner;

use super::service::{ModuleDescriptor, ModuleService, import_paths, parse_sources};
use crate::errors::ServiceError;

/// Directory names never searched by `...` patterns.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

#[derive(Debug, Clone)]
struct Root {
    prefix: String,
    dir: PathBuf,
}

/// Source roots (`import prefix = directory`), an optional standard library
/// directory, and the working directory local patterns are relative to.
#[derive(Debug, Clone)]
pub struct SourceTree {
    dir: PathBuf,
    roots: Vec<Root>,
    stdlib: Option<PathBuf>,
}

impl SourceTree {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: canonical(dir.as_ref()),
            roots: Vec::new(),
            stdlib: None,
        }
    }

    pub fn with_root(mut self, prefix: &str, dir: impl AsRef<Path>) -> Self {
        self.add_root(prefix, dir.as_ref());
        self
    }

    pub fn with_stdlib(mut self, dir: impl AsRef<Path>) -> Self {
        self.stdlib = Some(canonical(dir.as_ref()));
        self
    }

    /// Configured roots as `(prefix, directory)`, including discovered ones.
    pub fn roots(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.roots.iter().map(|r| (r.prefix.as_str(), r.dir.as_path()))
    }

    fn add_root(&mut self, prefix: &str, dir: &Path) {
        let dir = canonical(dir);
        if self.roots.iter().any(|r| r.dir == dir) {
            return;
        }
        tracing::debug!(%prefix, dir = %dir.display(), "adding source root");
        self.roots.push(Root {
            prefix: prefix.trim_end_matches('/').to_string(),
            dir,
        });
    }

    /// The root whose directory contains `dir`, deepest first.
    fn root_containing(&self, dir: &Path) -> Option<&Root> {
        self.roots
            .iter()
            .filter(|r| dir.starts_with(&r.dir))
            .max_by_key(|r| r.dir.components().count())
    }

    /// Canonical identity of a package directory.
    fn identity_of(&self, dir: &Path) -> String {
        if let Some(root) = self.root_containing(dir)
            && let Ok(rel) = dir.strip_prefix(&root.dir)
        {
            return join_identity(&root.prefix, rel);
        }
        if let Some(stdlib) = &self.stdlib
            && let Ok(rel) = dir.strip_prefix(stdlib)
        {
            return join_identity("", rel);
        }
        format!("_{}", slash_path(dir))
    }

    /// Directory of a canonical identity or plain import path.
    fn dir_of(&self, identity: &str) -> Option<PathBuf> {
        if let Some(abs) = identity.strip_prefix('_').filter(|p| p.starts_with('/')) {
            let dir = PathBuf::from(abs);
            return dir.is_dir().then_some(dir);
        }
        let rooted = self
            .roots
            .iter()
            .filter_map(|root| {
                let rest = if identity == root.prefix {
                    ""
                } else if root.prefix.is_empty() {
                    identity
                } else {
                    identity.strip_prefix(&root.prefix)?.strip_prefix('/')?
                };
                Some((root.prefix.len(), root.dir.join(rest)))
            })
            .filter(|(_, dir)| dir.is_dir())
            .max_by_key(|(len, _)| *len)
            .map(|(_, dir)| dir);
        rooted.or_else(|| {
            let dir = self.stdlib.as_ref()?.join(identity);
            dir.is_dir().then_some(dir)
        })
    }

    /// Resolve `path` imported from the package in `dir`: vendor directories
    /// from `dir` up to its root, then the standard library, then the roots.
    fn resolve_import(&self, dir: &Path, path: &str) -> Option<String> {
        let boundary = self.root_containing(dir).map(|r| r.dir.clone());
        let mut current = Some(dir);
        while let Some(candidate_dir) = current {
            if candidate_dir.file_name().is_some_and(|n| n == "vendor") {
                current = candidate_dir.parent();
                continue;
            }
            let candidate = candidate_dir.join("vendor").join(path);
            if has_go_files(&candidate) {
                return Some(self.identity_of(&candidate));
            }
            if boundary.as_deref() == Some(candidate_dir) {
                break;
            }
            current = candidate_dir.parent();
        }

        if let Some(stdlib) = &self.stdlib
            && has_go_files(&stdlib.join(path))
        {
            return Some(path.to_string());
        }
        let dir = self.dir_of(path)?;
        has_go_files(&dir).then(|| self.identity_of(&dir))
    }

    /// Register the module root of a directory outside every configured root
    /// by looking for `go.mod` upward.
    fn discover_root(&mut self, dir: &Path) -> Result<(), ServiceError> {
        if self.root_containing(dir).is_some()
            || self.stdlib.as_ref().is_some_and(|s| dir.starts_with(s))
        {
            return Ok(());
        }
        for ancestor in dir.ancestors() {
            let go_mod = ancestor.join("go.mod");
            if !go_mod.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&go_mod).map_err(|e| ServiceError::io(&go_mod, e))?;
            if let Some(module) = module_path(&text) {
                self.add_root(&module, ancestor);
            }
            break;
        }
        Ok(())
    }

    fn describe(&self, dir: &Path, interner: &mut Interner) -> Result<ModuleDescriptor, ServiceError> {
        let identity = self.identity_of(dir);
        let mut sources = Vec::new();
        for file in go_files(dir)? {
            let source = std::fs::read_to_string(&file).map_err(|e| ServiceError::io(&file, e))?;
            if is_ignored(&source) {
                continue;
            }
            sources.push((file.display().to_string(), source));
        }
        let mut descriptor = parse_sources(
            &identity,
            sources.iter().map(|(path, source)| (path.as_str(), source.as_str())),
            interner,
        );

        for path in import_paths(&descriptor) {
            match self.resolve_import(dir, &path) {
                Some(target) => {
                    descriptor.dependencies.insert(path, target);
                }
                None => descriptor
                    .errors
                    .push(format!("cannot find package \"{path}\" imported by {identity}")),
            }
        }
        tracing::debug!(
            %identity,
            files = descriptor.files.len(),
            dependencies = descriptor.dependencies.len(),
            "described package"
        );
        Ok(descriptor)
    }
}

impl ModuleService for SourceTree {
    fn load_pattern(
        &mut self,
        pattern: &str,
        interner: &mut Interner,
    ) -> Result<Vec<ModuleDescriptor>, ServiceError> {
        let (base, recursive) = match pattern.strip_suffix("...") {
            Some(base) => (base.trim_end_matches('/'), true),
            None => (pattern, false),
        };
        if base.is_empty() {
            return Err(ServiceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern matches every package".to_string(),
            });
        }

        let start = if is_local(base) {
            let dir = self.dir.join(base);
            let dir = std::fs::canonicalize(&dir).map_err(|e| ServiceError::io(&dir, e))?;
            self.discover_root(&dir)?;
            dir
        } else {
            match self.dir_of(base) {
                Some(dir) => dir,
                None => return Ok(Vec::new()),
            }
        };

        let mut dirs = Vec::new();
        if recursive {
            walk(&start, &mut dirs)?;
        } else if has_go_files(&start) {
            dirs.push(start);
        }
        dirs.iter().map(|dir| self.describe(dir, interner)).collect()
    }

    fn load_module(
        &mut self,
        identity: &str,
        interner: &mut Interner,
    ) -> Result<ModuleDescriptor, ServiceError> {
        let dir = self
            .dir_of(identity)
            .ok_or_else(|| ServiceError::UnknownModule {
                identity: identity.to_string(),
            })?;
        self.describe(&dir, interner)
    }
}

fn canonical(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

fn is_local(pattern: &str) -> bool {
    pattern == "."
        || pattern == ".."
        || pattern.starts_with("./")
        || pattern.starts_with("../")
        || Path::new(pattern).is_absolute()
}

fn slash_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => {}
            Component::Normal(part) => {
                out.push('/');
                out.push_str(&part.to_string_lossy());
            }
            _ => {}
        }
    }
    out
}

fn join_identity(prefix: &str, rel: &Path) -> String {
    let rel = slash_path(rel);
    if prefix.is_empty() {
        rel.trim_start_matches('/').to_string()
    } else {
        format!("{prefix}{rel}")
    }
}

/// The `module` directive of a go.mod file.
fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

fn is_go_file(name: &str) -> bool {
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('.')
        && !name.starts_with('_')
}

/// A `//go:build ignore` line before the package clause excludes a file.
fn is_ignored(source: &str) -> bool {
    source
        .lines()
        .take_while(|line| !line.starts_with("package"))
        .any(|line| line.trim() == "//go:build ignore")
}

/// Go source files of a package directory, sorted by name.
fn go_files(dir: &Path) -> Result<Vec<PathBuf>, ServiceError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ServiceError::io(dir, e))? {
        let entry = entry.map_err(|e| ServiceError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.file_name().and_then(|n| n.to_str()).is_some_and(is_go_file) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_go_files(dir: &Path) -> bool {
    dir.is_dir() && go_files(dir).is_ok_and(|files| !files.is_empty())
}

/// Every package directory at or below `dir`, in sorted order.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ServiceError> {
    if has_go_files(dir) {
        out.push(dir.to_path_buf());
    }
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ServiceError::io(dir, e))? {
        let entry = entry.map_err(|e| ServiceError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir()
            && !SKIPPED_DIRS.contains(&name)
            && !name.starts_with('.')
            && !name.starts_with('_')
        {
            children.push(path);
        }
    }
    children.sort();
    for child in children {
        walk(&child, out)?;
    }
    Ok(())
}
