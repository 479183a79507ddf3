//! Stdlib locator - finds the Go standard library sources at runtime.
//!
//! Search order:
//! 1. $PROXYZ_STDLIB_PATH environment variable
//! 2. $GOROOT/src
//! 3. /usr/local/go/src (official tarball layout)
//! 4. /usr/lib/go/src (distribution packages)

use std::path::{Path, PathBuf};

/// Result of stdlib location search
#[derive(Debug, Clone)]
pub struct StdlibLocation {
    pub path: PathBuf,
    pub source: LocationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    EnvVar,
    GoRoot,
    Tarball,
    Distribution,
}

impl std::fmt::Display for StdlibLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.path.display(), self.source)
    }
}

/// Locator for finding the stdlib directory
pub struct StdlibLocator;

impl StdlibLocator {
    /// Locate the stdlib directory from the process environment.
    pub fn locate() -> Option<StdlibLocation> {
        Self::locate_with(|name| std::env::var(name).ok())
    }

    /// Locate the stdlib directory, reading variables through `env`.
    pub fn locate_with(env: impl Fn(&str) -> Option<String>) -> Option<StdlibLocation> {
        let candidates = [
            (
                env("PROXYZ_STDLIB_PATH").map(PathBuf::from),
                LocationSource::EnvVar,
            ),
            (
                env("GOROOT").map(|root| Path::new(&root).join("src")),
                LocationSource::GoRoot,
            ),
            (
                Some(PathBuf::from("/usr/local/go/src")),
                LocationSource::Tarball,
            ),
            (
                Some(PathBuf::from("/usr/lib/go/src")),
                LocationSource::Distribution,
            ),
        ];

        candidates.into_iter().find_map(|(path, source)| {
            let path = path?;
            Self::is_valid_stdlib(&path).then_some(StdlibLocation { path, source })
        })
    }

    /// Check if a directory looks like a valid stdlib
    fn is_valid_stdlib(path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_does_not_panic() {
        let _result = StdlibLocator::locate();
    }

    #[test]
    fn test_is_valid_stdlib_nonexistent() {
        assert!(!StdlibLocator::is_valid_stdlib(Path::new(
            "/nonexistent/path/xyz123"
        )));
    }

    #[test]
    fn env_var_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let goroot = tempfile::tempdir().unwrap();
        std::fs::create_dir(goroot.path().join("src")).unwrap();
        let explicit = dir.path().to_string_lossy().into_owned();
        let root = goroot.path().to_string_lossy().into_owned();

        let location = StdlibLocator::locate_with(|name| match name {
            "PROXYZ_STDLIB_PATH" => Some(explicit.clone()),
            "GOROOT" => Some(root.clone()),
            _ => None,
        })
        .unwrap();
        assert_eq!(location.source, LocationSource::EnvVar);
        assert_eq!(location.path, dir.path());
    }

    #[test]
    fn goroot_src_is_used_when_env_var_is_invalid() {
        let goroot = tempfile::tempdir().unwrap();
        std::fs::create_dir(goroot.path().join("src")).unwrap();
        let root = goroot.path().to_string_lossy().into_owned();

        let location = StdlibLocator::locate_with(|name| match name {
            "PROXYZ_STDLIB_PATH" => Some("/nonexistent/path/xyz123".to_string()),
            "GOROOT" => Some(root.clone()),
            _ => None,
        })
        .unwrap();
        assert_eq!(location.source, LocationSource::GoRoot);
        assert_eq!(location.path, goroot.path().join("src"));
    }
}
