//! Modules: the service seam, the bundled services, and the loader cache.

mod loader;
mod locator;
mod memory;
mod service;
mod source_tree;

pub(crate) use loader::{IdentKey, Loader};
pub use locator::{LocationSource, StdlibLocation, StdlibLocator};
pub use memory::InMemoryModules;
pub use service::{CGO_PSEUDO_PACKAGE, ModuleDescriptor, ModuleService, ParsedFile};
pub use source_tree::SourceTree;

use proxyz_identity::{ModuleId, ScopeId};
use rustc_hash::FxHashMap;

use crate::type_display::ModuleRef;

/// A loaded module. Shared, immutable once declared.
#[derive(Debug)]
pub struct Module {
    pub id: ModuleId,
    /// Canonical identity as reported by the service
    pub identity: String,
    /// Identity with any vendor prefix removed
    pub import_path: String,
    /// Package name
    pub name: String,
    /// Top-level declarations of every file
    pub scope: ScopeId,
    pub files: Vec<ParsedFile>,
    pub dependencies: FxHashMap<String, String>,
}

impl Module {
    pub fn module_ref(&self) -> ModuleRef {
        ModuleRef {
            name: self.name.clone(),
            path: self.identity.clone(),
            import_path: self.import_path.clone(),
        }
    }

    /// Whether `reference` names this module itself.
    pub fn is_self_reference(&self, reference: &str) -> bool {
        reference == self.identity || reference == self.import_path
    }
}

/// Strip a vendor prefix from a canonical identity: `a/vendor/x/y` and
/// `vendor/x/y` both import as `x/y`. `_/...` identities are kept.
pub fn import_path_of(identity: &str) -> &str {
    if identity.starts_with("_/") {
        return identity;
    }
    if let Some(index) = identity.rfind("/vendor/") {
        return &identity[index + "/vendor/".len()..];
    }
    identity.strip_prefix("vendor/").unwrap_or(identity)
}

#[cfg(test)]
mod tests {
    use super::import_path_of;

    #[test]
    fn vendor_prefixes_are_stripped() {
        assert_eq!(import_path_of("example.com/m/vendor/x/y"), "x/y");
        assert_eq!(import_path_of("a/vendor/b/vendor/c"), "c");
        assert_eq!(import_path_of("vendor/golang.org/x/net"), "golang.org/x/net");
        assert_eq!(import_path_of("net/http"), "net/http");
        assert_eq!(import_path_of("_/tmp/vendor/x"), "_/tmp/vendor/x");
    }
}
