//! proxyz semantic core: loads Go packages through a module service,
//! resolves identifiers file by file, and flattens named types into the
//! method sets a wrapper generator needs.

pub mod errors;
pub mod method_set;
pub mod module;
pub mod type_display;

// Internal modules (not part of the public API)
pub(crate) mod resolve;
pub(crate) mod scope;
pub(crate) mod universe;

pub use errors::{ResolveError, ServiceError};
pub use method_set::{Method, MethodSet};
pub use module::{
    InMemoryModules, LocationSource, ModuleDescriptor, ModuleService, ParsedFile, SourceTree,
    StdlibLocation, StdlibLocator,
};
pub use type_display::{ModuleRef, TypeTemplate};

use module::Loader;

/// Method set resolution over one module service. Loaded modules, objects
/// and bindings are cached for the engine's lifetime.
pub struct Engine<S> {
    loader: Loader<S>,
}

impl<S: ModuleService> Engine<S> {
    pub fn new(service: S) -> Self {
        Self {
            loader: Loader::new(service),
        }
    }

    /// Flatten `type_name`, declared in the module matched by `reference`,
    /// into its exported method set.
    #[tracing::instrument(skip(self))]
    pub fn build_method_set(
        &mut self,
        reference: &str,
        type_name: &str,
    ) -> Result<MethodSet, ResolveError> {
        let module = self.loader.load(None, reference)?;
        method_set::build(&mut self.loader, &module, reference, type_name)
    }

    pub fn service(&self) -> &S {
        self.loader.service()
    }

    /// Number of modules loaded so far.
    pub fn module_count(&self) -> usize {
        self.loader.module_count()
    }
}
