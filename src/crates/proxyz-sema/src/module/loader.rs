//! The module cache. Modules are declared once per identity and resolved
//! once, on first use.

use std::rc::Rc;

use proxyz_frontend::{Decl, Ident, IdentId, Interner, ValueKind, ValueSpec};
use proxyz_identity::{ModuleId, ObjectId, ScopeId, Symbol};
use rustc_hash::{FxHashMap, FxHashSet};

use super::service::{ModuleDescriptor, ModuleService};
use super::{Module, import_path_of};
use crate::errors::ResolveError;
use crate::scope::{Object, ObjectKind, Objects, Origin, Scope, ScopeArena};
use crate::universe::PREDECLARED;

/// One identifier occurrence: `files[file]` of `module`, node `ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct IdentKey {
    pub module: ModuleId,
    pub file: usize,
    pub ident: IdentId,
}

/// Identifier occurrence -> the object it denotes.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    map: FxHashMap<IdentKey, ObjectId>,
}

impl Bindings {
    pub fn insert(&mut self, key: IdentKey, object: ObjectId) {
        self.map.insert(key, object);
    }

    pub fn get(&self, module: ModuleId, file: usize, ident: &Ident) -> Option<ObjectId> {
        self.map
            .get(&IdentKey {
                module,
                file,
                ident: ident.id,
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

pub(crate) struct Loader<S> {
    service: S,
    pub interner: Interner,
    modules: Vec<Rc<Module>>,
    by_identity: FxHashMap<String, ModuleId>,
    patterns: FxHashMap<String, ModuleId>,
    pub objects: Objects,
    pub scopes: ScopeArena,
    pub bindings: Bindings,
    universe: ScopeId,
    resolved: FxHashSet<ModuleId>,
}

impl<S: ModuleService> Loader<S> {
    pub fn new(service: S) -> Self {
        let mut interner = Interner::new();
        let mut objects = Objects::default();
        let mut scopes = ScopeArena::default();

        let mut universe = Scope::default();
        for (name, kind) in PREDECLARED {
            let name = interner.intern(name);
            let object = objects.alloc(Object {
                name,
                kind: *kind,
                origin: Origin::Universe,
            });
            universe.insert(name, object);
        }
        let universe = scopes.alloc(universe);

        Self {
            service,
            interner,
            modules: Vec::new(),
            by_identity: FxHashMap::default(),
            patterns: FxHashMap::default(),
            objects,
            scopes,
            bindings: Bindings::default(),
            universe,
            resolved: FxHashSet::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn module(&self, id: ModuleId) -> &Rc<Module> {
        &self.modules[id.index() as usize]
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Load and resolve a module. With no `from`, `reference` is a
    /// top-level pattern; otherwise it is an import path looked up in the
    /// dependency table of `from`.
    pub fn load(
        &mut self,
        from: Option<ModuleId>,
        reference: &str,
    ) -> Result<Rc<Module>, ResolveError> {
        let id = match from {
            None => self.declare_pattern(reference)?,
            Some(from) => self.declare_import(from, reference)?,
        };
        self.resolve(id)?;
        Ok(Rc::clone(self.module(id)))
    }

    /// Run scope resolution for `id` unless it already succeeded.
    pub fn resolve(&mut self, id: ModuleId) -> Result<(), ResolveError> {
        if self.resolved.contains(&id) {
            return Ok(());
        }
        tracing::debug!(module = %self.module(id).identity, "resolving module");
        crate::resolve::resolve_module(self, id)?;
        self.resolved.insert(id);
        Ok(())
    }

    fn declare_pattern(&mut self, pattern: &str) -> Result<ModuleId, ResolveError> {
        if let Some(&id) = self.patterns.get(pattern) {
            tracing::trace!(%pattern, "pattern cache hit");
            return Ok(id);
        }
        tracing::debug!(%pattern, "loading pattern");

        let mut found = self
            .service
            .load_pattern(pattern, &mut self.interner)
            .map_err(|e| ResolveError::module_load(pattern, e.to_string()))?;
        let descriptor = match found.len() {
            0 => return Err(ResolveError::module_load(pattern, "no modules matched")),
            1 => found.remove(0),
            n => {
                let identities: Vec<_> = found.iter().map(|d| d.identity.as_str()).collect();
                return Err(ResolveError::module_load(
                    pattern,
                    format!("matched {n} modules: {}", identities.join(", ")),
                ));
            }
        };

        let id = match self.by_identity.get(&descriptor.identity) {
            Some(&id) => id,
            None => self.declare(descriptor)?,
        };
        self.patterns.insert(pattern.to_string(), id);
        Ok(id)
    }

    /// Declare the module that `from` imports as `path`, without resolving it.
    pub fn declare_import(&mut self, from: ModuleId, path: &str) -> Result<ModuleId, ResolveError> {
        let module = self.module(from);
        if module.is_self_reference(path) {
            return Ok(from);
        }
        let Some(identity) = module.dependencies.get(path) else {
            return Err(ResolveError::module_load(
                path,
                format!("not in the dependency table of {}", module.identity),
            ));
        };
        let identity = identity.clone();
        self.declare_identity(&identity)
    }

    fn declare_identity(&mut self, identity: &str) -> Result<ModuleId, ResolveError> {
        if let Some(&id) = self.by_identity.get(identity) {
            tracing::trace!(%identity, "module cache hit");
            return Ok(id);
        }
        tracing::debug!(%identity, "loading module");
        let descriptor = self
            .service
            .load_module(identity, &mut self.interner)
            .map_err(|e| ResolveError::module_load(identity, e.to_string()))?;
        self.declare(descriptor)
    }

    /// Cache a descriptor as a module and build its declaration scope.
    fn declare(&mut self, descriptor: ModuleDescriptor) -> Result<ModuleId, ResolveError> {
        if !descriptor.errors.is_empty() {
            return Err(ResolveError::module_load(
                &descriptor.identity,
                descriptor.errors.join("; "),
            ));
        }

        let id = ModuleId::new(self.modules.len() as u32);
        let mut scope = Scope::with_outer(self.universe);
        let blank = self.interner.intern("_");
        let init = self.interner.intern("init");

        for (file_index, file) in descriptor.files.iter().enumerate() {
            for (decl_index, decl) in file.ast.decls.iter().enumerate() {
                let origin = Origin::Decl {
                    module: id,
                    file: file_index,
                    decl: decl_index,
                };
                let mut declare = |name: Symbol, kind: ObjectKind| {
                    if name == blank {
                        return;
                    }
                    if scope.get(name).is_none() {
                        let object = self.objects.alloc(Object { name, kind, origin });
                        scope.insert(name, object);
                    }
                };
                match decl {
                    Decl::Type(spec) => declare(spec.name.name, ObjectKind::Type),
                    Decl::Func(func) if func.recv.is_none() && func.name.name != init => {
                        declare(func.name.name, ObjectKind::Func)
                    }
                    Decl::Func(_) => {}
                    Decl::Value(ValueSpec { kind, names, .. }) => {
                        let kind = match kind {
                            ValueKind::Const => ObjectKind::Const,
                            ValueKind::Var => ObjectKind::Var,
                        };
                        for ident in names {
                            declare(ident.name, kind);
                        }
                    }
                }
            }
        }

        let scope = self.scopes.alloc(scope);
        let import_path = import_path_of(&descriptor.identity).to_string();
        tracing::debug!(
            identity = %descriptor.identity,
            %import_path,
            files = descriptor.files.len(),
            names = self.scopes.get(scope).len(),
            "declared module"
        );

        self.by_identity.insert(descriptor.identity.clone(), id);
        self.modules.push(Rc::new(Module {
            id,
            identity: descriptor.identity,
            import_path,
            name: descriptor.name,
            scope,
            files: descriptor.files,
            dependencies: descriptor.dependencies,
        }));
        Ok(id)
    }
}
