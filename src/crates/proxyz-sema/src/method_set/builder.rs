// src/crates/proxyz-sema/src/method_set/builder.rs
//
// Recursive flattening of a named type into its exported methods.
//
// `depth` is 0 for the subject and for types reached through struct
// embedding, and at least 1 for types reached through a defined-type chain
// or interface embedding. Direct (receiver) methods are only collected at
// depth 0: a defined type keeps its underlying type's structure but not its
// methods.

use std::rc::Rc;

use proxyz_frontend::{Decl, FieldGroup, Ident, InterfaceElem, Signature, Symbol, TypeExpr, TypeSpec};
use proxyz_identity::{ModuleId, ObjectId};

use super::{Method, MethodList, MethodSet};
use crate::errors::ResolveError;
use crate::module::{Loader, Module, ModuleService};
use crate::scope::{Object, ObjectKind, Origin};
use crate::type_display::{ModuleRef, TypeFormatter, TypeTemplate};
use crate::universe::{Builtin, is_exported};

/// Depth used for embedded interfaces. Only suppresses the receiver scan.
const EMBEDDED_INTERFACE_DEPTH: usize = 1;

/// The declared shape of a named type, parentheses removed.
#[derive(Debug, Clone, Copy)]
enum TypeShape<'a> {
    /// `type A = B`
    Alias(&'a TypeExpr),
    /// `type A B`
    Defined(&'a TypeExpr),
    Interface(&'a [InterfaceElem]),
    Struct(&'a [FieldGroup]),
    /// `type A = G[int]` or `type A G[int]`
    Instance,
    /// Pointer, slice, array, map, channel and function types
    Opaque,
}

impl<'a> TypeShape<'a> {
    fn of(spec: &'a TypeSpec) -> Self {
        match spec.ty.unparen() {
            ty @ (TypeExpr::Name(_) | TypeExpr::Qualified { .. }) => {
                if spec.is_alias {
                    TypeShape::Alias(ty)
                } else {
                    TypeShape::Defined(ty)
                }
            }
            TypeExpr::Interface(elems) => TypeShape::Interface(elems),
            TypeExpr::Struct(fields) => TypeShape::Struct(fields),
            TypeExpr::Instance { .. } => TypeShape::Instance,
            _ => TypeShape::Opaque,
        }
    }
}

/// Build the method set of `type_name` declared in `module`.
pub(crate) fn build<S: ModuleService>(
    loader: &mut Loader<S>,
    module: &Module,
    reference: &str,
    type_name: &str,
) -> Result<MethodSet, ResolveError> {
    let mut builder = Builder {
        loader,
        path: Vec::new(),
    };
    let mut methods = MethodList::default();
    let mut is_interface = false;
    builder.resolve_type(module.id, type_name, 0, &mut methods, &mut is_interface)?;

    let methods = methods.into_vec();
    tracing::debug!(
        module = %module.identity,
        %type_name,
        methods = methods.len(),
        is_interface,
        "built method set"
    );
    Ok(MethodSet {
        reference: reference.to_string(),
        module: module.module_ref(),
        type_name: type_name.to_string(),
        methods,
        type_is_interface: is_interface,
    })
}

struct Builder<'l, S> {
    loader: &'l mut Loader<S>,
    /// Types currently being flattened, outermost first
    path: Vec<ObjectId>,
}

impl<S: ModuleService> Builder<'_, S> {
    /// Look `name` up in the declaration scope of `module` and flatten it.
    fn resolve_type(
        &mut self,
        module: ModuleId,
        name: &str,
        depth: usize,
        methods: &mut MethodList,
        is_interface: &mut bool,
    ) -> Result<bool, ResolveError> {
        self.loader.resolve(module)?;
        let owner = Rc::clone(self.loader.module(module));
        let object = self
            .loader
            .interner
            .lookup(name)
            .and_then(|symbol| self.loader.scopes.get(owner.scope).get(symbol));
        let Some(object) = object else {
            return Err(ResolveError::TypeNotFound {
                module: owner.identity.clone(),
                name: name.to_string(),
            });
        };
        if self.loader.objects.get(object).kind != ObjectKind::Type {
            return Err(ResolveError::NotAType {
                module: owner.identity.clone(),
                name: name.to_string(),
            });
        }
        self.flatten_object(object, depth, methods, is_interface)
    }

    /// Returns true when the object has a terminal (interface) shape.
    fn flatten_object(
        &mut self,
        object: ObjectId,
        depth: usize,
        methods: &mut MethodList,
        is_interface: &mut bool,
    ) -> Result<bool, ResolveError> {
        let Object { name, origin, .. } = self.loader.objects.get(object).clone();
        match origin {
            Origin::Universe => Ok(Self::flatten_builtin(
                self.loader.interner.resolve(name),
                methods,
                is_interface,
            )),
            Origin::Import { .. } => Err(ResolveError::invariant(format!(
                "module name '{}' used as a type",
                self.loader.interner.resolve(name)
            ))),
            Origin::Decl { module, file, decl } => {
                if self.path.contains(&object) {
                    return Err(self.cycle(object));
                }
                self.loader.resolve(module)?;
                let owner = Rc::clone(self.loader.module(module));
                let Decl::Type(spec) = &owner.files[file].ast.decls[decl] else {
                    return Err(ResolveError::NotAType {
                        module: owner.identity.clone(),
                        name: self.loader.interner.resolve(name).to_string(),
                    });
                };
                if !spec.type_params.is_empty() {
                    return Err(self.generic(&owner, spec.name.name));
                }

                tracing::trace!(
                    module = %owner.identity,
                    ty = self.loader.interner.resolve(name),
                    depth,
                    "flattening type"
                );
                self.path.push(object);
                let result =
                    self.flatten_decl(&owner, file, object, spec, depth, methods, is_interface);
                self.path.pop();
                result
            }
        }
    }

    fn flatten_builtin(name: &str, methods: &mut MethodList, is_interface: &mut bool) -> bool {
        match Builtin::classify(name) {
            Builtin::Error => {
                *is_interface = true;
                methods.add(Method {
                    name: "Error".to_string(),
                    arg_names: Vec::new(),
                    arg_types: Vec::new(),
                    result_types: vec![TypeTemplate {
                        format: "string".to_string(),
                        modules: Vec::new(),
                    }],
                    is_variadic: false,
                });
                true
            }
            Builtin::Any => {
                *is_interface = true;
                true
            }
            Builtin::Plain => false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn flatten_decl(
        &mut self,
        owner: &Module,
        file: usize,
        object: ObjectId,
        spec: &TypeSpec,
        depth: usize,
        methods: &mut MethodList,
        is_interface: &mut bool,
    ) -> Result<bool, ResolveError> {
        match TypeShape::of(spec) {
            TypeShape::Alias(target) => {
                let target = self.target(owner, file, target)?;
                return self.flatten_object(target, depth, methods, is_interface);
            }
            TypeShape::Defined(target) => {
                let target = self.target(owner, file, target)?;
                if self.flatten_object(target, depth + 1, methods, is_interface)? {
                    return Ok(true);
                }
            }
            TypeShape::Interface(elems) => {
                *is_interface = true;
                self.interface_elems(owner, file, spec, elems, methods)?;
                return Ok(true);
            }
            TypeShape::Struct(fields) => {
                self.embedded_fields(owner, file, spec, fields, methods)?;
            }
            TypeShape::Instance => return Err(self.generic(owner, spec.name.name)),
            TypeShape::Opaque => {}
        }

        if depth >= 1 {
            return Ok(false);
        }
        self.direct_methods(owner, object, methods);
        Ok(false)
    }

    fn interface_elems(
        &mut self,
        owner: &Module,
        file: usize,
        spec: &TypeSpec,
        elems: &[InterfaceElem],
        methods: &mut MethodList,
    ) -> Result<(), ResolveError> {
        for elem in elems {
            match elem {
                InterfaceElem::Method { name, sig } => {
                    let name = self.loader.interner.resolve(name.name);
                    if is_exported(name) {
                        let method = self.method(owner, file, name, sig);
                        methods.add(method);
                    }
                }
                InterfaceElem::Embed(ty) => match ty.unparen() {
                    ty @ (TypeExpr::Name(_) | TypeExpr::Qualified { .. }) => {
                        let target = self.target(owner, file, ty)?;
                        let mut scratch = false;
                        self.flatten_object(target, EMBEDDED_INTERFACE_DEPTH, methods, &mut scratch)?;
                    }
                    TypeExpr::Interface(inner) => {
                        self.interface_elems(owner, file, spec, inner, methods)?
                    }
                    TypeExpr::Instance { .. } => return Err(self.generic(owner, spec.name.name)),
                    _ => {}
                },
                InterfaceElem::Union(_) => {}
            }
        }
        Ok(())
    }

    /// Promote the methods of every embedded field into `methods`.
    fn embedded_fields(
        &mut self,
        owner: &Module,
        file: usize,
        spec: &TypeSpec,
        fields: &[FieldGroup],
        methods: &mut MethodList,
    ) -> Result<(), ResolveError> {
        for field in fields.iter().filter(|f| f.is_embedded()) {
            let (through_pointer, ty) = match field.ty.unparen() {
                TypeExpr::Pointer(inner) => (true, inner.unparen()),
                ty => (false, ty),
            };
            let target = match ty {
                TypeExpr::Name(_) | TypeExpr::Qualified { .. } => self.target(owner, file, ty)?,
                TypeExpr::Instance { .. } => return Err(self.generic(owner, spec.name.name)),
                _ => continue,
            };
            if self.path.contains(&target) {
                if through_pointer {
                    tracing::trace!("skipping recursive embedding through pointer");
                    continue;
                }
                return Err(self.cycle(target));
            }
            let mut scratch = false;
            self.flatten_object(target, 0, methods, &mut scratch)?;
        }
        Ok(())
    }

    /// Exported methods declared with `object` (or `*object`) as receiver.
    fn direct_methods(&self, owner: &Module, object: ObjectId, methods: &mut MethodList) {
        for (file_index, file) in owner.files.iter().enumerate() {
            for func in file.ast.funcs() {
                let Some(recv) = &func.recv else {
                    continue;
                };
                let mut ty = recv.ty.unparen();
                if let TypeExpr::Pointer(inner) = ty {
                    ty = inner.unparen();
                }
                let TypeExpr::Name(ident) = ty else {
                    continue;
                };
                if self.loader.bindings.get(owner.id, file_index, ident) != Some(object) {
                    continue;
                }
                let name = self.loader.interner.resolve(func.name.name);
                if is_exported(name) {
                    methods.add(self.method(owner, file_index, name, &func.sig));
                }
            }
        }
    }

    /// The object a `Name` or `Qualified` type expression is bound to.
    fn target(&self, owner: &Module, file: usize, ty: &TypeExpr) -> Result<ObjectId, ResolveError> {
        let ident = match ty {
            TypeExpr::Name(ident) | TypeExpr::Qualified { name: ident, .. } => ident,
            _ => return Err(ResolveError::invariant("type target is not a name")),
        };
        self.loader
            .bindings
            .get(owner.id, file, ident)
            .ok_or_else(|| {
                ResolveError::invariant(format!(
                    "'{}' in {} was never bound",
                    self.loader.interner.resolve(ident.name),
                    owner.identity
                ))
            })
    }

    fn method(&self, owner: &Module, file: usize, name: &str, sig: &Signature) -> Method {
        let interner = &self.loader.interner;
        let formatter =
            TypeFormatter::new(interner, |ident: &Ident| self.declared_in(owner.id, file, ident));

        let mut arg_names = Vec::new();
        let mut arg_types = Vec::new();
        for group in &sig.params {
            let ty = match &group.ty {
                TypeExpr::Ellipsis(elem) => elem.as_ref(),
                ty => ty,
            };
            let template = formatter.format(ty);
            if group.names.is_empty() {
                arg_types.push(template);
                continue;
            }
            for ident in &group.names {
                arg_names.push(interner.resolve(ident.name).to_string());
                arg_types.push(template.clone());
            }
        }

        let mut result_types = Vec::new();
        for group in &sig.results {
            let template = formatter.format(&group.ty);
            let count = group.names.len().max(1);
            result_types.extend(std::iter::repeat_n(template, count));
        }

        Method {
            name: name.to_string(),
            arg_names,
            arg_types,
            result_types,
            is_variadic: sig.is_variadic(),
        }
    }

    /// The module that declared the object `ident` is bound to.
    fn declared_in(&self, module: ModuleId, file: usize, ident: &Ident) -> Option<ModuleRef> {
        let object = self.loader.bindings.get(module, file, ident)?;
        let owner = self.loader.objects.get(object).owner()?;
        Some(self.loader.module(owner).module_ref())
    }

    fn describe(&self, object: ObjectId) -> String {
        let object = self.loader.objects.get(object);
        let name = self.loader.interner.resolve(object.name);
        match object.owner() {
            Some(module) => format!("{}.{name}", self.loader.module(module).identity),
            None => name.to_string(),
        }
    }

    fn cycle(&self, reentered: ObjectId) -> ResolveError {
        let start = self
            .path
            .iter()
            .position(|o| *o == reentered)
            .unwrap_or(0);
        let cycle = self.path[start..]
            .iter()
            .chain(std::iter::once(&reentered))
            .map(|o| self.describe(*o))
            .collect();
        ResolveError::TypeCycle { cycle }
    }

    fn generic(&self, owner: &Module, name: Symbol) -> ResolveError {
        ResolveError::GenericType {
            module: owner.identity.clone(),
            name: self.loader.interner.resolve(name).to_string(),
        }
    }
}
