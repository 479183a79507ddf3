// src/crates/proxyz-sema/src/resolve.rs
//
// Per-file scope resolution: bind imports into a file scope, then bind
// every unresolved identifier and every qualified reference.

use proxyz_frontend::{Ident, ImportName, ImportSpec, LenPartKind, TypeExpr};
use proxyz_identity::{ModuleId, Symbol};

use crate::errors::ResolveError;
use crate::module::{IdentKey, Loader, Module, ModuleService, ParsedFile};
use crate::scope::{Object, ObjectKind, Origin, Scope};

#[tracing::instrument(skip(loader), fields(module = %id))]
pub(crate) fn resolve_module<S: ModuleService>(
    loader: &mut Loader<S>,
    id: ModuleId,
) -> Result<(), ResolveError> {
    let module = std::rc::Rc::clone(loader.module(id));
    for (file_index, file) in module.files.iter().enumerate() {
        let mut scope = Scope::with_outer(module.scope);
        for import in &file.ast.imports {
            bind_import(loader, &module, &mut scope, import)?;
        }

        for ident in &file.ast.unresolved {
            let Some(object) = loader.scopes.lookup(&scope, ident.name) else {
                return Err(undefined(loader, file, ident, None));
            };
            loader.bindings.insert(key(id, file_index, ident), object);
        }

        for (left, right) in qualified_refs(file) {
            bind_qualified(loader, &module, file_index, file, left, right)?;
        }
    }
    tracing::debug!(
        files = module.files.len(),
        bindings = loader.bindings.len(),
        "resolved module"
    );
    Ok(())
}

fn key(module: ModuleId, file: usize, ident: &Ident) -> IdentKey {
    IdentKey {
        module,
        file,
        ident: ident.id,
    }
}

fn bind_import<S: ModuleService>(
    loader: &mut Loader<S>,
    module: &Module,
    scope: &mut Scope,
    import: &ImportSpec,
) -> Result<(), ResolveError> {
    let target = loader.declare_import(module.id, &import.path)?;

    match import.name {
        Some(ImportName::Blank) => {}
        Some(ImportName::Dot) => {
            let merged: Vec<_> = loader.scopes.get(loader.module(target).scope).iter().collect();
            for (name, object) in merged {
                scope.insert(name, object);
            }
        }
        Some(ImportName::Alias(ident)) => {
            bind_alias(loader, scope, ident.name, target);
        }
        None => {
            let package = loader.module(target).name.clone();
            let name = loader.interner.intern(&package);
            bind_alias(loader, scope, name, target);
        }
    }
    Ok(())
}

fn bind_alias<S: ModuleService>(
    loader: &mut Loader<S>,
    scope: &mut Scope,
    name: Symbol,
    target: ModuleId,
) {
    let object = loader.objects.alloc(Object {
        name,
        kind: ObjectKind::Module,
        origin: Origin::Import { target },
    });
    scope.insert(name, object);
}

/// Every `alias.Name` in the file's declarations, including those inside
/// array lengths.
fn qualified_refs(file: &ParsedFile) -> Vec<(Ident, Ident)> {
    let mut refs = Vec::new();
    for decl in &file.ast.decls {
        decl.walk_types(&mut |ty| match ty {
            TypeExpr::Qualified { module, name } => refs.push((*module, *name)),
            TypeExpr::Array { len, .. } => {
                for part in &len.parts {
                    if let LenPartKind::Qualified { module, name } = &part.kind {
                        refs.push((*module, *name));
                    }
                }
            }
            _ => {}
        });
    }
    refs
}

fn bind_qualified<S: ModuleService>(
    loader: &mut Loader<S>,
    module: &Module,
    file_index: usize,
    file: &ParsedFile,
    left: Ident,
    right: Ident,
) -> Result<(), ResolveError> {
    let left_name = loader.interner.resolve(left.name).to_string();
    let Some(object) = loader.bindings.get(module.id, file_index, &left) else {
        return Err(ResolveError::invariant(format!(
            "qualifier '{left_name}' in {} was never bound",
            file.path
        )));
    };
    let Origin::Import { target } = loader.objects.get(object).origin else {
        return Err(ResolveError::invariant(format!(
            "'{left_name}' at {}:{}:{} is not an imported module",
            file.path, left.span.line, left.span.column
        )));
    };

    let target_scope = loader.module(target).scope;
    match loader.scopes.get(target_scope).get(right.name) {
        Some(declared) => {
            loader
                .bindings
                .insert(key(module.id, file_index, &right), declared);
            Ok(())
        }
        None => Err(undefined(loader, file, &right, Some(&left_name))),
    }
}

fn undefined<S>(
    loader: &Loader<S>,
    file: &ParsedFile,
    ident: &Ident,
    qualifier: Option<&str>,
) -> ResolveError {
    let name = loader.interner.resolve(ident.name);
    let name = match qualifier {
        Some(qualifier) => format!("{qualifier}.{name}"),
        None => name.to_string(),
    };
    ResolveError::UnresolvedIdentifier {
        name,
        file: file.path.clone(),
        line: ident.span.line,
        column: ident.span.column,
        span: ident.span.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::InMemoryModules;

    fn load(modules: InMemoryModules, pattern: &str) -> (Loader<InMemoryModules>, std::rc::Rc<Module>) {
        let mut loader = Loader::new(modules);
        let module = loader
            .load(None, pattern)
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        (loader, module)
    }

    fn load_err(modules: InMemoryModules, pattern: &str) -> ResolveError {
        match Loader::new(modules).load(None, pattern) {
            Ok(_) => panic!("expected a resolution error"),
            Err(e) => e,
        }
    }

    /// The object bound to the first occurrence of `name` in a file's
    /// unresolved list.
    fn bound(loader: &Loader<InMemoryModules>, module: &Module, file: usize, name: &str) -> Object {
        let ident = module.files[file]
            .ast
            .unresolved
            .iter()
            .find(|i| loader.interner.resolve(i.name) == name)
            .unwrap_or_else(|| panic!("{name} not referenced"));
        let object = loader.bindings.get(module.id, file, ident).unwrap();
        loader.objects.get(object).clone()
    }

    #[test]
    fn alias_import_uses_package_name_by_default() {
        let (loader, module) = load(
            InMemoryModules::new()
                .with_module("m", [("m.go", "package m\nimport \"x/io2\"\ntype T io.Reader\n")])
                .with_module("x/io2", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        let object = bound(&loader, &module, 0, "io");
        assert_eq!(object.kind, ObjectKind::Module);
        assert!(matches!(object.origin, Origin::Import { .. }));
    }

    #[test]
    fn named_alias_replaces_package_name() {
        let err = load_err(
            InMemoryModules::new()
                .with_module("m", [("m.go", "package m\nimport rd \"io\"\ntype T io.Reader\n")])
                .with_module("io", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        assert!(matches!(err, ResolveError::UnresolvedIdentifier { name, .. } if name == "io"));
    }

    #[test]
    fn dot_import_merges_names() {
        let (loader, module) = load(
            InMemoryModules::new()
                .with_module("m", [("m.go", "package m\nimport . \"io\"\ntype T Reader\n")])
                .with_module("io", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        let object = bound(&loader, &module, 0, "Reader");
        assert_eq!(object.owner(), Some(ModuleId::new(1)));
    }

    #[test]
    fn blank_import_binds_nothing() {
        let err = load_err(
            InMemoryModules::new()
                .with_module("m", [("m.go", "package m\nimport _ \"io\"\ntype T io.Reader\n")])
                .with_module("io", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        assert!(matches!(err, ResolveError::UnresolvedIdentifier { .. }));
    }

    #[test]
    fn imports_are_file_local() {
        let err = load_err(
            InMemoryModules::new()
                .with_module(
                    "m",
                    [
                        ("a.go", "package m\nimport \"io\"\ntype A io.Reader\n"),
                        ("b.go", "package m\ntype B io.Reader\n"),
                    ],
                )
                .with_module("io", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        let ResolveError::UnresolvedIdentifier { name, file, line, column, .. } = err else {
            panic!("expected unresolved identifier, got {err}");
        };
        assert_eq!((name.as_str(), file.as_str(), line, column), ("io", "b.go", 2, 8));
    }

    #[test]
    fn qualified_name_must_exist_in_target() {
        let err = load_err(
            InMemoryModules::new()
                .with_module("m", [("m.go", "package m\nimport \"io\"\ntype T io.Writer\n")])
                .with_module("io", [("r.go", "package io\ntype Reader interface{}\n")]),
            "m",
        );
        assert!(matches!(err, ResolveError::UnresolvedIdentifier { name, .. } if name == "io.Writer"));
    }

    #[test]
    fn qualifier_must_be_a_module() {
        let err = load_err(
            InMemoryModules::new().with_module("m", [("m.go", "package m\ntype S int\ntype T S.X\n")]),
            "m",
        );
        assert!(matches!(err, ResolveError::UnreachableInvariant { .. }));
    }

    #[test]
    fn universe_and_sibling_files_resolve() {
        let (loader, module) = load(
            InMemoryModules::new().with_module(
                "m",
                [
                    ("a.go", "package m\ntype A struct{ b B; n int }\n"),
                    ("b.go", "package m\ntype B error\n"),
                ],
            ),
            "m",
        );
        assert_eq!(bound(&loader, &module, 0, "int").origin, Origin::Universe);
        assert_eq!(bound(&loader, &module, 0, "B").owner(), Some(module.id));
        assert_eq!(bound(&loader, &module, 1, "error").origin, Origin::Universe);
    }

    #[test]
    fn cgo_references_do_not_fail_resolution() {
        let (loader, module) = load(
            InMemoryModules::new().with_module(
                "m",
                [
                    ("cgo.go", "package m\nimport \"C\"\ntype cchar = C.char\n"),
                    ("m.go", "package m\ntype T int\n"),
                ],
            ),
            "m",
        );
        assert_eq!(module.name, "m");
        assert_eq!(module.files.len(), 1);
        let scope = loader.scopes.get(module.scope);
        assert!(scope.get(loader.interner.lookup("T").unwrap()).is_some());
        let cchar = loader.interner.lookup("cchar").unwrap();
        assert!(scope.get(cchar).is_none());
    }

    #[test]
    fn import_cycles_resolve() {
        let mut loader = Loader::new(
            InMemoryModules::new()
                .with_module("a", [("a.go", "package a\nimport \"b\"\ntype A struct{ b.B }\n")])
                .with_module("b", [("b.go", "package b\nimport \"a\"\ntype B struct{ *a.A }\n")]),
        );
        let a = loader.load(None, "a").unwrap();
        let b = loader.load(Some(a.id), "b").unwrap();
        assert_eq!(b.name, "b");
        assert_eq!(loader.module_count(), 2);
    }
}
