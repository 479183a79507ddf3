// src/crates/proxyz-frontend/src/unresolved.rs
//
// Collects the identifiers a file refers to but does not declare itself.

use rustc_hash::FxHashSet;

use crate::ast::{Decl, FieldGroup, Ident, LenPartKind, Symbol, TypeExpr};

/// Every identifier in type-reference position, in source order, skipping
/// names bound by the enclosing declaration's type parameters.
pub(crate) fn collect_unresolved(decls: &[Decl]) -> Vec<Ident> {
    let mut unresolved = Vec::new();
    for decl in decls {
        let type_params = declared_type_params(decl);
        decl.walk_types(&mut |ty| match ty {
            TypeExpr::Name(ident) => {
                if !type_params.contains(&ident.name) {
                    unresolved.push(*ident);
                }
            }
            TypeExpr::Qualified { module, .. } => unresolved.push(*module),
            TypeExpr::Array { len, .. } => {
                for part in &len.parts {
                    match &part.kind {
                        LenPartKind::Name(ident) if !type_params.contains(&ident.name) => {
                            unresolved.push(*ident)
                        }
                        LenPartKind::Qualified { module, .. } => unresolved.push(*module),
                        _ => {}
                    }
                }
            }
            _ => {}
        });
    }
    unresolved
}

fn declared_type_params(decl: &Decl) -> FxHashSet<Symbol> {
    let mut names = FxHashSet::default();
    let mut add = |groups: &[FieldGroup]| {
        for group in groups {
            names.extend(group.names.iter().map(|n| n.name));
        }
    };
    match decl {
        Decl::Type(spec) => add(&spec.type_params),
        Decl::Func(func) => {
            add(&func.type_params);
            // `func (l *List[T]) ...` declares T for the method
            if let Some(recv) = &func.recv {
                let mut base = recv.ty.unparen();
                if let TypeExpr::Pointer(inner) = base {
                    base = inner.unparen();
                }
                if let TypeExpr::Instance { args, .. } = base {
                    for arg in args {
                        if let TypeExpr::Name(ident) = arg {
                            names.insert(ident.name);
                        }
                    }
                }
            }
        }
        Decl::Value(_) => {}
    }
    names
}
