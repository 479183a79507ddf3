// src/crates/proxyz-frontend/src/ast.rs
//
// Declaration-level AST for Go source files. Function bodies and value
// initializers are not represented; everything that can name a type is.

use smallvec::SmallVec;

pub use proxyz_identity::{IdentId, Span, Symbol};

/// An identifier occurrence. `id` is unique within its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub id: IdentId,
    pub name: Symbol,
    pub span: Span,
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    /// Identifiers in type-reference position that the file itself does not
    /// declare, in source order. Resolved later against imports, the module
    /// scope and the universe.
    pub unresolved: Vec<Ident>,
}

impl SourceFile {
    pub fn type_specs(&self) -> impl Iterator<Item = (usize, &TypeSpec)> {
        self.decls.iter().enumerate().filter_map(|(i, d)| match d {
            Decl::Type(spec) => Some((i, spec)),
            _ => None,
        })
    }

    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(func) => Some(func),
            _ => None,
        })
    }
}

/// How an import binds its module in the importing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    /// `import _ "path"`: no name is introduced
    Blank,
    /// `import . "path"`: every declared name is merged into the file scope
    Dot,
    /// `import name "path"`
    Alias(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// None binds the imported module under its package name.
    pub name: Option<ImportName>,
    /// Unquoted import path.
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeSpec),
    Func(FuncDecl),
    Value(ValueSpec),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Type(spec) => spec.span,
            Decl::Func(func) => func.span,
            Decl::Value(spec) => spec.span,
        }
    }
}

/// `type Name[P any] T` or `type Name = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<FieldGroup>,
    pub is_alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `func (recv) Name[T any](params) results`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<FieldGroup>,
    pub name: Ident,
    pub type_params: Vec<FieldGroup>,
    pub sig: Signature,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Const,
    Var,
}

/// One `const` or `var` spec. Initializers are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub kind: ValueKind,
    pub names: SmallVec<[Ident; 2]>,
    pub ty: Option<TypeExpr>,
    pub span: Span,
}

/// A group of names sharing one type: a parameter group, a struct field
/// line, a receiver or a type parameter group. Empty `names` means an
/// unnamed parameter or an embedded field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub names: SmallVec<[Ident; 2]>,
    pub ty: TypeExpr,
    /// Raw struct tag literal, including quotes.
    pub tag: Option<String>,
}

impl FieldGroup {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: SmallVec::new(),
            ty,
            tag: None,
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<FieldGroup>,
    pub results: Vec<FieldGroup>,
}

impl Signature {
    /// True when the final parameter is `...T`.
    pub fn is_variadic(&self) -> bool {
        self.params
            .last()
            .is_some_and(|p| matches!(p.ty, TypeExpr::Ellipsis(_)))
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A constant array length such as `4`, `N`, `pkg.Size` or `N * 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLen {
    pub parts: Vec<LenPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LenPart {
    pub kind: LenPartKind,
    /// Whitespace separated this part from the previous one in the source.
    pub spaced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LenPartKind {
    Name(Ident),
    Qualified { module: Ident, name: Ident },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, sig: Signature },
    /// A single embedded type, e.g. `io.Reader`
    Embed(TypeExpr),
    /// A type set, e.g. `~int | ~string`
    Union(Vec<TypeTerm>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeTerm {
    pub tilde: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T`
    Name(Ident),
    /// `pkg.T`
    Qualified { module: Ident, name: Ident },
    /// `G[A, B]`
    Instance {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`
    Array { len: ArrayLen, elem: Box<TypeExpr> },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(Box<Signature>),
    Struct(Vec<FieldGroup>),
    Interface(Vec<InterfaceElem>),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `...T`, only valid as the last parameter type
    Ellipsis(Box<TypeExpr>),
}

impl TypeExpr {
    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &TypeExpr {
        let mut ty = self;
        while let TypeExpr::Paren(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Visit this expression and every type expression nested in it,
    /// outermost first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TypeExpr)) {
        f(self);
        match self {
            TypeExpr::Name(_) | TypeExpr::Qualified { .. } => {}
            TypeExpr::Instance { base, args } => {
                base.walk(f);
                for arg in args {
                    arg.walk(f);
                }
            }
            TypeExpr::Pointer(inner)
            | TypeExpr::Slice(inner)
            | TypeExpr::Paren(inner)
            | TypeExpr::Ellipsis(inner) => inner.walk(f),
            TypeExpr::Array { elem, .. } | TypeExpr::Chan { elem, .. } => elem.walk(f),
            TypeExpr::Map { key, value } => {
                key.walk(f);
                value.walk(f);
            }
            TypeExpr::Func(sig) => sig.walk(f),
            TypeExpr::Struct(fields) => {
                for field in fields {
                    field.ty.walk(f);
                }
            }
            TypeExpr::Interface(elems) => {
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { sig, .. } => sig.walk(f),
                        InterfaceElem::Embed(ty) => ty.walk(f),
                        InterfaceElem::Union(terms) => {
                            for term in terms {
                                term.ty.walk(f);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Signature {
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TypeExpr)) {
        for group in self.params.iter().chain(&self.results) {
            group.ty.walk(f);
        }
    }
}

impl Decl {
    /// Visit every type expression appearing in this declaration.
    pub fn walk_types<'a>(&'a self, f: &mut impl FnMut(&'a TypeExpr)) {
        match self {
            Decl::Type(spec) => {
                for param in &spec.type_params {
                    param.ty.walk(f);
                }
                spec.ty.walk(f);
            }
            Decl::Func(func) => {
                if let Some(recv) = &func.recv {
                    recv.ty.walk(f);
                }
                for param in &func.type_params {
                    param.ty.walk(f);
                }
                func.sig.walk(f);
            }
            Decl::Value(spec) => {
                if let Some(ty) = &spec.ty {
                    ty.walk(f);
                }
            }
        }
    }
}
