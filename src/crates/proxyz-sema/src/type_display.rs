//! Renders type expressions as templates. References to declared types
//! become `%s` slots so a code emitter can choose its own qualifiers.

use serde::Serialize;

use proxyz_frontend::{
    ArrayLen, ChanDir, FieldGroup, Ident, InterfaceElem, Interner, LenPartKind, Signature,
    TypeExpr,
};

/// Placeholder for a module qualifier in a template.
pub const SLOT: &str = "%s";

/// A module as seen by a code emitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleRef {
    /// Package name
    pub name: String,
    /// Canonical identity
    pub path: String,
    /// Identity with any vendor prefix removed
    pub import_path: String,
}

/// A rendered type expression with one module per `%s` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTemplate {
    pub format: String,
    pub modules: Vec<ModuleRef>,
}

impl TypeTemplate {
    /// Fill slots with `qualifiers` in order (missing ones render empty)
    /// and unescape `%%`.
    pub fn render(&self, qualifiers: &[&str]) -> String {
        let mut out = String::with_capacity(self.format.len());
        let mut slots = qualifiers.iter();
        let mut chars = self.format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('s') => out.push_str(slots.next().copied().unwrap_or("")),
                Some(other) => out.push(other),
                None => out.push('%'),
            }
        }
        out
    }

    /// Render as Go source inside `subject`: references into `subject` are
    /// unqualified, others use the package name.
    pub fn render_from(&self, subject: &ModuleRef) -> String {
        let qualifiers: Vec<String> = self
            .modules
            .iter()
            .map(|m| {
                if m.path == subject.path {
                    String::new()
                } else {
                    format!("{}.", m.name)
                }
            })
            .collect();
        let qualifiers: Vec<&str> = qualifiers.iter().map(String::as_str).collect();
        self.render(&qualifiers)
    }
}

impl std::fmt::Display for TypeTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format)
    }
}

/// Pure renderer. `lookup` answers which module, if any, an identifier in
/// type position was declared in.
pub(crate) struct TypeFormatter<'a, F> {
    interner: &'a Interner,
    lookup: F,
}

impl<'a, F> TypeFormatter<'a, F>
where
    F: Fn(&Ident) -> Option<ModuleRef>,
{
    pub fn new(interner: &'a Interner, lookup: F) -> Self {
        Self { interner, lookup }
    }

    pub fn format(&self, ty: &TypeExpr) -> TypeTemplate {
        let mut template = TypeTemplate {
            format: String::new(),
            modules: Vec::new(),
        };
        self.write_type(&mut template, ty);
        template
    }

    fn name(&self, ident: &Ident) -> &'a str {
        self.interner.resolve(ident.name)
    }

    fn write_escaped(out: &mut TypeTemplate, text: &str) {
        for c in text.chars() {
            if c == '%' {
                out.format.push_str("%%");
            } else {
                out.format.push(c);
            }
        }
    }

    /// `ident` in reference position, slotted when it names a declared type.
    fn write_reference(&self, out: &mut TypeTemplate, ident: &Ident, fallback: Option<&Ident>) {
        match (self.lookup)(ident) {
            Some(module) => {
                out.format.push_str(SLOT);
                Self::write_escaped(out, self.name(ident));
                out.modules.push(module);
            }
            None => {
                if let Some(qualifier) = fallback {
                    Self::write_escaped(out, self.name(qualifier));
                    out.format.push('.');
                }
                Self::write_escaped(out, self.name(ident));
            }
        }
    }

    fn write_type(&self, out: &mut TypeTemplate, ty: &TypeExpr) {
        match ty {
            TypeExpr::Name(ident) => self.write_reference(out, ident, None),
            TypeExpr::Qualified { module, name } => self.write_reference(out, name, Some(module)),
            TypeExpr::Instance { base, args } => {
                self.write_type(out, base);
                out.format.push('[');
                self.write_list(out, args, ", ", |this, out, arg| this.write_type(out, arg));
                out.format.push(']');
            }
            TypeExpr::Pointer(inner) => {
                out.format.push('*');
                self.write_type(out, inner);
            }
            TypeExpr::Slice(elem) => {
                out.format.push_str("[]");
                self.write_type(out, elem);
            }
            TypeExpr::Array { len, elem } => {
                out.format.push('[');
                self.write_len(out, len);
                out.format.push(']');
                self.write_type(out, elem);
            }
            TypeExpr::Map { key, value } => {
                out.format.push_str("map[");
                self.write_type(out, key);
                out.format.push(']');
                self.write_type(out, value);
            }
            TypeExpr::Chan { dir, elem } => {
                out.format.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, elem);
            }
            TypeExpr::Func(sig) => {
                out.format.push_str("func");
                self.write_signature(out, sig);
            }
            TypeExpr::Struct(fields) if fields.is_empty() => out.format.push_str("struct{}"),
            TypeExpr::Struct(fields) => {
                out.format.push_str("struct{ ");
                self.write_list(out, fields, "; ", Self::write_field);
                out.format.push_str(" }");
            }
            TypeExpr::Interface(elems) if elems.is_empty() => out.format.push_str("interface{}"),
            TypeExpr::Interface(elems) => {
                out.format.push_str("interface{ ");
                self.write_list(out, elems, "; ", Self::write_elem);
                out.format.push_str(" }");
            }
            TypeExpr::Paren(inner) => {
                out.format.push('(');
                self.write_type(out, inner);
                out.format.push(')');
            }
            TypeExpr::Ellipsis(inner) => {
                out.format.push_str("...");
                self.write_type(out, inner);
            }
        }
    }

    fn write_list<T>(
        &self,
        out: &mut TypeTemplate,
        items: &[T],
        separator: &str,
        write: impl Fn(&Self, &mut TypeTemplate, &T),
    ) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.format.push_str(separator);
            }
            write(self, out, item);
        }
    }

    fn write_len(&self, out: &mut TypeTemplate, len: &ArrayLen) {
        for (i, part) in len.parts.iter().enumerate() {
            if i > 0 && part.spaced {
                out.format.push(' ');
            }
            match &part.kind {
                LenPartKind::Name(ident) => self.write_reference(out, ident, None),
                LenPartKind::Qualified { module, name } => {
                    self.write_reference(out, name, Some(module))
                }
                LenPartKind::Text(text) => Self::write_escaped(out, text),
            }
        }
    }

    /// `(params) results`
    fn write_signature(&self, out: &mut TypeTemplate, sig: &Signature) {
        out.format.push('(');
        self.write_list(out, &sig.params, ", ", Self::write_group);
        out.format.push(')');

        match sig.results.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                out.format.push(' ');
                self.write_type(out, &single.ty);
            }
            results => {
                out.format.push_str(" (");
                self.write_list(out, results, ", ", Self::write_group);
                out.format.push(')');
            }
        }
    }

    fn write_names(out: &mut TypeTemplate, interner: &Interner, names: &[Ident]) {
        for (i, ident) in names.iter().enumerate() {
            if i > 0 {
                out.format.push_str(", ");
            }
            Self::write_escaped(out, interner.resolve(ident.name));
        }
    }

    fn write_group(&self, out: &mut TypeTemplate, group: &FieldGroup) {
        if !group.names.is_empty() {
            Self::write_names(out, self.interner, &group.names);
            out.format.push(' ');
        }
        self.write_type(out, &group.ty);
    }

    fn write_field(&self, out: &mut TypeTemplate, field: &FieldGroup) {
        self.write_group(out, field);
        if let Some(tag) = &field.tag {
            out.format.push(' ');
            Self::write_escaped(out, tag);
        }
    }

    fn write_elem(&self, out: &mut TypeTemplate, elem: &InterfaceElem) {
        match elem {
            InterfaceElem::Method { name, sig } => {
                Self::write_escaped(out, self.name(name));
                self.write_signature(out, sig);
            }
            InterfaceElem::Embed(ty) => self.write_type(out, ty),
            InterfaceElem::Union(terms) => {
                self.write_list(out, terms, " | ", |this, out, term| {
                    if term.tilde {
                        out.format.push('~');
                    }
                    this.write_type(out, &term.ty);
                });
            }
        }
    }
}
