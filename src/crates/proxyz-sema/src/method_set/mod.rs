//! Flattened method sets.

mod builder;

pub(crate) use builder::build;

use serde::Serialize;

use crate::type_display::{ModuleRef, TypeTemplate};

/// One callable signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    /// Names of named parameters only
    pub arg_names: Vec<String>,
    pub arg_types: Vec<TypeTemplate>,
    pub result_types: Vec<TypeTemplate>,
    /// The last argument type is the element type of a `...T` parameter
    pub is_variadic: bool,
}

impl Method {
    /// `Name(args) results` as Go source inside `subject`.
    pub fn render_from(&self, subject: &ModuleRef) -> String {
        let last = self.arg_types.len().saturating_sub(1);
        let args: Vec<String> = self
            .arg_types
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let ty = ty.render_from(subject);
                let ty = if self.is_variadic && i == last {
                    format!("...{ty}")
                } else {
                    ty
                };
                match self.arg_names.get(i) {
                    Some(name) if self.arg_names.len() == self.arg_types.len() => {
                        format!("{name} {ty}")
                    }
                    _ => ty,
                }
            })
            .collect();
        let results: Vec<String> = self
            .result_types
            .iter()
            .map(|ty| ty.render_from(subject))
            .collect();
        match results.as_slice() {
            [] => format!("{}({})", self.name, args.join(", ")),
            [single] => format!("{}({}) {single}", self.name, args.join(", ")),
            _ => format!("{}({}) ({})", self.name, args.join(", "), results.join(", ")),
        }
    }
}

/// The exported methods of one named type, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSet {
    /// Module reference as requested
    pub reference: String,
    pub module: ModuleRef,
    pub type_name: String,
    pub methods: Vec<Method>,
    pub type_is_interface: bool,
}

impl MethodSet {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Ordered methods with unique names. Adding an existing name replaces the
/// earlier entry in place.
#[derive(Debug, Default)]
pub(crate) struct MethodList {
    methods: Vec<Method>,
}

impl MethodList {
    pub fn add(&mut self, method: Method) {
        match self.methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => self.methods.push(method),
        }
    }

    pub fn into_vec(self) -> Vec<Method> {
        self.methods
    }
}
