// src/crates/proxyz-identity/src/lib.rs
//
// Foundational identity primitives: interned symbols, source spans and the
// typed ids used to refer to modules, objects, scopes and identifiers.

mod entities;
mod intern;
mod span;
mod symbol;

pub use entities::{IdentId, ObjectId, ScopeId};
pub use intern::Interner;
pub use span::Span;
pub use symbol::Symbol;

/// Index of a loaded module inside one engine's module cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModuleId(u32);

impl ModuleId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_id_round_trips_index() {
        let id = ModuleId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "module#7");
    }
}
