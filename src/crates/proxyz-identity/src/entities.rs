//! Typed ids for resolver entities.
//!
//! Each id is a plain index into the table that owns the entity, so ids from
//! different tables cannot be mixed up.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// One identifier occurrence inside a parsed file (unique per file)
    pub struct IdentId;
}

define_entity_id! {
    /// A declared object: type, constant, variable, function or module alias
    pub struct ObjectId;
}

define_entity_id! {
    /// A scope stored in the resolver's scope arena
    pub struct ScopeId;
}
