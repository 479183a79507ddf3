// src/crates/proxyz-sema/src/scope.rs
//
// Objects and layered scopes. The universe and module scopes live in an
// arena for the engine's lifetime; file scopes are built on the stack while
// a module is resolved and point at their module scope through `outer`.

use proxyz_identity::{ModuleId, ObjectId, ScopeId, Symbol};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Const,
    Var,
    Type,
    Func,
    /// An import name bound in one file
    Module,
}

/// Where an object comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Predeclared
    Universe,
    /// Declared by `decls[decl]` of `files[file]` in `module`
    Decl {
        module: ModuleId,
        file: usize,
        decl: usize,
    },
    /// An import name referring to `target`
    Import { target: ModuleId },
}

#[derive(Debug, Clone)]
pub struct Object {
    pub name: Symbol,
    pub kind: ObjectKind,
    pub origin: Origin,
}

impl Object {
    /// The module that declares this object, if any.
    pub fn owner(&self) -> Option<ModuleId> {
        match self.origin {
            Origin::Decl { module, .. } => Some(module),
            _ => None,
        }
    }
}

/// Append-only object table.
#[derive(Debug, Default)]
pub struct Objects {
    objects: Vec<Object>,
}

impl Objects {
    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId::new(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> &Object {
        &self.objects[id.index() as usize]
    }
}

/// One layer of name bindings. The first binding of a name wins.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Symbol, ObjectId>,
    outer: Option<ScopeId>,
}

impl Scope {
    pub fn with_outer(outer: ScopeId) -> Self {
        Self {
            bindings: FxHashMap::default(),
            outer: Some(outer),
        }
    }

    /// Bind `name` unless it is already bound here. Returns the object the
    /// name is bound to afterwards.
    pub fn insert(&mut self, name: Symbol, object: ObjectId) -> ObjectId {
        *self.bindings.entry(name).or_insert(object)
    }

    pub fn get(&self, name: Symbol) -> Option<ObjectId> {
        self.bindings.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// All bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, ObjectId)> + '_ {
        self.bindings.iter().map(|(name, id)| (*name, *id))
    }
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index() as usize]
    }

    /// Look `name` up in `scope`, then outward through the chain.
    pub fn lookup(&self, scope: &Scope, name: Symbol) -> Option<ObjectId> {
        let mut current = scope;
        loop {
            if let Some(id) = current.get(name) {
                return Some(id);
            }
            current = self.get(current.outer?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxyz_identity::Interner;

    fn object(name: Symbol) -> Object {
        Object {
            name,
            kind: ObjectKind::Type,
            origin: Origin::Universe,
        }
    }

    #[test]
    fn first_binding_wins() {
        let mut interner = Interner::new();
        let mut objects = Objects::default();
        let name = interner.intern("Reader");
        let first = objects.alloc(object(name));
        let second = objects.alloc(object(name));

        let mut scope = Scope::default();
        assert_eq!(scope.insert(name, first), first);
        assert_eq!(scope.insert(name, second), first);
        assert_eq!(scope.get(name), Some(first));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn lookup_walks_outward() {
        let mut interner = Interner::new();
        let mut objects = Objects::default();
        let mut arena = ScopeArena::default();

        let int = interner.intern("int");
        let t = interner.intern("T");
        let missing = interner.intern("missing");

        let mut universe = Scope::default();
        let int_obj = objects.alloc(object(int));
        universe.insert(int, int_obj);
        let universe = arena.alloc(universe);

        let mut module = Scope::with_outer(universe);
        let t_obj = objects.alloc(object(t));
        module.insert(t, t_obj);
        let module = arena.alloc(module);

        let file = Scope::with_outer(module);
        assert_eq!(arena.lookup(&file, int), Some(int_obj));
        assert_eq!(arena.lookup(&file, t), Some(t_obj));
        assert_eq!(arena.lookup(&file, missing), None);
        assert_eq!(arena.lookup(arena.get(universe), t), None);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut interner = Interner::new();
        let mut objects = Objects::default();
        let mut arena = ScopeArena::default();
        let name = interner.intern("error");

        let mut universe = Scope::default();
        let builtin = objects.alloc(object(name));
        universe.insert(name, builtin);
        let universe = arena.alloc(universe);

        let mut file = Scope::with_outer(universe);
        let local = objects.alloc(object(name));
        file.insert(name, local);
        assert_eq!(arena.lookup(&file, name), Some(local));
    }
}
