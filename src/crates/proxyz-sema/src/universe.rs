//! Predeclared identifiers of the Go universe block.

use crate::scope::ObjectKind;

/// Every predeclared name with the kind of object it denotes.
pub static PREDECLARED: &[(&str, ObjectKind)] = &[
    // Constants
    ("true", ObjectKind::Const),
    ("false", ObjectKind::Const),
    ("iota", ObjectKind::Const),
    // Zero value
    ("nil", ObjectKind::Var),
    // Builtin functions
    ("append", ObjectKind::Func),
    ("cap", ObjectKind::Func),
    ("clear", ObjectKind::Func),
    ("close", ObjectKind::Func),
    ("complex", ObjectKind::Func),
    ("copy", ObjectKind::Func),
    ("delete", ObjectKind::Func),
    ("imag", ObjectKind::Func),
    ("len", ObjectKind::Func),
    ("make", ObjectKind::Func),
    ("max", ObjectKind::Func),
    ("min", ObjectKind::Func),
    ("new", ObjectKind::Func),
    ("panic", ObjectKind::Func),
    ("print", ObjectKind::Func),
    ("println", ObjectKind::Func),
    ("real", ObjectKind::Func),
    ("recover", ObjectKind::Func),
    // Types
    ("any", ObjectKind::Type),
    ("bool", ObjectKind::Type),
    ("byte", ObjectKind::Type),
    ("comparable", ObjectKind::Type),
    ("complex64", ObjectKind::Type),
    ("complex128", ObjectKind::Type),
    ("error", ObjectKind::Type),
    ("float32", ObjectKind::Type),
    ("float64", ObjectKind::Type),
    ("int", ObjectKind::Type),
    ("int8", ObjectKind::Type),
    ("int16", ObjectKind::Type),
    ("int32", ObjectKind::Type),
    ("int64", ObjectKind::Type),
    ("rune", ObjectKind::Type),
    ("string", ObjectKind::Type),
    ("uint", ObjectKind::Type),
    ("uint8", ObjectKind::Type),
    ("uint16", ObjectKind::Type),
    ("uint32", ObjectKind::Type),
    ("uint64", ObjectKind::Type),
    ("uintptr", ObjectKind::Type),
    // Placeholders used by the builtin package documentation
    ("Type", ObjectKind::Type),
    ("Type1", ObjectKind::Type),
    ("IntegerType", ObjectKind::Type),
    ("FloatType", ObjectKind::Type),
    ("ComplexType", ObjectKind::Type),
];

/// The shape of a predeclared type when it is flattened into a method set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `error`: an interface with the single method `Error() string`
    Error,
    /// `any`: the empty interface
    Any,
    /// Every other predeclared type contributes no methods
    Plain,
}

impl Builtin {
    pub fn classify(name: &str) -> Self {
        match name {
            "error" => Builtin::Error,
            "any" => Builtin::Any,
            _ => Builtin::Plain,
        }
    }
}

/// Go's exported-name rule: the first character is an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predeclared_names_are_unique() {
        let mut names: Vec<_> = PREDECLARED.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn exported_names() {
        assert!(is_exported("Read"));
        assert!(is_exported("Ärger"));
        assert!(!is_exported("read"));
        assert!(!is_exported("_Read"));
        assert!(!is_exported(""));
    }

    #[test]
    fn builtin_shapes() {
        assert_eq!(Builtin::classify("error"), Builtin::Error);
        assert_eq!(Builtin::classify("any"), Builtin::Any);
        assert_eq!(Builtin::classify("int"), Builtin::Plain);
    }
}
