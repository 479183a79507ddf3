// errors/mod.rs
//! Resolution errors (E3xxx) and module service errors.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("failed to load module '{reference}': {reason}")]
    #[diagnostic(code(E3001))]
    ModuleLoad { reference: String, reason: String },

    #[error("type '{name}' not found in module '{module}'")]
    #[diagnostic(code(E3002))]
    TypeNotFound { module: String, name: String },

    #[error("'{name}' in module '{module}' is not a type")]
    #[diagnostic(code(E3003))]
    NotAType { module: String, name: String },

    #[error("undefined: {name}")]
    #[diagnostic(code(E3004))]
    UnresolvedIdentifier {
        name: String,
        file: String,
        line: u32,
        column: u32,
        #[label("not declared in any enclosing scope")]
        span: SourceSpan,
    },

    #[error("internal invariant violated: {detail}")]
    #[diagnostic(code(E3005))]
    UnreachableInvariant { detail: String },

    #[error("invalid recursive type: {}", cycle.join(" -> "))]
    #[diagnostic(code(E3006))]
    TypeCycle { cycle: Vec<String> },

    #[error("generic type '{name}' in module '{module}' cannot be flattened")]
    #[diagnostic(
        code(E3007),
        help("method sets are only built for non-generic named types")
    )]
    GenericType { module: String, name: String },
}

impl ResolveError {
    pub(crate) fn module_load(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::ModuleLoad {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        ResolveError::UnreachableInvariant {
            detail: detail.into(),
        }
    }
}

/// Failures reported by a module service itself, before any resolution.
#[derive(Error, Debug, Diagnostic)]
pub enum ServiceError {
    #[error("i/o error at {path}: {source}")]
    #[diagnostic(code(E3101))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    #[diagnostic(code(E3102))]
    InvalidPattern { pattern: String, reason: String },

    #[error("unknown module '{identity}'")]
    #[diagnostic(code(E3103))]
    UnknownModule { identity: String },
}

impl ServiceError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        ServiceError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
