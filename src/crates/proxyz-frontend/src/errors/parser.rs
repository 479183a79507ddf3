// src/errors/parser.rs
//! Parser errors (E1xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("expected package clause, found '{found}'")]
    #[diagnostic(code(E1001), help("every Go file starts with 'package <name>'"))]
    ExpectedPackage {
        found: String,
        #[label("expected 'package'")]
        span: SourceSpan,
    },

    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected token '{token}'")]
    #[diagnostic(code(E1003))]
    UnexpectedToken {
        token: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("expected type, found '{found}'")]
    #[diagnostic(code(E1004))]
    ExpectedType {
        found: String,
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected declaration, found '{found}'")]
    #[diagnostic(code(E1005), help("top-level declarations start with const, var, type, func or import"))]
    ExpectedDeclaration {
        found: String,
        #[label("expected declaration")]
        span: SourceSpan,
    },

    #[error("expected identifier, found '{found}'")]
    #[diagnostic(code(E1006))]
    ExpectedIdentifier {
        found: String,
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("mixed named and unnamed parameters")]
    #[diagnostic(code(E1007))]
    MixedParameters {
        #[label("parameter list")]
        span: SourceSpan,
    },

    #[error("missing import path")]
    #[diagnostic(code(E1008), help("import paths are string literals, e.g. \"io\""))]
    ExpectedImportPath {
        #[label("expected import path")]
        span: SourceSpan,
    },

    #[error("unbalanced '{open}'")]
    #[diagnostic(code(E1009))]
    Unbalanced {
        open: String,
        #[label("opened here")]
        span: SourceSpan,
    },
}
