//! proxyz frontend: a declaration-level lexer and parser for Go source.
//!
//! Only what can name a type is parsed in full. Function bodies and value
//! initializers are skipped by bracket matching.

pub mod ast;
pub mod errors;
pub mod lexer;
mod parse_decl;
mod parse_type;
pub mod parser;
pub mod token;
mod unresolved;

pub use ast::{
    ArrayLen, ChanDir, Decl, FieldGroup, FuncDecl, Ident, ImportName, ImportSpec, InterfaceElem,
    LenPart, LenPartKind, Signature, SourceFile, TypeExpr, TypeSpec, TypeTerm, ValueKind,
    ValueSpec,
};
pub use errors::{LexerError, ParserError};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use proxyz_identity::{IdentId, Interner, Symbol};
pub use token::{Span, Token, TokenType};
