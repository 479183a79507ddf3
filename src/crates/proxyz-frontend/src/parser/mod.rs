// src/crates/proxyz-frontend/src/parser/mod.rs

use proxyz_identity::{IdentId, Interner, Symbol};

use crate::ast::{Ident, SourceFile};
use crate::errors::{LexerError, ParserError};
use crate::{Lexer, Span, Token, TokenType};

pub struct Parser<'src, 'i> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
    pub(crate) interner: &'i mut Interner,
    next_ident_id: u32,
    package: Option<Symbol>,
}

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug, Clone)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.column, self.error)
    }
}

impl std::error::Error for ParseError {}

impl<'src, 'i> Parser<'src, 'i> {
    /// Create a parser that interns names into a shared interner, so symbols
    /// from different files compare equal.
    pub fn new(source: &'src str, interner: &'i mut Interner) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenType::Eof, "", Span::default()),
            interner,
            next_ident_id: 0,
            package: None,
        }
    }

    /// Parse a whole file: package clause, imports, then top-level declarations.
    #[tracing::instrument(skip_all)]
    pub fn parse_file(&mut self) -> Result<SourceFile, ParseError> {
        let package = self.package_clause()?;
        self.package = Some(package.name);

        let mut imports = Vec::new();
        while self.check(TokenType::KwImport) {
            self.import_decl(&mut imports)?;
            self.expect_semicolon()?;
        }

        let mut decls = Vec::new();
        while !self.check(TokenType::Eof) {
            self.top_level_decl(&mut decls)?;
            self.expect_semicolon()?;
        }

        let unresolved = crate::unresolved::collect_unresolved(&decls);
        tracing::debug!(
            imports = imports.len(),
            decls = decls.len(),
            unresolved = unresolved.len(),
            "parsed file"
        );
        Ok(SourceFile {
            package,
            imports,
            decls,
            unresolved,
        })
    }

    /// Get a reference to the interner
    pub fn interner(&self) -> &Interner {
        &*self.interner
    }

    /// The package clause's name, once parsed. Still available after a
    /// later syntax error aborts the file.
    pub fn package_name(&self) -> Option<Symbol> {
        self.package
    }

    /// Take lexer errors (for diagnostic rendering)
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        self.lexer.take_errors()
    }

    /// Advance to the next token
    pub(crate) fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Check if the current token matches the given type
    pub(crate) fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    /// Consume the current token if it matches, otherwise return false
    pub(crate) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given type, or return an error
    pub(crate) fn consume(&mut self, ty: TokenType, expected: &str) -> Result<(), ParseError> {
        if self.check(ty) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected_token(expected))
        }
    }

    /// A statement or declaration ends in ';'. It may be omitted before a
    /// closing ')' or '}' and at the end of the file.
    pub(crate) fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        match self.current.ty {
            TokenType::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenType::RParen | TokenType::RBrace | TokenType::Eof => Ok(()),
            _ => Err(self.expected_token(";")),
        }
    }

    pub(crate) fn expected_token(&self, expected: &str) -> ParseError {
        ParseError::new(
            ParserError::ExpectedToken {
                expected: expected.to_string(),
                found: self.current.ty.as_str().to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        )
    }

    pub(crate) fn unexpected_token_error(&self) -> ParseError {
        ParseError::new(
            ParserError::UnexpectedToken {
                token: self.current.ty.as_str().to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        )
    }

    /// Turn the current identifier token into an `Ident` and advance.
    pub(crate) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if !self.check(TokenType::Identifier) {
            return Err(ParseError::new(
                ParserError::ExpectedIdentifier {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        let ident = Ident {
            id: self.next_ident_id(),
            name: self.interner.intern(&self.current.lexeme),
            span: self.current.span,
        };
        self.advance();
        Ok(ident)
    }

    fn next_ident_id(&mut self) -> IdentId {
        let id = IdentId::new(self.next_ident_id);
        self.next_ident_id += 1;
        id
    }

    /// A lexer positioned just after the current token, for lookahead.
    pub(crate) fn lookahead(&self) -> Lexer<'src> {
        self.lexer.clone()
    }

    /// Type of the token after the current one.
    pub(crate) fn peek_type(&self) -> TokenType {
        self.lookahead().next_token().ty
    }

    /// Skip a balanced `{ ... }` block. The current token must be '{'.
    pub(crate) fn skip_block(&mut self) -> Result<(), ParseError> {
        let open = self.current.span;
        let mut depth = 0usize;
        loop {
            match self.current.ty {
                TokenType::LBrace => depth += 1,
                TokenType::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                TokenType::Eof => {
                    return Err(ParseError::new(
                        ParserError::Unbalanced {
                            open: "{".to_string(),
                            span: open.into(),
                        },
                        open,
                    ));
                }
                _ => {}
            }
            self.advance();
        }
    }
}

/// After the opening '[' has been read from `lexer`, skip to the matching
/// ']' and report whether a type follows it (`[N]T` rather than `G[N]`).
pub(crate) fn bracket_then_type(lexer: &mut Lexer<'_>) -> bool {
    let mut depth = 1usize;
    loop {
        match lexer.next_token().ty {
            TokenType::LBracket => depth += 1,
            TokenType::RBracket => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenType::Eof => return false,
            _ => {}
        }
    }
    lexer.next_token().ty.starts_type()
}
