// src/crates/proxyz-frontend/src/parse_decl.rs
//
// Package clause, imports and top-level declarations.

use smallvec::SmallVec;

use crate::TokenType;
use crate::ast::{
    Decl, FieldGroup, FuncDecl, Ident, ImportName, ImportSpec, TypeSpec, ValueKind, ValueSpec,
};
use crate::errors::ParserError;
use crate::parser::{ParseError, Parser};

impl<'src, 'i> Parser<'src, 'i> {
    pub(crate) fn package_clause(&mut self) -> Result<Ident, ParseError> {
        if !self.check(TokenType::KwPackage) {
            return Err(ParseError::new(
                ParserError::ExpectedPackage {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        self.advance();
        let name = self.expect_ident()?;
        self.expect_semicolon()?;
        Ok(name)
    }

    /// `import spec` or `import ( spec; ... )`
    pub(crate) fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> Result<(), ParseError> {
        self.consume(TokenType::KwImport, "import")?;
        if self.match_token(TokenType::LParen) {
            while !self.check(TokenType::RParen) && !self.check(TokenType::Eof) {
                imports.push(self.import_spec()?);
                self.expect_semicolon()?;
            }
            self.consume(TokenType::RParen, ")")?;
        } else {
            imports.push(self.import_spec()?);
        }
        Ok(())
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let start = self.current.span;
        let name = match self.current.ty {
            TokenType::Dot => {
                self.advance();
                Some(ImportName::Dot)
            }
            TokenType::Identifier if self.current.lexeme == "_" => {
                self.advance();
                Some(ImportName::Blank)
            }
            TokenType::Identifier => Some(ImportName::Alias(self.expect_ident()?)),
            _ => None,
        };

        if !matches!(
            self.current.ty,
            TokenType::StringLiteral | TokenType::RawStringLiteral
        ) {
            return Err(ParseError::new(
                ParserError::ExpectedImportPath {
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        let path = unquote(&self.current.lexeme).to_string();
        let span = start.merge(self.current.span);
        self.advance();
        Ok(ImportSpec { name, path, span })
    }

    /// One top-level declaration. Grouped `const`, `var` and `type`
    /// declarations push one `Decl` per spec.
    pub(crate) fn top_level_decl(&mut self, decls: &mut Vec<Decl>) -> Result<(), ParseError> {
        match self.current.ty {
            TokenType::KwType => {
                self.advance();
                self.grouped(decls, |p| Ok(Decl::Type(p.type_spec()?)))
            }
            TokenType::KwConst => {
                self.advance();
                self.grouped(decls, |p| Ok(Decl::Value(p.value_spec(ValueKind::Const)?)))
            }
            TokenType::KwVar => {
                self.advance();
                self.grouped(decls, |p| Ok(Decl::Value(p.value_spec(ValueKind::Var)?)))
            }
            TokenType::KwFunc => {
                decls.push(Decl::Func(self.func_decl()?));
                Ok(())
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedDeclaration {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    fn grouped(
        &mut self,
        decls: &mut Vec<Decl>,
        mut spec: impl FnMut(&mut Self) -> Result<Decl, ParseError>,
    ) -> Result<(), ParseError> {
        if self.match_token(TokenType::LParen) {
            while !self.check(TokenType::RParen) && !self.check(TokenType::Eof) {
                decls.push(spec(self)?);
                self.expect_semicolon()?;
            }
            self.consume(TokenType::RParen, ")")
        } else {
            decls.push(spec(self)?);
            Ok(())
        }
    }

    fn type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let start = self.current.span;
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenType::LBracket) && self.starts_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };
        let is_alias = self.match_token(TokenType::Eq);
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            is_alias,
            ty,
            span: start.merge(self.previous.span),
        })
    }

    /// With the current token on '[' after a type name, decide between a
    /// type parameter list (`type S[T any]`) and an array (`type A [N]int`).
    fn starts_type_params(&self) -> bool {
        let mut lexer = self.lookahead();
        if lexer.next_token().ty != TokenType::Identifier {
            return false;
        }
        match lexer.next_token().ty {
            TokenType::Star => lexer.next_token().ty == TokenType::Identifier,
            TokenType::Comma | TokenType::Tilde => true,
            ty => ty.starts_type(),
        }
    }

    fn value_spec(&mut self, kind: ValueKind) -> Result<ValueSpec, ParseError> {
        let start = self.current.span;
        let mut names: SmallVec<[Ident; 2]> = SmallVec::new();
        names.push(self.expect_ident()?);
        while self.match_token(TokenType::Comma) {
            names.push(self.expect_ident()?);
        }

        let ty = if self.current.ty.starts_type() {
            Some(self.parse_type()?)
        } else {
            None
        };

        if self.match_token(TokenType::Eq) {
            self.skip_initializer()?;
        }

        Ok(ValueSpec {
            kind,
            names,
            ty,
            span: start.merge(self.previous.span),
        })
    }

    /// Skip an initializer expression list up to the ';' or ')' that ends
    /// the spec, stepping over nested brackets and function literal bodies.
    fn skip_initializer(&mut self) -> Result<(), ParseError> {
        let mut open: Vec<(TokenType, crate::Span)> = Vec::new();
        loop {
            match self.current.ty {
                TokenType::Semicolon | TokenType::RParen if open.is_empty() => return Ok(()),
                TokenType::Eof if open.is_empty() => return Ok(()),
                TokenType::Eof => {
                    let (ty, span) = open[open.len() - 1];
                    return Err(ParseError::new(
                        ParserError::Unbalanced {
                            open: ty.as_str().to_string(),
                            span: span.into(),
                        },
                        span,
                    ));
                }
                TokenType::LParen | TokenType::LBracket | TokenType::LBrace => {
                    open.push((self.current.ty, self.current.span));
                }
                TokenType::RParen | TokenType::RBracket | TokenType::RBrace => {
                    open.pop();
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let start = self.current.span;
        self.consume(TokenType::KwFunc, "func")?;

        let recv = if self.check(TokenType::LParen) {
            let mut groups = self.parameters()?;
            if groups.len() != 1 {
                return Err(self.expected_token("single receiver"));
            }
            groups.pop()
        } else {
            None
        };

        let name = self.expect_ident()?;
        let type_params = if self.check(TokenType::LBracket) {
            self.type_params()?
        } else {
            Vec::new()
        };
        let sig = self.signature()?;
        let span = start.merge(self.previous.span);

        if self.check(TokenType::LBrace) {
            self.skip_block()?;
        }

        Ok(FuncDecl {
            recv,
            name,
            type_params,
            sig,
            span,
        })
    }

    /// `[K comparable, V any]`
    pub(crate) fn type_params(&mut self) -> Result<Vec<FieldGroup>, ParseError> {
        self.consume(TokenType::LBracket, "[")?;
        let mut groups = Vec::new();
        while !self.check(TokenType::RBracket) {
            let mut names: SmallVec<[Ident; 2]> = SmallVec::new();
            names.push(self.expect_ident()?);
            while self.match_token(TokenType::Comma) {
                names.push(self.expect_ident()?);
            }
            let ty = self.constraint()?;
            groups.push(FieldGroup {
                names,
                ty,
                tag: None,
            });
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RBracket, "]")?;
        Ok(groups)
    }
}

/// Strip the quotes from a string literal lexeme.
fn unquote(lexeme: &str) -> &str {
    let inner = lexeme
        .strip_prefix(['"', '`'])
        .unwrap_or(lexeme);
    inner.strip_suffix(['"', '`']).unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::unquote;

    #[test]
    fn unquote_strips_both_quote_styles() {
        assert_eq!(unquote("\"io\""), "io");
        assert_eq!(unquote("`net/http`"), "net/http");
    }
}
