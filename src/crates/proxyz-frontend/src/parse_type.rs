// src/crates/proxyz-frontend/src/parse_type.rs
//
// Type expressions, parameter lists, struct fields and interface elements.

use smallvec::SmallVec;

use crate::TokenType;
use crate::ast::{
    ArrayLen, ChanDir, FieldGroup, Ident, InterfaceElem, LenPart, LenPartKind, Signature,
    TypeExpr, TypeTerm,
};
use crate::errors::ParserError;
use crate::parser::{ParseError, Parser, bracket_then_type};

/// One entry of a parameter list before Go's grouping rules are applied.
enum ParamEntry {
    /// A lone identifier: a parameter name or a type name, decided by the
    /// rest of the list.
    Ident(Ident),
    /// `name T`
    Named(Ident, TypeExpr),
    /// A type that cannot be a name
    Bare(TypeExpr),
}

impl<'src, 'i> Parser<'src, 'i> {
    /// Parse a type expression.
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        match self.current.ty {
            TokenType::Identifier => self.type_name(),
            TokenType::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenType::LBracket => {
                self.advance();
                if self.match_token(TokenType::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.array_len()?;
                self.consume(TokenType::RBracket, "]")?;
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.consume(TokenType::RParen, ")")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            TokenType::KwMap => {
                self.advance();
                self.consume(TokenType::LBracket, "[")?;
                let key = self.parse_type()?;
                self.consume(TokenType::RBracket, "]")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenType::KwChan => {
                self.advance();
                let dir = if self.match_token(TokenType::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenType::Arrow => {
                self.advance();
                self.consume(TokenType::KwChan, "chan")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenType::KwFunc => {
                self.advance();
                Ok(TypeExpr::Func(Box::new(self.signature()?)))
            }
            TokenType::KwStruct => {
                self.advance();
                Ok(TypeExpr::Struct(self.struct_fields()?))
            }
            TokenType::KwInterface => {
                self.advance();
                Ok(TypeExpr::Interface(self.interface_elems()?))
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedType {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    /// `T`, `pkg.T`, `T[A]` or `pkg.T[A, B]`
    fn type_name(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.expect_ident()?;
        let base = if self.match_token(TokenType::Dot) {
            TypeExpr::Qualified {
                module: first,
                name: self.expect_ident()?,
            }
        } else {
            TypeExpr::Name(first)
        };

        if !self.match_token(TokenType::LBracket) {
            return Ok(base);
        }
        let mut args = Vec::new();
        while !self.check(TokenType::RBracket) {
            args.push(self.parse_type()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RBracket, "]")?;
        Ok(TypeExpr::Instance {
            base: Box::new(base),
            args,
        })
    }

    /// Tokens of a constant array length up to the closing ']'.
    fn array_len(&mut self) -> Result<ArrayLen, ParseError> {
        let mut parts = Vec::new();
        let mut prev_end = self.previous.span.end;
        let mut depth = 0usize;
        loop {
            let token = self.current.clone();
            let spaced = !parts.is_empty() && token.span.start > prev_end;
            let kind = match token.ty {
                TokenType::RBracket if depth == 0 => break,
                TokenType::Eof | TokenType::Semicolon => {
                    return Err(self.expected_token("]"));
                }
                TokenType::Identifier => {
                    let ident = self.expect_ident()?;
                    if self.check(TokenType::Dot) && self.peek_type() == TokenType::Identifier {
                        self.advance();
                        let name = self.expect_ident()?;
                        prev_end = self.previous.span.end;
                        parts.push(LenPart {
                            kind: LenPartKind::Qualified {
                                module: ident,
                                name,
                            },
                            spaced,
                        });
                        continue;
                    }
                    prev_end = self.previous.span.end;
                    parts.push(LenPart {
                        kind: LenPartKind::Name(ident),
                        spaced,
                    });
                    continue;
                }
                TokenType::LParen | TokenType::LBracket => {
                    depth += 1;
                    LenPartKind::Text(token.lexeme.to_string())
                }
                TokenType::RParen | TokenType::RBracket => {
                    depth = depth.saturating_sub(1);
                    LenPartKind::Text(token.lexeme.to_string())
                }
                _ => LenPartKind::Text(token.lexeme.to_string()),
            };
            self.advance();
            prev_end = token.span.end;
            parts.push(LenPart { kind, spaced });
        }
        Ok(ArrayLen { parts })
    }

    /// `(params) results`
    pub(crate) fn signature(&mut self) -> Result<Signature, ParseError> {
        let params = self.parameters()?;
        let results = if self.check(TokenType::LParen) {
            self.parameters()?
        } else if self.current.ty.starts_type() {
            vec![FieldGroup::unnamed(self.parse_type()?)]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    /// A parenthesized parameter list, grouped the way Go groups it:
    /// `(a, b int, c string)` has two named groups, `(int, string)` two
    /// unnamed ones.
    pub(crate) fn parameters(&mut self) -> Result<Vec<FieldGroup>, ParseError> {
        let open = self.current.span;
        self.consume(TokenType::LParen, "(")?;
        let mut entries = Vec::new();
        while !self.check(TokenType::RParen) {
            entries.push(self.param_entry()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RParen, ")")?;

        if !entries.iter().any(|e| matches!(e, ParamEntry::Named(..))) {
            return Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    ParamEntry::Ident(ident) => FieldGroup::unnamed(TypeExpr::Name(ident)),
                    ParamEntry::Named(_, ty) | ParamEntry::Bare(ty) => FieldGroup::unnamed(ty),
                })
                .collect());
        }

        let mixed = || {
            let span = open.merge(self.previous.span);
            ParseError::new(ParserError::MixedParameters { span: span.into() }, span)
        };
        let mut groups = Vec::new();
        let mut pending: SmallVec<[Ident; 2]> = SmallVec::new();
        for entry in entries {
            match entry {
                ParamEntry::Ident(ident) => pending.push(ident),
                ParamEntry::Named(ident, ty) => {
                    pending.push(ident);
                    groups.push(FieldGroup {
                        names: std::mem::take(&mut pending),
                        ty,
                        tag: None,
                    });
                }
                ParamEntry::Bare(_) => return Err(mixed()),
            }
        }
        if !pending.is_empty() {
            return Err(mixed());
        }
        Ok(groups)
    }

    fn param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        if self.match_token(TokenType::Ellipsis) {
            return Ok(ParamEntry::Bare(TypeExpr::Ellipsis(Box::new(
                self.parse_type()?,
            ))));
        }
        if !self.check(TokenType::Identifier) {
            return Ok(ParamEntry::Bare(self.parse_type()?));
        }

        let mut lexer = self.lookahead();
        let next = lexer.next_token().ty;
        match next {
            TokenType::Dot => Ok(ParamEntry::Bare(self.parse_type()?)),
            TokenType::Comma | TokenType::RParen => Ok(ParamEntry::Ident(self.expect_ident()?)),
            TokenType::Ellipsis => {
                let name = self.expect_ident()?;
                self.advance();
                Ok(ParamEntry::Named(
                    name,
                    TypeExpr::Ellipsis(Box::new(self.parse_type()?)),
                ))
            }
            TokenType::LBracket => {
                // `a []T` and `a [N]T` name a parameter; `G[T]` is a type.
                let mut after = lexer.clone();
                if after.next_token().ty == TokenType::RBracket || bracket_then_type(&mut lexer) {
                    let name = self.expect_ident()?;
                    Ok(ParamEntry::Named(name, self.parse_type()?))
                } else {
                    Ok(ParamEntry::Bare(self.parse_type()?))
                }
            }
            ty if ty.starts_type() => {
                let name = self.expect_ident()?;
                Ok(ParamEntry::Named(name, self.parse_type()?))
            }
            _ => Ok(ParamEntry::Bare(self.parse_type()?)),
        }
    }

    /// A type parameter constraint: a type, or a union such as `~int | string`.
    pub(crate) fn constraint(&mut self) -> Result<TypeExpr, ParseError> {
        let mut terms = self.type_terms()?;
        if terms.len() == 1 && !terms[0].tilde {
            return Ok(terms.remove(0).ty);
        }
        Ok(TypeExpr::Interface(vec![InterfaceElem::Union(terms)]))
    }

    fn type_terms(&mut self) -> Result<Vec<TypeTerm>, ParseError> {
        let mut terms = Vec::new();
        loop {
            let tilde = self.match_token(TokenType::Tilde);
            terms.push(TypeTerm {
                tilde,
                ty: self.parse_type()?,
            });
            if !self.match_token(TokenType::Pipe) {
                return Ok(terms);
            }
        }
    }

    /// `{ A, B int; io.Reader; *Base; c chan int "tag" }` after `struct`.
    fn struct_fields(&mut self) -> Result<Vec<FieldGroup>, ParseError> {
        self.consume(TokenType::LBrace, "{")?;
        let mut fields = Vec::new();
        while !self.check(TokenType::RBrace) {
            fields.push(self.struct_field()?);
            if !self.match_token(TokenType::Semicolon) {
                break;
            }
        }
        self.consume(TokenType::RBrace, "}")?;
        Ok(fields)
    }

    fn struct_field(&mut self) -> Result<FieldGroup, ParseError> {
        let mut names: SmallVec<[Ident; 2]> = SmallVec::new();
        if self.check(TokenType::Identifier) {
            let mut lexer = self.lookahead();
            let embedded = match lexer.next_token().ty {
                TokenType::Dot
                | TokenType::Semicolon
                | TokenType::RBrace
                | TokenType::StringLiteral
                | TokenType::RawStringLiteral => true,
                TokenType::LBracket => {
                    let mut after = lexer.clone();
                    after.next_token().ty != TokenType::RBracket && !bracket_then_type(&mut lexer)
                }
                _ => false,
            };
            if !embedded {
                names.push(self.expect_ident()?);
                while self.match_token(TokenType::Comma) {
                    names.push(self.expect_ident()?);
                }
            }
        } else if !self.check(TokenType::Star) && !self.check(TokenType::LParen) {
            return Err(self.unexpected_token_error());
        }

        let ty = self.parse_type()?;
        let tag = if matches!(
            self.current.ty,
            TokenType::StringLiteral | TokenType::RawStringLiteral
        ) {
            let tag = self.current.lexeme.to_string();
            self.advance();
            Some(tag)
        } else {
            None
        };
        Ok(FieldGroup { names, ty, tag })
    }

    /// `{ Read(p []byte) (int, error); io.Closer; ~int | ~string }` after `interface`.
    fn interface_elems(&mut self) -> Result<Vec<InterfaceElem>, ParseError> {
        self.consume(TokenType::LBrace, "{")?;
        let mut elems = Vec::new();
        while !self.check(TokenType::RBrace) {
            if self.check(TokenType::Identifier) && self.peek_type() == TokenType::LParen {
                let name = self.expect_ident()?;
                let sig = self.signature()?;
                elems.push(InterfaceElem::Method { name, sig });
            } else {
                let mut terms = self.type_terms()?;
                if terms.len() == 1 && !terms[0].tilde {
                    elems.push(InterfaceElem::Embed(terms.remove(0).ty));
                } else {
                    elems.push(InterfaceElem::Union(terms));
                }
            }
            if !self.match_token(TokenType::Semicolon) {
                break;
            }
        }
        self.consume(TokenType::RBrace, "}")?;
        Ok(elems)
    }
}
