// src/crates/proxyz-frontend/src/lexer/literals.rs
//
// Literal lexing: interpreted and raw strings, runes, and numbers.

use crate::errors::LexerError;
use crate::{Token, TokenType};

use super::Lexer;

impl<'src> Lexer<'src> {
    /// Scan an interpreted string literal. The opening quote is consumed.
    pub(super) fn string(&mut self) -> Token<'src> {
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    let span = self.current_span();
                    tracing::debug!(line = self.start_line, col = self.start_column, "lexer error: unterminated string");
                    self.errors
                        .push(LexerError::UnterminatedString { span: span.into() });
                    return Token::new(TokenType::Error, "unterminated string literal", span);
                }
                Some(b'"') => {
                    self.advance();
                    return self.make_token(TokenType::StringLiteral);
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek_byte().is_some_and(|b| b != b'\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a raw string literal (no escapes, may span lines).
    pub(super) fn raw_string(&mut self) -> Token<'src> {
        loop {
            match self.peek_byte() {
                None => {
                    let span = self.current_span();
                    tracing::debug!(line = self.start_line, "lexer error: unterminated raw string");
                    self.errors
                        .push(LexerError::UnterminatedRawString { span: span.into() });
                    return Token::new(TokenType::Error, "unterminated raw string literal", span);
                }
                Some(b'`') => {
                    self.advance();
                    return self.make_token(TokenType::RawStringLiteral);
                }
                Some(b'\n') => self.consume_newline(),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a rune literal such as `'a'`, `'\n'` or `'é'`.
    pub(super) fn rune(&mut self) -> Token<'src> {
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    let span = self.current_span();
                    tracing::debug!(line = self.start_line, "lexer error: unterminated rune");
                    self.errors
                        .push(LexerError::UnterminatedRune { span: span.into() });
                    return Token::new(TokenType::Error, "unterminated rune literal", span);
                }
                Some(b'\'') => {
                    self.advance();
                    return self.make_token(TokenType::RuneLiteral);
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek_byte().is_some_and(|b| b != b'\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a number literal. The first character (a digit or '.') is consumed.
    ///
    /// Accepts every Go form: decimal, `0x`/`0o`/`0b` prefixes, legacy octal,
    /// `_` separators, decimal and hex exponents, and the imaginary `i` suffix.
    /// Digits are not validated; the declaration parser never evaluates them.
    pub(super) fn number(&mut self) -> Token<'src> {
        let hex = self.bytes[self.start] == b'0'
            && matches!(self.peek_byte(), Some(b'x') | Some(b'X'));

        while let Some(b) = self.peek_byte() {
            let is_exponent = if hex {
                matches!(b, b'p' | b'P')
            } else {
                matches!(b, b'e' | b'E')
            };
            if is_exponent {
                self.current += 1;
                self.column += 1;
                if matches!(self.peek_byte(), Some(b'+') | Some(b'-')) {
                    self.current += 1;
                    self.column += 1;
                }
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.current += 1;
                self.column += 1;
            } else {
                break;
            }
        }

        let text = &self.source[self.start..self.current];
        let ty = if text.ends_with('i') {
            TokenType::ImagLiteral
        } else if text.contains('.')
            || (hex && text.contains(['p', 'P']))
            || (!hex && text.contains(['e', 'E']))
        {
            TokenType::FloatLiteral
        } else {
            TokenType::IntLiteral
        };
        self.make_token(ty)
    }
}
