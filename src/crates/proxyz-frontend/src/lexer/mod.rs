// src/crates/proxyz-frontend/src/lexer/mod.rs

mod literals;

use crate::errors::LexerError;
use crate::{Span, Token, TokenType};

/// Smallest byte value that starts a multi-byte UTF-8 sequence (non-ASCII).
const UTF8_MULTIBYTE: u8 = 0x80;

/// Lexeme used for semicolons inserted at line ends.
const INSERTED_SEMICOLON: &str = "\n";

#[derive(Clone)]
pub struct Lexer<'src> {
    pub(crate) source: &'src str,
    pub(crate) bytes: &'src [u8],
    pub(crate) current: usize,
    pub(crate) start: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) start_column: u32,
    pub(crate) start_line: u32,
    // Whether a line end after the previous token becomes a semicolon
    insert_semicolon: bool,
    // Error collection
    pub(crate) errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Self {
            source,
            bytes: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            insert_semicolon: false,
            errors: Vec::new(),
        };
        lexer.skip_bom();
        lexer
    }

    fn skip_bom(&mut self) {
        if self.source.starts_with('\u{FEFF}') {
            self.current = '\u{FEFF}'.len_utf8();
            self.start = self.current;
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token<'src> {
        let token = self.scan_token();
        self.insert_semicolon = token.ty.ends_statement();
        token
    }

    fn scan_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace();

            self.start = self.current;
            self.start_column = self.column;
            self.start_line = self.line;

            match self.peek_byte() {
                None => {
                    if self.insert_semicolon {
                        return self.make_inserted_semicolon();
                    }
                    return self.make_token(TokenType::Eof);
                }
                Some(b'\n') => {
                    if self.insert_semicolon {
                        let token = self.make_inserted_semicolon();
                        self.consume_newline();
                        return token;
                    }
                    self.consume_newline();
                }
                Some(b'/') if self.bytes.get(self.current + 1) == Some(&b'/') => {
                    // The newline that ends the comment is handled on the next pass
                    self.skip_line_comment();
                }
                Some(b'/') if self.bytes.get(self.current + 1) == Some(&b'*') => {
                    let spans_lines = self.skip_block_comment();
                    if spans_lines && self.insert_semicolon {
                        return self.make_inserted_semicolon();
                    }
                }
                Some(_) => break,
            }
        }

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            // Single character tokens
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '~' => self.make_token(TokenType::Tilde),

            // Single or double character tokens
            '+' => {
                if self.match_byte(b'+') {
                    self.make_token(TokenType::PlusPlus)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenType::PlusEq)
                } else {
                    self.make_token(TokenType::Plus)
                }
            }
            '-' => {
                if self.match_byte(b'-') {
                    self.make_token(TokenType::MinusMinus)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenType::MinusEq)
                } else {
                    self.make_token(TokenType::Minus)
                }
            }
            '*' => self.with_assign(TokenType::Star, TokenType::StarEq),
            '/' => self.with_assign(TokenType::Slash, TokenType::SlashEq),
            '%' => self.with_assign(TokenType::Percent, TokenType::PercentEq),
            '^' => self.with_assign(TokenType::Caret, TokenType::CaretEq),
            '=' => self.with_assign(TokenType::Eq, TokenType::EqEq),
            '!' => self.with_assign(TokenType::Bang, TokenType::BangEq),
            ':' => self.with_assign(TokenType::Colon, TokenType::ColonEq),
            '&' => {
                if self.match_byte(b'&') {
                    self.make_token(TokenType::AmpAmp)
                } else if self.match_byte(b'^') {
                    self.with_assign(TokenType::AmpCaret, TokenType::AmpCaretEq)
                } else {
                    self.with_assign(TokenType::Ampersand, TokenType::AmpEq)
                }
            }
            '|' => {
                if self.match_byte(b'|') {
                    self.make_token(TokenType::PipePipe)
                } else {
                    self.with_assign(TokenType::Pipe, TokenType::PipeEq)
                }
            }
            '<' => {
                if self.match_byte(b'-') {
                    self.make_token(TokenType::Arrow)
                } else if self.match_byte(b'<') {
                    self.with_assign(TokenType::LessLess, TokenType::LessLessEq)
                } else {
                    self.with_assign(TokenType::Lt, TokenType::LtEq)
                }
            }
            '>' => {
                if self.match_byte(b'>') {
                    self.with_assign(TokenType::GreaterGreater, TokenType::GreaterGreaterEq)
                } else {
                    self.with_assign(TokenType::Gt, TokenType::GtEq)
                }
            }

            // Dot, ellipsis or a float like `.5`
            '.' => {
                if self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                    self.number()
                } else if self.bytes.get(self.current) == Some(&b'.')
                    && self.bytes.get(self.current + 1) == Some(&b'.')
                {
                    self.current += 2;
                    self.column += 2;
                    self.make_token(TokenType::Ellipsis)
                } else {
                    self.make_token(TokenType::Dot)
                }
            }

            '"' => self.string(),
            '`' => self.raw_string(),
            '\'' => self.rune(),

            c if c.is_ascii_digit() => self.number(),

            c if c == '_' || unicode_ident::is_xid_start(c) => self.identifier(),

            _ => self.error_unexpected_char(c),
        }
    }

    /// Skip spaces, tabs and carriage returns. Newlines are significant.
    #[inline]
    fn skip_whitespace(&mut self) {
        while self.current < self.bytes.len() {
            match self.bytes[self.current] {
                b' ' | b'\t' | b'\r' => {
                    self.current += 1;
                    self.column += 1;
                }
                _ => break,
            }
        }
    }

    #[inline]
    pub(crate) fn consume_newline(&mut self) {
        self.current += 1;
        self.line += 1;
        self.column = 1;
    }

    /// Advance to the next character and return it.
    /// Fast path for ASCII bytes (no UTF-8 decoding needed).
    #[inline]
    pub(crate) fn advance(&mut self) -> Option<char> {
        let b = *self.bytes.get(self.current)?;
        if b < UTF8_MULTIBYTE {
            self.current += 1;
            self.column += 1;
            Some(b as char)
        } else {
            let c = self.source[self.current..].chars().next()?;
            self.current += c.len_utf8();
            self.column += 1;
            Some(c)
        }
    }

    /// Peek at the next byte directly (for ASCII-only comparisons).
    #[inline]
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.current).copied()
    }

    /// Consume the next character if it matches the expected byte.
    #[inline]
    fn match_byte(&mut self, expected: u8) -> bool {
        debug_assert!(expected < UTF8_MULTIBYTE, "match_byte only works for ASCII");
        if self.current < self.bytes.len() && self.bytes[self.current] == expected {
            self.current += 1;
            self.column += 1;
            true
        } else {
            false
        }
    }

    /// `op` or, when followed by '=', `op_assign`.
    fn with_assign(&mut self, op: TokenType, op_assign: TokenType) -> Token<'src> {
        if self.match_byte(b'=') {
            self.make_token(op_assign)
        } else {
            self.make_token(op)
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        Span::new_with_end(
            self.start,
            self.current,
            self.start_line,
            self.start_column,
            self.line,
            self.column,
        )
    }

    /// Create a token from start to current position
    pub(crate) fn make_token(&self, ty: TokenType) -> Token<'src> {
        let lexeme = &self.source[self.start..self.current];
        Token::new(ty, lexeme, self.current_span())
    }

    fn make_inserted_semicolon(&mut self) -> Token<'src> {
        self.insert_semicolon = false;
        let span = Span::new(self.start, self.start, self.start_line, self.start_column);
        Token::new(TokenType::Semicolon, INSERTED_SEMICOLON, span)
    }

    /// Create an error token and collect an error for an unexpected character.
    fn error_unexpected_char(&mut self, c: char) -> Token<'src> {
        let span = self.current_span();
        tracing::debug!(char = %c, line = self.start_line, col = self.start_column, "lexer error: unexpected character");
        self.errors.push(LexerError::UnexpectedCharacter {
            ch: c,
            span: span.into(),
        });
        Token::new(TokenType::Error, format!("unexpected character '{}'", c), span)
    }

    /// Scan an identifier or keyword (supports Unicode XID).
    fn identifier(&mut self) -> Token<'src> {
        while self.current < self.bytes.len() {
            let b = self.bytes[self.current];
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.current += 1;
                self.column += 1;
            } else if b >= UTF8_MULTIBYTE {
                match self.source[self.current..].chars().next() {
                    Some(c) if unicode_ident::is_xid_continue(c) => {
                        self.current += c.len_utf8();
                        self.column += 1;
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        let text = &self.source[self.start..self.current];
        let ty = TokenType::keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }

    /// Skip a line comment up to, but not including, the newline.
    #[inline]
    fn skip_line_comment(&mut self) {
        while self.current < self.bytes.len() && self.bytes[self.current] != b'\n' {
            self.current += 1;
            self.column += 1;
        }
    }

    /// Skip a block comment. Returns true if it contained a newline.
    fn skip_block_comment(&mut self) -> bool {
        self.current += 2;
        self.column += 2;
        let mut spans_lines = false;
        loop {
            match self.peek_byte() {
                None => {
                    let span = self.current_span();
                    tracing::debug!(line = self.start_line, "lexer error: unterminated comment");
                    self.errors
                        .push(LexerError::UnterminatedComment { span: span.into() });
                    return spans_lines;
                }
                Some(b'*') if self.bytes.get(self.current + 1) == Some(&b'/') => {
                    self.current += 2;
                    self.column += 2;
                    return spans_lines;
                }
                Some(b'\n') => {
                    spans_lines = true;
                    self.consume_newline();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.ty != TokenType::Eof).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(source: &str) -> Vec<TokenType> {
        Lexer::new(source).map(|t| t.ty).collect()
    }

    #[test]
    fn lex_single_char_tokens() {
        let mut lexer = Lexer::new("( ) { } , : ~");
        assert_eq!(lexer.next_token().ty, TokenType::LParen);
        assert_eq!(lexer.next_token().ty, TokenType::RParen);
        assert_eq!(lexer.next_token().ty, TokenType::LBrace);
        assert_eq!(lexer.next_token().ty, TokenType::RBrace);
        assert_eq!(lexer.next_token().ty, TokenType::Comma);
        assert_eq!(lexer.next_token().ty, TokenType::Colon);
        assert_eq!(lexer.next_token().ty, TokenType::Tilde);
        assert_eq!(lexer.next_token().ty, TokenType::Eof);
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            types("<- << <<= &^ &^= := ... ++ != >="),
            vec![
                TokenType::Arrow,
                TokenType::LessLess,
                TokenType::LessLessEq,
                TokenType::AmpCaret,
                TokenType::AmpCaretEq,
                TokenType::ColonEq,
                TokenType::Ellipsis,
                TokenType::PlusPlus,
                TokenType::BangEq,
                TokenType::GtEq,
            ]
        );
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        assert_eq!(
            types("package main\n"),
            vec![
                TokenType::KwPackage,
                TokenType::Identifier,
                TokenType::Semicolon
            ]
        );
    }

    #[test]
    fn semicolon_inserted_after_identifier_at_line_end() {
        let mut lexer = Lexer::new("type A int\ntype B string");
        let tokens: Vec<_> = lexer.by_ref().collect();
        let semis: Vec<_> = tokens
            .iter()
            .filter(|t| t.ty == TokenType::Semicolon)
            .collect();
        // One after `int`, one at EOF after `string`
        assert_eq!(semis.len(), 2);
        assert!(semis.iter().all(|t| t.is_inserted_semicolon()));
    }

    #[test]
    fn no_semicolon_after_open_brace_or_comma() {
        assert_eq!(
            types("struct {\n}\n"),
            vec![
                TokenType::KwStruct,
                TokenType::LBrace,
                TokenType::RBrace,
                TokenType::Semicolon
            ]
        );
        assert_eq!(
            types("a,\nb"),
            vec![
                TokenType::Identifier,
                TokenType::Comma,
                TokenType::Identifier,
                TokenType::Semicolon
            ]
        );
    }

    #[test]
    fn line_comment_acts_as_newline() {
        assert_eq!(
            types("x // trailing\ny"),
            vec![
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Identifier,
                TokenType::Semicolon
            ]
        );
    }

    #[test]
    fn block_comment_with_newline_inserts_semicolon() {
        assert_eq!(
            types("x /* a\nb */ y"),
            vec![
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Identifier,
                TokenType::Semicolon
            ]
        );
        assert_eq!(
            types("x /* inline */ y"),
            vec![
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Semicolon
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut lexer = Lexer::new("package p\n\ntype  T int");
        let _ = lexer.next_token(); // package
        let _ = lexer.next_token(); // p
        let _ = lexer.next_token(); // ;
        let ty = lexer.next_token();
        assert_eq!(ty.ty, TokenType::KwType);
        assert_eq!((ty.span.line, ty.span.column), (3, 1));
        let name = lexer.next_token();
        assert_eq!(name.lexeme, "T");
        assert_eq!((name.span.line, name.span.column), (3, 7));
    }

    #[test]
    fn unicode_identifiers() {
        let mut lexer = Lexer::new("Größe");
        let token = lexer.next_token();
        assert_eq!(token.ty, TokenType::Identifier);
        assert_eq!(token.lexeme, "Größe");
    }

    #[test]
    fn unexpected_character_is_collected() {
        let mut lexer = Lexer::new("a $ b");
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert!(tokens.iter().any(|t| t.ty == TokenType::Error));
        let errors = lexer.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            LexerError::UnexpectedCharacter { ch: '$', .. }
        ));
    }

    #[test]
    fn unterminated_block_comment_is_collected() {
        let mut lexer = Lexer::new("x /* never closed");
        let _: Vec<_> = lexer.by_ref().collect();
        assert!(matches!(
            lexer.take_errors().as_slice(),
            [LexerError::UnterminatedComment { .. }]
        ));
    }
}
