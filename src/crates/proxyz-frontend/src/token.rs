// src/crates/proxyz-frontend/src/token.rs

/// Single source of truth for keyword-to-token mapping.
///
/// Each entry `"text" => Variant` generates:
/// - A match arm in `TokenType::keyword_type`: `"text" => Some(TokenType::Variant)`
/// - A match arm in `TokenType::as_str`:       `Self::Variant => "text"`
macro_rules! define_keywords {
    ( $( $text:literal => $variant:ident ),+ $(,)? ) => {
        impl TokenType {
            /// Check if a string is a keyword and return its token type.
            pub fn keyword_type(text: &str) -> Option<TokenType> {
                match text {
                    $( $text => Some(TokenType::$variant), )+
                    _ => None,
                }
            }

            /// String representation for keyword tokens (used by `as_str`).
            fn keyword_as_str(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    "break"       => KwBreak,
    "case"        => KwCase,
    "chan"        => KwChan,
    "const"       => KwConst,
    "continue"    => KwContinue,
    "default"     => KwDefault,
    "defer"       => KwDefer,
    "else"        => KwElse,
    "fallthrough" => KwFallthrough,
    "for"         => KwFor,
    "func"        => KwFunc,
    "go"          => KwGo,
    "goto"        => KwGoto,
    "if"          => KwIf,
    "import"      => KwImport,
    "interface"   => KwInterface,
    "map"         => KwMap,
    "package"     => KwPackage,
    "range"       => KwRange,
    "return"      => KwReturn,
    "select"      => KwSelect,
    "struct"      => KwStruct,
    "switch"      => KwSwitch,
    "type"        => KwType,
    "var"         => KwVar,
}

/// All token types in Go source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    FloatLiteral,
    ImagLiteral,
    RuneLiteral,
    StringLiteral,
    RawStringLiteral, // `...`
    Identifier,

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Arithmetic and bitwise operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    LessLess,       // <<
    GreaterGreater, // >>
    AmpCaret,       // &^
    Tilde,          // ~

    // Assignment operators
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LessLessEq,
    GreaterGreaterEq,
    AmpCaretEq,
    Eq,
    ColonEq, // :=

    // Logical and comparison operators
    AmpAmp,
    PipePipe,
    Arrow, // <-
    PlusPlus,
    MinusMinus,
    EqEq,
    BangEq,
    Bang,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon, // explicit ';' or inserted at a line end
    Colon,
    Dot,
    Ellipsis, // ...

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        if let Some(s) = self.keyword_as_str() {
            return s;
        }
        match self {
            Self::IntLiteral => "integer",
            Self::FloatLiteral => "float",
            Self::ImagLiteral => "imaginary",
            Self::RuneLiteral => "rune",
            Self::StringLiteral => "string",
            Self::RawStringLiteral => "raw string",
            Self::Identifier => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::AmpCaret => "&^",
            Self::Tilde => "~",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::AmpEq => "&=",
            Self::PipeEq => "|=",
            Self::CaretEq => "^=",
            Self::LessLessEq => "<<=",
            Self::GreaterGreaterEq => ">>=",
            Self::AmpCaretEq => "&^=",
            Self::Eq => "=",
            Self::ColonEq => ":=",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Arrow => "<-",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Bang => "!",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Eof => "end of file",
            Self::Error => "error",
            // All keyword variants are handled by `keyword_as_str()` above.
            _ => unreachable!("keyword variant not covered by define_keywords! macro"),
        }
    }

    /// A line ending after a token of this type becomes a semicolon.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::ImagLiteral
                | Self::RuneLiteral
                | Self::StringLiteral
                | Self::RawStringLiteral
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::PlusPlus
                | Self::MinusMinus
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }

    /// Tokens that can begin a type expression.
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::Star
                | Self::LBracket
                | Self::LParen
                | Self::Arrow
                | Self::KwMap
                | Self::KwChan
                | Self::KwFunc
                | Self::KwStruct
                | Self::KwInterface
        )
    }
}

// Re-export Span from proxyz-identity (canonical definition)
pub use proxyz_identity::Span;

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub ty: TokenType,
    pub lexeme: std::borrow::Cow<'src, str>,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(ty: TokenType, lexeme: impl Into<std::borrow::Cow<'src, str>>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True for a semicolon the lexer inserted at a line end.
    pub fn is_inserted_semicolon(&self) -> bool {
        self.ty == TokenType::Semicolon && self.lexeme != ";"
    }
}
