//! Token catalog for Gotex source
//!
//! A closed set of token kinds plus the classification helpers the scanner
//! uses to decide which kind a rune starts.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// All token kinds produced by the scanner
///
/// Variants are grouped in contiguous ranges: structure and content first,
/// then the single-character symbols, then the keyword commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Token {
    ILLEGAL = 0,
    EOF,
    COMMENT, // % This is a comment

    // =========================================================================
    // COMMANDS AND STRUCTURE
    // =========================================================================
    COMMAND,  // \documentclass, \section, ...
    LBRACE,   // {
    RBRACE,   // }
    LBRACKET, // [
    RBRACKET, // ]

    // =========================================================================
    // CONTENT
    // =========================================================================
    WORD,       // Hello
    NUMBER,     // 42
    WHITESPACE, // space, tab
    NEWLINE,    // \n

    // =========================================================================
    // SYMBOLS
    // =========================================================================
    PERIOD,    // .
    COMMA,     // ,
    SEMICOLON, // ;
    COLON,     // :

    EQUALS,    // =
    LESS,      // <
    GREATER,   // >
    BACKSLASH, // \
    SLASH,     // /
    ASTERISK,  // *
    BANG,      // !

    AMPERSAND,  // &
    DOLLAR,     // $
    PERCENT,    // %
    HASH,       // #
    CARET,      // ^
    HYPHEN,     // -
    UNDERSCORE, // _
    TILDE,      // ~
    PIPE,       // |
    AT,         // @

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    IMPORT, // \import
    ENV,    // \begin
    ENVEND, // \end
}

impl Token {
    /// Every token kind, in discriminant order.
    pub const ALL: [Token; 36] = [
        Token::ILLEGAL,
        Token::EOF,
        Token::COMMENT,
        Token::COMMAND,
        Token::LBRACE,
        Token::RBRACE,
        Token::LBRACKET,
        Token::RBRACKET,
        Token::WORD,
        Token::NUMBER,
        Token::WHITESPACE,
        Token::NEWLINE,
        Token::PERIOD,
        Token::COMMA,
        Token::SEMICOLON,
        Token::COLON,
        Token::EQUALS,
        Token::LESS,
        Token::GREATER,
        Token::BACKSLASH,
        Token::SLASH,
        Token::ASTERISK,
        Token::BANG,
        Token::AMPERSAND,
        Token::DOLLAR,
        Token::PERCENT,
        Token::HASH,
        Token::CARET,
        Token::HYPHEN,
        Token::UNDERSCORE,
        Token::TILDE,
        Token::PIPE,
        Token::AT,
        Token::IMPORT,
        Token::ENV,
        Token::ENVEND,
    ];

    /// Looks up a token kind by its discriminant.
    pub fn from_repr(raw: u8) -> Option<Token> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Renders a raw discriminant, using a `token(N)` placeholder for
    /// values outside the catalog.
    pub fn render_raw(raw: u8) -> String {
        match Self::from_repr(raw) {
            Some(tok) => tok.as_str().to_string(),
            None => format!("token({raw})"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Token::ILLEGAL => "ILLEGAL",
            Token::EOF => "EOF",
            Token::COMMENT => "COMMENT",

            Token::COMMAND => "COMMAND",
            Token::LBRACE => "LBRACE",
            Token::RBRACE => "RBRACE",
            Token::LBRACKET => "LBRACKET",
            Token::RBRACKET => "RBRACKET",

            Token::WORD => "WORD",
            Token::NUMBER => "NUMBER",
            Token::WHITESPACE => "WHITESPACE",
            Token::NEWLINE => "NEWLINE",

            Token::PERIOD => ".",
            Token::COMMA => ",",
            Token::SEMICOLON => ";",
            Token::COLON => ":",
            Token::EQUALS => "=",
            Token::LESS => "<",
            Token::GREATER => ">",
            Token::BACKSLASH => "\\",
            Token::SLASH => "/",
            Token::ASTERISK => "*",
            Token::BANG => "!",
            Token::AMPERSAND => "&",
            Token::DOLLAR => "$",
            Token::PERCENT => "%",
            Token::HASH => "#",
            Token::CARET => "^",
            Token::HYPHEN => "-",
            Token::UNDERSCORE => "_",
            Token::TILDE => "~",
            Token::PIPE => "|",
            Token::AT => "@",

            Token::IMPORT => "import",
            Token::ENV => "begin",
            Token::ENVEND => "end",
        }
    }

    /// Reports whether the token is one of the single-character symbols.
    pub fn is_symbol(self) -> bool {
        (Token::PERIOD..=Token::AT).contains(&self)
    }

    /// Reports whether the token is a keyword command.
    pub fn is_keyword(self) -> bool {
        (Token::IMPORT..=Token::ENVEND).contains(&self)
    }

    /// The character a symbol token stands for; inverse of [`lookup_symbol`].
    pub fn symbol_char(self) -> Option<char> {
        let ch = match self {
            Token::PERIOD => '.',
            Token::COMMA => ',',
            Token::SEMICOLON => ';',
            Token::COLON => ':',
            Token::EQUALS => '=',
            Token::LESS => '<',
            Token::GREATER => '>',
            Token::BACKSLASH => '\\',
            Token::SLASH => '/',
            Token::ASTERISK => '*',
            Token::BANG => '!',
            Token::AMPERSAND => '&',
            Token::DOLLAR => '$',
            Token::PERCENT => '%',
            Token::HASH => '#',
            Token::CARET => '^',
            Token::HYPHEN => '-',
            Token::UNDERSCORE => '_',
            Token::TILDE => '~',
            Token::PIPE => '|',
            Token::AT => '@',
            _ => return None,
        };
        Some(ch)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword spellings, stored without the leading backslash.
static KEYWORDS: LazyLock<FxHashMap<&'static str, Token>> = LazyLock::new(|| {
    Token::ALL
        .iter()
        .copied()
        .filter(|tok| tok.is_keyword())
        .map(|tok| (tok.as_str(), tok))
        .collect()
});

/// Maps a command name (without the backslash) to its keyword token, or
/// [`Token::COMMAND`] for every other name.
pub fn lookup_keyword(name: &str) -> Token {
    KEYWORDS.get(name).copied().unwrap_or(Token::COMMAND)
}

/// Returns the symbol token for `ch`, or [`Token::ILLEGAL`].
pub fn lookup_symbol(ch: char) -> Token {
    match ch {
        '.' => Token::PERIOD,
        ',' => Token::COMMA,
        ';' => Token::SEMICOLON,
        ':' => Token::COLON,

        '=' => Token::EQUALS,
        '<' => Token::LESS,
        '>' => Token::GREATER,
        '\\' => Token::BACKSLASH,
        '/' => Token::SLASH,
        '*' => Token::ASTERISK,
        '!' => Token::BANG,

        '&' => Token::AMPERSAND,
        '$' => Token::DOLLAR,
        '%' => Token::PERCENT,
        '#' => Token::HASH,
        '^' => Token::CARET,
        '-' => Token::HYPHEN,
        '_' => Token::UNDERSCORE,
        '~' => Token::TILDE,
        '|' => Token::PIPE,
        '@' => Token::AT,
        _ => Token::ILLEGAL,
    }
}

/// Reports whether `ch` is a registered symbol character.
pub fn is_symbol_char(ch: char) -> bool {
    lookup_symbol(ch) != Token::ILLEGAL
}

/// Reports whether `ch` can be part of a command name (ASCII letters).
pub fn is_command_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Reports whether `ch` starts or continues a word.
#[inline]
pub fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_alphabetic())
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Reports whether `ch` is skippable inline whitespace (space or tab).
#[inline]
pub fn is_space_char(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}
