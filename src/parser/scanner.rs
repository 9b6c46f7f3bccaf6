//! Hand-written scanner for Gotex source
//!
//! Produces one `(Pos, Token, literal)` triple per [`Scanner::scan`] call and
//! registers line starts in the bound [`File`] as it advances. Lexical errors
//! never stop the scan: they are reported through the injected
//! [`ErrorHandler`] and the offending input becomes an [`Token::ILLEGAL`].

use std::fmt;
use std::io;

use crate::base::{File, FileSet, Pos, Position};

use super::token::{
    Token, is_command_char, is_digit, is_letter, is_space_char, is_symbol_char, lookup_keyword,
    lookup_symbol,
};

/// Literal of the forced line break command (`\\` and `\newline`).
pub const LINEBREAK: &str = "linebreak";

/// Literal of the control space command (`\` followed by a space or tab).
pub const CONTROL_SPACE: &str = "space";

const BOM: char = '\u{FEFF}';

/// Callback receiving every lexical diagnostic.
pub type ErrorHandler<'a> = Box<dyn FnMut(&Position, &str) + 'a>;

/// A lexical diagnostic with its resolved position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Error {
    pub pos: Position,
    pub msg: String,
}

impl Error {
    pub fn new(pos: Position, msg: impl Into<String>) -> Self {
        Self {
            pos,
            msg: msg.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pos.is_valid() {
            write!(f, "{}: {}", self.pos, self.msg)
        } else {
            f.write_str(&self.msg)
        }
    }
}

impl std::error::Error for Error {}

/// A list of scanner errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<Error>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pos: Position, msg: impl Into<String>) {
        self.0.push(Error::new(pos, msg));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// Sorts by filename, line, column, then message.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            (&a.pos.filename, a.pos.line, a.pos.column, &a.msg)
                .cmp(&(&b.pos.filename, b.pos.line, b.pos.column, &b.msg))
        });
    }

    /// Sorts the list and keeps only the first error per line.
    pub fn remove_multiples(&mut self) {
        self.sort();
        self.0.dedup_by(|b, a| a.pos.filename == b.pos.filename && a.pos.line == b.pos.line);
    }

    /// An [`ErrorHandler`] appending to this list.
    pub fn handler(&mut self) -> ErrorHandler<'_> {
        Box::new(move |pos: &Position, msg: &str| self.add(pos.clone(), msg))
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.0
    }
}

impl From<Vec<Error>> for ErrorList {
    fn from(errors: Vec<Error>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("no errors"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

impl std::error::Error for ErrorList {}

/// An [`ErrorHandler`] writing `position: message` lines to `w`.
pub fn print_errors<'a, W: io::Write + 'a>(mut w: W) -> ErrorHandler<'a> {
    Box::new(move |pos: &Position, msg: &str| {
        // write errors are ignored
        let _ = writeln!(w, "{pos}: {msg}");
    })
}

/// An [`ErrorHandler`] emitting each diagnostic as a `tracing` warning.
pub fn log_errors() -> ErrorHandler<'static> {
    Box::new(|pos: &Position, msg: &str| tracing::warn!(position = %pos, "{msg}"))
}

/// Scanner state over one file's content.
pub struct Scanner<'a> {
    src: &'a [u8],
    file: &'a File,
    fset: &'a FileSet,
    err: Option<ErrorHandler<'a>>,
    error_count: usize,

    /// Current character, `None` at end of input
    ch: Option<char>,
    /// Offset of `ch`
    offset: usize,
    /// Offset just past `ch`
    rd_offset: usize,
    /// `ch` was already reported while decoding it
    ch_reported: bool,
}

impl<'a> Scanner<'a> {
    /// Binds a scanner to `file`, whose size must equal `src.len()`.
    pub fn new(
        fset: &'a FileSet,
        file: &'a File,
        src: &'a [u8],
        err: Option<ErrorHandler<'a>>,
    ) -> Self {
        let mut scanner = Self {
            src,
            file,
            fset,
            err: None,
            error_count: 0,
            ch: None,
            offset: 0,
            rd_offset: 0,
            ch_reported: false,
        };
        scanner.init(fset, file, src, err);
        scanner
    }

    /// Re-binds the scanner to new content, restarting at offset 0.
    ///
    /// Panics if the file size does not match `src.len()`.
    pub fn init(
        &mut self,
        fset: &'a FileSet,
        file: &'a File,
        src: &'a [u8],
        err: Option<ErrorHandler<'a>>,
    ) {
        if file.size() != src.len() {
            panic!(
                "file size ({}) does not match src len ({})",
                file.size(),
                src.len()
            );
        }
        self.src = src;
        self.file = file;
        self.fset = fset;
        self.err = err;
        self.error_count = 0;

        self.ch = None;
        self.offset = 0;
        self.rd_offset = 0;
        self.ch_reported = false;

        self.advance();
        if self.ch == Some(BOM) {
            self.advance(); // ignore BOM at file beginning
        }
    }

    pub fn file(&self) -> &'a File {
        self.file
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Offset just past the last scanned token, before any following
    /// whitespace is skipped.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Iterates over every token before `EOF`.
    pub fn tokens(&mut self) -> impl Iterator<Item = (Pos, Token, String)> + '_ {
        std::iter::from_fn(move || {
            let (pos, tok, lit) = self.scan();
            (tok != Token::EOF).then_some((pos, tok, lit))
        })
    }

    /// Scans the next token.
    ///
    /// At end of input this keeps returning `(end, EOF, "EOF")`.
    pub fn scan(&mut self) -> (Pos, Token, String) {
        loop {
            self.skip_whitespace();
            let pos = self.file.pos(self.offset);

            let Some(ch) = self.ch else {
                return (pos, Token::EOF, "EOF".to_string());
            };

            let (tok, lit) = match ch {
                '\\' => match self.scan_escape() {
                    Some(scanned) => scanned,
                    // line continuation
                    None => continue,
                },
                '\n' => {
                    self.advance();
                    (Token::NEWLINE, "\n".to_string())
                }
                '%' => (Token::COMMENT, self.scan_comment()),
                '{' => self.single(Token::LBRACE, ch),
                '}' => self.single(Token::RBRACE, ch),
                '[' => self.single(Token::LBRACKET, ch),
                ']' => self.single(Token::RBRACKET, ch),
                ch if is_letter(ch) => (Token::WORD, self.scan_word(None)),
                ch if is_digit(ch) => (Token::NUMBER, self.scan_number()),
                ch if is_symbol_char(ch) => self.single(lookup_symbol(ch), ch),
                ch => {
                    let offs = self.offset;
                    let reported = self.ch_reported;
                    self.advance();
                    if !reported {
                        self.error(offs, format!("illegal character {}", describe(ch)));
                    }
                    (Token::ILLEGAL, ch.to_string())
                }
            };
            return (pos, tok, lit);
        }
    }

    // =========================================================================
    // Character reading
    // =========================================================================

    /// Reads the next character into `ch`, registering a line start when
    /// stepping past a newline.
    fn advance(&mut self) {
        let at_newline = self.ch == Some('\n');
        self.ch_reported = false;

        if self.rd_offset < self.src.len() {
            self.offset = self.rd_offset;
            if at_newline {
                self.file.add_line(self.offset);
            }
            let (ch, width) = self.decode();
            self.rd_offset += width;
            self.ch = Some(ch);
        } else {
            self.offset = self.src.len();
            if at_newline {
                self.file.add_line(self.offset);
            }
            self.ch = None;
        }
    }

    /// Decodes the character at `rd_offset`, reporting malformed input.
    fn decode(&mut self) -> (char, usize) {
        let src = self.src;
        let rest = &src[self.rd_offset..];
        match rest[0] {
            0 => {
                self.report(self.offset, "illegal character NUL");
                ('\0', 1)
            }
            b if b.is_ascii() => (b as char, 1),
            _ => match decode_utf8(rest) {
                Some((ch, width)) => {
                    if ch == BOM && self.offset > 0 {
                        self.report(self.offset, "illegal byte order mark");
                    }
                    (ch, width)
                }
                None if self.offset == 0 && is_utf16_bom(rest) => {
                    self.report(self.offset, "illegal UTF-8 encoding (got UTF-16)");
                    // consume everything, the rest would only cascade errors
                    (char::REPLACEMENT_CHARACTER, rest.len())
                }
                None => {
                    self.report(self.offset, "illegal UTF-8 encoding");
                    (char::REPLACEMENT_CHARACTER, 1)
                }
            },
        }
    }

    /// Looks at the character after `ch` without consuming it.
    fn peek(&self) -> Option<char> {
        self.src
            .get(self.rd_offset..)
            .and_then(decode_utf8)
            .map(|(ch, _)| ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.ch {
            // CR of a CRLF pair is dropped, the LF still becomes a NEWLINE
            if is_space_char(ch) || (ch == '\r' && self.peek() == Some('\n')) {
                self.advance();
            } else {
                break;
            }
        }
    }

    // =========================================================================
    // Token scanning
    // =========================================================================

    fn single(&mut self, tok: Token, ch: char) -> (Token, String) {
        self.advance();
        (tok, ch.to_string())
    }

    /// Scans what follows a backslash. Returns `None` for a line
    /// continuation, which produces no token.
    fn scan_escape(&mut self) -> Option<(Token, String)> {
        let offs = self.offset;
        self.advance(); // consume '\'

        let scanned = match self.ch {
            Some('\\') => {
                self.advance();
                (Token::COMMAND, LINEBREAK.to_string())
            }
            Some(ch) if is_command_char(ch) => self.scan_command(),
            Some(ch) if is_symbol_char(ch) => (Token::WORD, self.scan_word(Some(ch))),
            Some(ch) if is_space_char(ch) => {
                self.advance();
                (Token::COMMAND, CONTROL_SPACE.to_string())
            }
            Some('\n') => {
                self.advance();
                return None;
            }
            Some('\r') if self.peek() == Some('\n') => {
                self.advance();
                self.advance();
                return None;
            }
            Some(ch) => {
                let reported = self.ch_reported;
                self.advance();
                if !reported {
                    self.error(offs, format!("illegal escape sequence \\{}", describe(ch)));
                }
                (Token::ILLEGAL, ch.to_string())
            }
            None => {
                self.error(offs, "escape sequence not terminated");
                (Token::ILLEGAL, "\\".to_string())
            }
        };
        Some(scanned)
    }

    /// Scans a command name; `ch` is its first character.
    fn scan_command(&mut self) -> (Token, String) {
        let offs = self.offset;
        while self.ch.is_some_and(is_command_char) {
            self.advance();
        }
        let name = String::from_utf8_lossy(&self.src[offs..self.offset]).into_owned();
        if name == "newline" {
            return (Token::COMMAND, LINEBREAK.to_string());
        }
        (lookup_keyword(&name), name)
    }

    /// Scans a word. `escaped` is the symbol of a leading `\<symbol>` whose
    /// backslash has already been consumed; `ch` is that symbol.
    ///
    /// An escaped symbol inside the word is spliced in without its
    /// backslash. Before consuming a backslash the next character is
    /// peeked, so a backslash that does not escape a symbol is left for the
    /// next token.
    fn scan_word(&mut self, escaped: Option<char>) -> String {
        let mut word = String::new();
        if let Some(symbol) = escaped {
            word.push(symbol);
            self.advance();
        }

        while let Some(ch) = self.ch {
            if is_letter(ch) || is_digit(ch) {
                word.push(ch);
                self.advance();
            } else if ch == '\\' && self.peek().is_some_and(is_word_escape) {
                self.advance(); // consume '\'
                if let Some(symbol) = self.ch {
                    word.push(symbol);
                }
                self.advance();
            } else {
                break;
            }
        }
        word
    }

    fn scan_number(&mut self) -> String {
        let offs = self.offset;
        while self.ch.is_some_and(is_digit) {
            self.advance();
        }
        String::from_utf8_lossy(&self.src[offs..self.offset]).into_owned()
    }

    /// Scans a comment up to, but excluding, the line terminator.
    fn scan_comment(&mut self) -> String {
        let offs = self.offset;
        while self.ch.is_some_and(|ch| ch != '\n') {
            self.advance();
        }
        let end = match self.src[..self.offset].last() {
            Some(b'\r') if self.ch == Some('\n') => self.offset - 1,
            _ => self.offset,
        };
        String::from_utf8_lossy(&self.src[offs..end]).into_owned()
    }

    // =========================================================================
    // Error reporting
    // =========================================================================

    fn error(&mut self, offs: usize, msg: impl AsRef<str>) {
        self.error_count += 1;
        if let Some(handler) = self.err.as_mut() {
            let pos = self.fset.position(self.file.pos(offs));
            handler(&pos, msg.as_ref());
        }
    }

    /// Reports a problem with the character being decoded.
    fn report(&mut self, offs: usize, msg: &str) {
        self.ch_reported = true;
        self.error(offs, msg);
    }
}

/// A symbol that may be escaped inside a word; the escaped backslash is
/// the forced line break instead.
fn is_word_escape(ch: char) -> bool {
    ch != '\\' && is_symbol_char(ch)
}

fn is_utf16_bom(bytes: &[u8]) -> bool {
    matches!(bytes, [0xFF, 0xFE, ..] | [0xFE, 0xFF, ..])
}

/// Decodes the first UTF-8 character of `bytes`.
fn decode_utf8(bytes: &[u8]) -> Option<(char, usize)> {
    let chunk = &bytes[..bytes.len().min(4)];
    let valid = match std::str::from_utf8(chunk) {
        Ok(text) => text,
        Err(err) => std::str::from_utf8(&chunk[..err.valid_up_to()]).ok()?,
    };
    valid.chars().next().map(|ch| (ch, ch.len_utf8()))
}

/// Formats a character as `U+0041 'A'`.
fn describe(ch: char) -> String {
    if ch.is_control() {
        format!("U+{:04X}", ch as u32)
    } else {
        format!("U+{:04X} '{ch}'", ch as u32)
    }
}
