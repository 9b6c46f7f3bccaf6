//! Parser for Gotex documents
//!
//! Drives a [`Scanner`] over one file and groups its tokens into a
//! [`syntax::ast::File`](crate::syntax::ast::File). Two modes exist: an
//! imports-only pass collecting `\import{...}` specs, and a full pass
//! grouping text into blocks, newlines, line breaks and comments.

use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use super::scanner::{self, CONTROL_SPACE, ErrorList, LINEBREAK, Scanner};
use super::token::Token;
use crate::base::{File, FileSet, Pos};
use crate::syntax::ast::{
    self, Comment, ImportSpec, LineBreak, Newline, Node, TextBlock, TextNode, Word,
};

/// Kind recorded for forced line breaks (`\\`, `\newline`).
const LINEBREAK_KIND: &str = "newline";

/// Parser feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode(u32);

impl Mode {
    /// Only collect `\import` statements
    pub const IMPORTS_ONLY: Mode = Mode(1);
    /// Build the full document tree
    pub const PARSE_FULL: Mode = Mode(1 << 1);

    pub const fn empty() -> Self {
        Mode(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every flag of `other` is set.
    pub const fn contains(self, other: Mode) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported parse mode {0:?}")]
    UnsupportedMode(Mode),
}

/// Parse result containing the tree and any scanner errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub file: ast::File,
    pub errors: Vec<scanner::Error>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses `src`, the content of `file`, according to `mode`.
///
/// `file` must be registered in `fset` with `file.size() == src.len()`.
/// When both flags are set, [`Mode::IMPORTS_ONLY`] wins.
pub fn parse(fset: &FileSet, file: &File, src: &[u8], mode: Mode) -> Result<Parse, ParseError> {
    let imports_only = mode.contains(Mode::IMPORTS_ONLY);
    if !imports_only && !mode.contains(Mode::PARSE_FULL) {
        return Err(ParseError::UnsupportedMode(mode));
    }
    tracing::debug!(file = file.name(), ?mode, "parse started");

    let mut errors = ErrorList::new();
    let mut root = ast::File::new(file.name());
    root.pos = file.pos(0);
    root.end = file.pos(src.len());
    {
        let mut parser = Parser::new(fset, file, src, errors.handler());
        if imports_only {
            root.imports = parser.parse_imports();
        } else {
            root.body = parser.parse_body();
        }
    }

    let errors = errors.into_vec();
    tracing::debug!(
        file = file.name(),
        nodes = root.body.len(),
        imports = root.imports.len(),
        errors = errors.len(),
        "parse finished"
    );
    Ok(Parse { file: root, errors })
}

/// Parses many registered files in parallel. Results are in input order.
pub fn parse_files<S>(
    fset: &FileSet,
    inputs: &[(Arc<File>, S)],
    mode: Mode,
) -> Vec<Result<Parse, ParseError>>
where
    S: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|(file, src)| parse(fset, file, src.as_ref(), mode))
        .collect()
}

/// The parser state: the scanner plus a one-token lookahead.
struct Parser<'a> {
    scanner: Scanner<'a>,
    file: &'a File,

    pos: Pos,
    /// First coordinate after the current token
    end: Pos,
    tok: Token,
    lit: String,
}

impl<'a> Parser<'a> {
    fn new(
        fset: &'a FileSet,
        file: &'a File,
        src: &'a [u8],
        err: scanner::ErrorHandler<'a>,
    ) -> Self {
        let mut parser = Self {
            scanner: Scanner::new(fset, file, src, Some(err)),
            file,
            pos: file.pos(0),
            end: file.pos(0),
            tok: Token::ILLEGAL,
            lit: String::new(),
        };
        parser.bump();
        parser
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn bump(&mut self) {
        (self.pos, self.tok, self.lit) = self.scanner.scan();
        self.end = self.file.pos(self.scanner.offset());
    }

    fn at_command(&self, name: &str) -> bool {
        self.tok == Token::COMMAND && self.lit == name
    }

    fn at_word(&self) -> bool {
        matches!(self.tok, Token::WORD | Token::NUMBER) || self.tok.is_symbol()
    }

    /// Tokens that start a text block.
    fn at_text(&self) -> bool {
        self.at_word() || self.at_command(LINEBREAK)
    }

    /// Tokens that keep a text block going after a single newline.
    fn at_text_continuation(&self) -> bool {
        self.at_text() || self.at_command(CONTROL_SPACE)
    }

    fn skip(&mut self) {
        tracing::trace!(
            file = self.file.name(),
            pos = %self.pos,
            token = %self.tok,
            lit = %self.lit,
            "skipped token"
        );
        self.bump();
    }

    // =========================================================================
    // Imports-only mode
    // =========================================================================

    fn parse_imports(&mut self) -> Vec<ImportSpec> {
        let mut imports = Vec::new();
        while self.tok != Token::EOF {
            if self.tok == Token::IMPORT {
                if let Some(spec) = self.parse_import() {
                    imports.push(spec);
                }
            } else {
                self.bump();
            }
        }
        imports
    }

    /// `\import{name}`; a malformed construct is discarded and the token
    /// that broke it is left for the caller.
    fn parse_import(&mut self) -> Option<ImportSpec> {
        let (token, pos) = (self.tok, self.pos);
        self.bump();
        if self.tok != Token::LBRACE {
            return self.discard_import(pos, "missing opening brace");
        }
        self.bump();

        let mut name = String::new();
        loop {
            match self.tok {
                Token::RBRACE => {
                    let end = self.end;
                    self.bump();
                    if name.is_empty() {
                        return self.discard_import(pos, "empty import name");
                    }
                    return Some(ImportSpec::new(token, name).with_span(pos, end));
                }
                Token::NEWLINE | Token::EOF | Token::LBRACE => {
                    return self.discard_import(pos, "missing closing brace");
                }
                _ => {
                    name.push_str(&self.lit);
                    self.bump();
                }
            }
        }
    }

    fn discard_import(&self, pos: Pos, reason: &str) -> Option<ImportSpec> {
        tracing::debug!(file = self.file.name(), %pos, reason, "discarded import");
        None
    }

    // =========================================================================
    // Full mode
    // =========================================================================

    fn parse_body(&mut self) -> Vec<Node> {
        let mut body = Vec::new();
        while self.tok != Token::EOF {
            match self.tok {
                Token::COMMENT => {
                    let end = self.pos.offset_by(self.lit.len());
                    body.push(Comment::new(self.lit.as_str()).with_span(self.pos, end).into());
                    self.bump();
                }
                Token::NEWLINE => {
                    body.push(self.newline().into());
                    self.bump();
                }
                _ if self.at_text() => self.parse_text_block(&mut body),
                _ => self.skip(),
            }
        }
        body
    }

    /// Groups text tokens into one block pushed onto `body`. A newline that
    /// ends the block without a blank line is pushed after it.
    fn parse_text_block(&mut self, body: &mut Vec<Node>) {
        let mut content: Vec<TextNode> = Vec::new();
        let mut trailing = None;

        loop {
            match self.tok {
                _ if self.at_word() => {
                    let word = Word::new(self.lit.as_str()).with_span(self.pos, self.end);
                    content.push(word.into());
                    self.bump();
                }
                Token::COMMAND if self.lit == LINEBREAK => {
                    content.push(self.linebreak().into());
                    self.bump();
                    if self.tok == Token::NEWLINE {
                        self.bump();
                    }
                    break;
                }
                Token::NEWLINE => {
                    let newline = self.newline();
                    self.bump();
                    if self.at_text_continuation() {
                        content.push(newline.into());
                    } else if self.tok == Token::NEWLINE {
                        // blank line: the block keeps this newline, the next one is top level
                        content.push(newline.into());
                        break;
                    } else {
                        trailing = Some(newline);
                        break;
                    }
                }
                Token::COMMENT | Token::EOF => break,
                // control space and unsupported tokens end nothing
                _ => self.skip(),
            }
        }

        if let (Some(first), Some(last)) = (content.first(), content.last()) {
            let (pos, end) = (first.pos(), last.end());
            let mut block = TextBlock::new(content);
            block.pos = pos;
            block.end = end;
            body.push(block.into());
        }
        if let Some(newline) = trailing {
            body.push(newline.into());
        }
    }

    fn newline(&self) -> Newline {
        Newline::new().with_span(self.pos, self.pos.offset_by(1))
    }

    fn linebreak(&self) -> LineBreak {
        LineBreak::new(LINEBREAK_KIND).with_span(self.pos, self.end)
    }
}
