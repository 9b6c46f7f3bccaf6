//! Document AST
//!
//! A closed set of node variants. [`File`] and [`TextBlock`] are the only
//! containers; everything else is a leaf. Parents own their children.
//!
//! Owned trees use [`Node`] (file body) and [`TextNode`] (text block
//! content). [`NodeRef`] is the borrowed view over all six variants used by
//! traversal and comparison.

use std::fmt;

use smol_str::SmolStr;

use crate::base::{NO_POS, Pos};
use crate::parser::Token;

/// `\import{name}` and similar inclusion commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Token of the introducing command (e.g. [`Token::IMPORT`])
    pub token: Token,
    /// Logical name from the braces
    pub name: SmolStr,
    /// Resolved path, filled in later by the module system
    pub path: String,
    pub pos: Pos,
    pub end: Pos,
}

impl ImportSpec {
    pub fn new(token: Token, name: impl Into<SmolStr>) -> Self {
        Self {
            token,
            name: name.into(),
            path: String::new(),
            pos: NO_POS,
            end: NO_POS,
        }
    }

    pub fn with_span(mut self, pos: Pos, end: Pos) -> Self {
        self.pos = pos;
        self.end = end;
        self
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn end(&self) -> Pos {
        self.end
    }
}

/// Root node of one parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    pub filename: SmolStr,
    pub imports: Vec<ImportSpec>,
    pub body: Vec<Node>,
    pub pos: Pos,
    pub end: Pos,
}

impl File {
    pub fn new(filename: impl Into<SmolStr>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Vec<Node>) -> Self {
        self.body = body;
        self
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn end(&self) -> Pos {
        self.end
    }
}

/// A run of text: words, single newlines and forced line breaks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub content: Vec<TextNode>,
    pub pos: Pos,
    pub end: Pos,
}

impl TextBlock {
    pub fn new(content: Vec<TextNode>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn end(&self) -> Pos {
        self.end
    }
}

macro_rules! leaf_span {
    ($($node:ident),* $(,)?) => {
        $(
            impl $node {
                pub fn with_span(mut self, pos: Pos, end: Pos) -> Self {
                    self.pos = pos;
                    self.end = end;
                    self
                }

                pub fn pos(&self) -> Pos {
                    self.pos
                }

                pub fn end(&self) -> Pos {
                    self.end
                }
            }
        )*
    };
}

leaf_span!(Word, Newline, LineBreak, Comment);

/// A word such as `hello` or `foo$bar`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub lit: SmolStr,
    pub pos: Pos,
    pub end: Pos,
}

impl Word {
    pub fn new(lit: impl Into<SmolStr>) -> Self {
        Self {
            lit: lit.into(),
            ..Self::default()
        }
    }
}

/// A single source line break, preserved syntactically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Newline {
    pub pos: Pos,
    pub end: Pos,
}

impl Newline {
    pub fn new() -> Self {
        Self::default()
    }
}

/// An explicit forced break (`\\`, `\newline`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineBreak {
    pub kind: SmolStr,
    pub pos: Pos,
    pub end: Pos,
}

impl LineBreak {
    pub fn new(kind: impl Into<SmolStr>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// A `%` comment, literal including the marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub lit: SmolStr,
    pub pos: Pos,
    pub end: Pos,
}

impl Comment {
    pub fn new(lit: impl Into<SmolStr>) -> Self {
        Self {
            lit: lit.into(),
            ..Self::default()
        }
    }
}

/// Children of a [`TextBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNode {
    Word(Word),
    Newline(Newline),
    LineBreak(LineBreak),
}

/// Any owned node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(File),
    TextBlock(TextBlock),
    Word(Word),
    Newline(Newline),
    LineBreak(LineBreak),
    Comment(Comment),
}

impl Node {
    pub fn view(&self) -> NodeRef<'_> {
        self.into()
    }

    pub fn pos(&self) -> Pos {
        self.view().pos()
    }

    pub fn end(&self) -> Pos {
        self.view().end()
    }
}

impl TextNode {
    pub fn view(&self) -> NodeRef<'_> {
        self.into()
    }

    pub fn pos(&self) -> Pos {
        self.view().pos()
    }

    pub fn end(&self) -> Pos {
        self.view().end()
    }
}

/// Borrowed view of any node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    File(&'a File),
    TextBlock(&'a TextBlock),
    Word(&'a Word),
    Newline(&'a Newline),
    LineBreak(&'a LineBreak),
    Comment(&'a Comment),
}

impl NodeRef<'_> {
    /// Position of the first character belonging to the node.
    pub fn pos(self) -> Pos {
        match self {
            NodeRef::File(n) => n.pos,
            NodeRef::TextBlock(n) => n.pos,
            NodeRef::Word(n) => n.pos,
            NodeRef::Newline(n) => n.pos,
            NodeRef::LineBreak(n) => n.pos,
            NodeRef::Comment(n) => n.pos,
        }
    }

    /// Position of the first character immediately after the node.
    pub fn end(self) -> Pos {
        match self {
            NodeRef::File(n) => n.end,
            NodeRef::TextBlock(n) => n.end,
            NodeRef::Word(n) => n.end,
            NodeRef::Newline(n) => n.end,
            NodeRef::LineBreak(n) => n.end,
            NodeRef::Comment(n) => n.end,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            NodeRef::File(_) => "File",
            NodeRef::TextBlock(_) => "TextBlock",
            NodeRef::Word(_) => "Word",
            NodeRef::Newline(_) => "Newline",
            NodeRef::LineBreak(_) => "LineBreak",
            NodeRef::Comment(_) => "Comment",
        }
    }
}

impl<'a> From<&'a File> for NodeRef<'a> {
    fn from(file: &'a File) -> Self {
        NodeRef::File(file)
    }
}

impl<'a> From<&'a TextBlock> for NodeRef<'a> {
    fn from(block: &'a TextBlock) -> Self {
        NodeRef::TextBlock(block)
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::File(n) => NodeRef::File(n),
            Node::TextBlock(n) => NodeRef::TextBlock(n),
            Node::Word(n) => NodeRef::Word(n),
            Node::Newline(n) => NodeRef::Newline(n),
            Node::LineBreak(n) => NodeRef::LineBreak(n),
            Node::Comment(n) => NodeRef::Comment(n),
        }
    }
}

impl<'a> From<&'a TextNode> for NodeRef<'a> {
    fn from(node: &'a TextNode) -> Self {
        match node {
            TextNode::Word(n) => NodeRef::Word(n),
            TextNode::Newline(n) => NodeRef::Newline(n),
            TextNode::LineBreak(n) => NodeRef::LineBreak(n),
        }
    }
}

macro_rules! into_node {
    ($($node:ident),* $(,)?) => {
        $(
            impl From<$node> for Node {
                fn from(node: $node) -> Self {
                    Node::$node(node)
                }
            }
        )*
    };
}

into_node!(File, TextBlock, Word, Newline, LineBreak, Comment);

impl From<Word> for TextNode {
    fn from(word: Word) -> Self {
        TextNode::Word(word)
    }
}

impl From<Newline> for TextNode {
    fn from(newline: Newline) -> Self {
        TextNode::Newline(newline)
    }
}

impl From<LineBreak> for TextNode {
    fn from(linebreak: LineBreak) -> Self {
        TextNode::LineBreak(linebreak)
    }
}

/// Short form for diagnostics: `Word("hello")`, `TextBlock[3: Word("a"), Newline, ...]`.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NodeRef::File(file) => {
                write!(f, "File[{} nodes", file.body.len())?;
                write_snippets(f, file.body.iter().map(NodeRef::from), file.body.len())?;
                f.write_str("]")
            }
            NodeRef::TextBlock(block) => {
                write!(f, "TextBlock[{}", block.content.len())?;
                write_snippets(f, block.content.iter().map(NodeRef::from), block.content.len())?;
                f.write_str("]")
            }
            NodeRef::Word(word) => write!(f, "Word({:?})", word.lit.as_str()),
            NodeRef::Newline(_) => f.write_str("Newline"),
            NodeRef::LineBreak(linebreak) => write!(f, "LineBreak({:?})", linebreak.kind.as_str()),
            NodeRef::Comment(comment) => write!(f, "Comment({:?})", comment.lit.as_str()),
        }
    }
}

/// Writes `: first, second` and `, ...` when more children follow.
fn write_snippets<'a>(
    f: &mut fmt::Formatter<'_>,
    children: impl Iterator<Item = NodeRef<'a>>,
    len: usize,
) -> fmt::Result {
    for (index, child) in children.take(2).enumerate() {
        f.write_str(if index == 0 { ": " } else { ", " })?;
        write!(f, "{child}")?;
    }
    if len > 2 {
        f.write_str(", ...")?;
    }
    Ok(())
}
