//! Parser Tests
//!
//! Full-text grouping checked against the words_only fixture, plus the
//! imports-only pass over small documents.

use gotex::base::FileSet;
use gotex::parser::{Mode, Parse, Token, parse};
use gotex::syntax::{
    Comment, CompareOptions, CompareVisitor, File, LineBreak, Newline, Node, TextBlock, TextNode,
    Word, walk,
};

const WORDS_ONLY: &str = include_str!("testdata/words_only.gtex");

fn parse_source(name: &str, src: &str, mode: Mode) -> (FileSet, Parse) {
    let fset = FileSet::new();
    let file = fset.add_file(name, fset.base(), src.len());
    let parse = parse(&fset, &file, src.as_bytes(), mode).unwrap();
    (fset, parse)
}

/// Comment lines, each followed by its newline.
fn comments(lines: &[&str]) -> Vec<Node> {
    lines
        .iter()
        .flat_map(|lit| [Node::from(Comment::new(*lit)), Node::from(Newline::new())])
        .collect()
}

/// A text block from space separated words; `NL` is a newline and `BR` a
/// forced line break.
fn block(words: &str) -> Node {
    let content = words
        .split_whitespace()
        .map(|word| match word {
            "NL" => TextNode::from(Newline::new()),
            "BR" => TextNode::from(LineBreak::new("newline")),
            lit => TextNode::from(Word::new(lit)),
        })
        .collect();
    Node::from(TextBlock::new(content))
}

const RULE: &str = "% ------------------------------------------------";

fn words_only_expected() -> File {
    let mut body = Vec::new();
    body.extend(comments(&[
        "% words_only.gtex",
        "% This file demonstrates newline behavior in Gotex",
        "% using plain words and implicit layout, no macros or punctuation.",
        RULE,
        "% Variant 1: Double newline (blank line)",
        "% This creates a new paragraph in LaTeX/Gotex.",
        "% Paragraphs are separated by vertical space.",
        RULE,
    ]));
    body.push(block("hello world NL"));
    body.push(Newline::new().into());
    body.push(block("this is a new paragraph using a double newline NL"));
    body.push(Newline::new().into());

    body.extend(comments(&[
        RULE,
        "% Variant 2: Single newline",
        "% LaTeX and Gotex ignore single newlines and treat them as spaces.",
        "% The result is one continuous paragraph.",
        RULE,
    ]));
    body.push(block(
        "this is a single line NL broken across multiple NL source lines but rendered NL as a single paragraph NL",
    ));
    body.push(Newline::new().into());

    body.extend(comments(&[
        RULE,
        "% Variant 3: Forced line break using `\\\\`",
        "% This causes an explicit line break within a paragraph.",
        "% It is like pressing \"Enter\" but without ending the paragraph.",
        RULE,
    ]));
    body.push(block("this line ends here BR"));
    body.push(block("and this starts on the next line BR"));
    body.push(block("still within the same paragraph"));
    body.push(Newline::new().into());

    body.extend(comments(&[
        RULE,
        "% Summary:",
        "% - Double newline → new paragraph",
        "% - Single newline → treated as space",
        "% - `\\\\` → line break, same paragraph",
        "% Gotex implicitly wraps all this in:",
        "%",
        "% \\documentclass{article}",
        "% \\begin{document}",
        "% ...",
        "% \\end{document}",
        RULE,
    ]));

    File::new("words_only.gtex").with_body(body)
}

#[test]
fn test_parse_words_only_file() {
    let (fset, parse) = parse_source("words_only.gtex", WORDS_ONLY, Mode::PARSE_FULL);
    assert!(parse.ok(), "errors: {:?}", parse.errors);
    assert!(!parse.file.body.is_empty());

    for node in &parse.file.body {
        assert!(fset.position(node.pos()).is_valid());
        assert!(node.pos() < node.end());
    }
}

#[test]
fn test_words_only_compare() {
    let (_, parse) = parse_source("words_only.gtex", WORDS_ONLY, Mode::PARSE_FULL);
    let expected = words_only_expected();

    let mut visitor = CompareVisitor::new(&expected, CompareOptions::default());
    walk(&mut visitor, &parse.file);
    if let Err(mismatch) = visitor.finish() {
        panic!("{mismatch}");
    }
}

#[test]
fn test_words_only_positions() {
    let (fset, parse) = parse_source("words_only.gtex", WORDS_ONLY, Mode::PARSE_FULL);
    let Some(Node::TextBlock(first)) = parse.file.body.get(16) else {
        panic!("expected the first text block at index 16");
    };
    let position = fset.position(first.pos);
    assert_eq!((position.line, position.column), (9, 1));

    let TextNode::Word(world) = &first.content[1] else {
        panic!("expected a word");
    };
    assert_eq!(world.lit, "world");
    let position = fset.position(world.pos);
    assert_eq!((position.line, position.column), (9, 7));
    assert_eq!(world.end.raw() - world.pos.raw(), 5);

    assert_eq!(parse.file.pos, fset.files()[0].pos(0));
    assert_eq!(parse.file.end, fset.files()[0].pos(WORDS_ONLY.len()));
}

#[test]
fn test_escaped_word_end_is_next_source_byte() {
    let src = "foo\\$bar baz\n";
    let (fset, parse) = parse_source("escape.gtex", src, Mode::PARSE_FULL);
    let Some(Node::TextBlock(block)) = parse.file.body.first() else {
        panic!("expected a text block");
    };
    let [TextNode::Word(escaped), TextNode::Word(next), ..] = block.content.as_slice() else {
        panic!("expected two words");
    };

    let file = &fset.files()[0];
    assert_eq!(escaped.lit, "foo$bar");
    assert_eq!(escaped.end, file.pos(8));
    assert_eq!(file.offset(escaped.end), src.find(' ').unwrap());
    assert_eq!(next.pos, file.pos(9));
    assert_eq!(next.end, file.pos(12));
}

#[test]
fn test_imports_only() {
    let src = "% preamble\n\\import{chapters/intro}\nSome text \\import{appendix}\n";
    let (fset, parse) = parse_source("main.gtex", src, Mode::IMPORTS_ONLY);

    assert!(parse.file.body.is_empty());
    let imports: Vec<_> = parse
        .file
        .imports
        .iter()
        .map(|spec| (spec.token, spec.name.as_str(), spec.path.as_str()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (Token::IMPORT, "chapters/intro", ""),
            (Token::IMPORT, "appendix", ""),
        ]
    );

    let start = fset.position(parse.file.imports[1].pos);
    assert_eq!((start.line, start.column), (3, 11));
    let end = fset.position(parse.file.imports[1].end);
    assert_eq!((end.line, end.column), (3, 28));
}

#[test]
fn test_imports_only_discards_unclosed() {
    let src = "\\import{broken\n\\import{nested{x}}\n\\import{fine}";
    let (_, parse) = parse_source("bad.gtex", src, Mode::IMPORTS_ONLY);
    let names: Vec<_> = parse.file.imports.iter().map(|spec| spec.name.as_str()).collect();
    assert_eq!(names, vec!["fine"]);
}

#[test]
fn test_imports_only_on_words_only_file() {
    let (_, parse) = parse_source("words_only.gtex", WORDS_ONLY, Mode::IMPORTS_ONLY);
    assert!(parse.file.imports.is_empty());
    assert!(parse.file.body.is_empty());
}

#[test]
fn test_scanner_errors_are_returned() {
    let (_, parse) = parse_source("err.gtex", "text ?\nmore", Mode::PARSE_FULL);
    assert_eq!(parse.errors.len(), 1);
    assert_eq!(parse.errors[0].to_string(), "err.gtex:1:6: illegal character U+003F '?'");
}
