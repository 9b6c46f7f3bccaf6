//! Visitor Tests
//!
//! Depth-first traversal over parsed documents and structural comparison
//! through the visitor interface.

use rustc_hash::FxHashMap;

use gotex::base::FileSet;
use gotex::parser::{Mode, parse};
use gotex::syntax::{
    CompareOptions, CompareVisitor, Control, File, Newline, NodeRef, TextBlock, Visitor, Word,
    inspect, walk,
};

fn parse_full(src: &str) -> File {
    let fset = FileSet::new();
    let file = fset.add_file("visit.gtex", fset.base(), src.len());
    parse(&fset, &file, src.as_bytes(), Mode::PARSE_FULL)
        .unwrap()
        .file
}

/// Counts visited nodes by kind.
#[derive(Default)]
struct KindCounter {
    counts: FxHashMap<&'static str, usize>,
}

impl<'a> Visitor<'a> for KindCounter {
    fn visit(&mut self, node: NodeRef<'a>) -> Control {
        *self.counts.entry(node.kind()).or_default() += 1;
        Control::Descend
    }
}

#[test]
fn test_walk_visits_every_node() {
    let file = parse_full("% intro\nalpha beta\ngamma\\\\\ndelta\n");
    let mut counter = KindCounter::default();
    walk(&mut counter, &file);

    assert_eq!(counter.counts["File"], 1);
    assert_eq!(counter.counts["Comment"], 1);
    assert_eq!(counter.counts["TextBlock"], 2);
    assert_eq!(counter.counts["Word"], 4);
    assert_eq!(counter.counts["LineBreak"], 1);
    // one after the comment, one inside the first block, one trailing
    assert_eq!(counter.counts["Newline"], 3);
}

#[test]
fn test_inspect_order_and_pruning() {
    let file = parse_full("one two\n\nthree\n");

    let mut order = Vec::new();
    inspect(&file, |node| {
        order.push(node.to_string());
        true
    });
    assert_eq!(
        order,
        vec![
            r#"File[4 nodes: TextBlock[3: Word("one"), Word("two"), ...], Newline, ...]"#,
            r#"TextBlock[3: Word("one"), Word("two"), ...]"#,
            r#"Word("one")"#,
            r#"Word("two")"#,
            "Newline",
            "Newline",
            r#"TextBlock[1: Word("three")]"#,
            r#"Word("three")"#,
            "Newline",
        ]
    );

    let mut words = 0;
    inspect(&file, |node| {
        if matches!(node, NodeRef::Word(_)) {
            words += 1;
        }
        !matches!(node, NodeRef::TextBlock(_))
    });
    assert_eq!(words, 0);
}

#[test]
fn test_walk_leaf_root() {
    let word = Word::new("solo");
    let mut seen = Vec::new();
    inspect(NodeRef::Word(&word), |node| {
        seen.push(node.kind());
        true
    });
    assert_eq!(seen, vec!["Word"]);
}

#[test]
fn test_compare_visitor_skip_length_check() {
    let file = parse_full("first\n\nsecond\n");
    let prefix = File::new("visit.gtex").with_body(vec![
        TextBlock::new(vec![Word::new("first").into(), Newline::new().into()]).into(),
    ]);

    let strict = CompareOptions::default();
    let mut visitor = CompareVisitor::new(&prefix, strict);
    walk(&mut visitor, &file);
    let mismatch = visitor.finish().unwrap_err();
    assert_eq!(mismatch.path, "File");
    assert!(mismatch.reason.starts_with("body length mismatch"));

    let lenient = CompareOptions {
        skip_length_check: true,
    };
    let mut visitor = CompareVisitor::new(&prefix, lenient);
    walk(&mut visitor, &file);
    assert_eq!(visitor.finish(), Ok(()));
}

#[test]
fn test_compare_visitor_reports_first_difference() {
    let file = parse_full("alpha beta\n");
    let expected = File::new("visit.gtex").with_body(vec![
        TextBlock::new(vec![Word::new("alpha").into(), Word::new("gamma").into()]).into(),
        Newline::new().into(),
    ]);

    let mut visitor = CompareVisitor::new(&expected, CompareOptions::default());
    walk(&mut visitor, &file);
    let mismatch = visitor.finish().unwrap_err();
    assert_eq!(mismatch.path, "File.body[0].content[1]");
    assert_eq!(mismatch.got, r#"Word("beta")"#);
    assert_eq!(mismatch.want, r#"Word("gamma")"#);
    assert!(mismatch.to_string().starts_with("AST mismatch at File.body[0].content[1]"));
}
