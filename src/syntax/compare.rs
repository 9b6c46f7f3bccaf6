//! Structural AST comparison
//!
//! Compares two trees by shape and literal content. Positions and file
//! names are not compared. The first difference is reported as a
//! [`Mismatch`] with a path such as `File.body[2].content[0]`.

use thiserror::Error;

use super::ast::NodeRef;
use super::visitor::{Control, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    /// Compare only the common prefix of child lists
    pub skip_length_check: bool,
}

/// First structural difference between two trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("AST mismatch at {path}: {reason}\n  got:  {got}\n  want: {want}")]
pub struct Mismatch {
    pub path: String,
    pub reason: String,
    pub got: String,
    pub want: String,
}

impl Mismatch {
    fn new(path: &str, reason: impl Into<String>, got: NodeRef<'_>, want: NodeRef<'_>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
            got: got.to_string(),
            want: want.to_string(),
        }
    }
}

/// Compares `got` against `want`.
pub fn compare<'a, 'b>(
    got: impl Into<NodeRef<'a>>,
    want: impl Into<NodeRef<'b>>,
    options: CompareOptions,
) -> Result<(), Mismatch> {
    let got = got.into();
    compare_at(got, want.into(), options, got.kind())
}

fn compare_at(
    got: NodeRef<'_>,
    want: NodeRef<'_>,
    options: CompareOptions,
    path: &str,
) -> Result<(), Mismatch> {
    match (got, want) {
        (NodeRef::File(g), NodeRef::File(w)) => {
            compare_children(
                path,
                "body",
                g.body.iter().map(NodeRef::from),
                w.body.iter().map(NodeRef::from),
                (g.body.len(), w.body.len()),
                (got, want),
                options,
            )
        }
        (NodeRef::TextBlock(g), NodeRef::TextBlock(w)) => compare_children(
            path,
            "content",
            g.content.iter().map(NodeRef::from),
            w.content.iter().map(NodeRef::from),
            (g.content.len(), w.content.len()),
            (got, want),
            options,
        ),
        (NodeRef::Word(g), NodeRef::Word(w)) if g.lit != w.lit => Err(Mismatch::new(
            path,
            format!("word mismatch: got {:?}, want {:?}", g.lit.as_str(), w.lit.as_str()),
            got,
            want,
        )),
        (NodeRef::LineBreak(g), NodeRef::LineBreak(w)) if g.kind != w.kind => Err(Mismatch::new(
            path,
            format!(
                "line break kind mismatch: got {:?}, want {:?}",
                g.kind.as_str(),
                w.kind.as_str()
            ),
            got,
            want,
        )),
        (NodeRef::Comment(g), NodeRef::Comment(w)) if g.lit != w.lit => Err(Mismatch::new(
            path,
            format!("comment mismatch: got {:?}, want {:?}", g.lit.as_str(), w.lit.as_str()),
            got,
            want,
        )),
        (NodeRef::Word(_), NodeRef::Word(_))
        | (NodeRef::LineBreak(_), NodeRef::LineBreak(_))
        | (NodeRef::Comment(_), NodeRef::Comment(_))
        | (NodeRef::Newline(_), NodeRef::Newline(_)) => Ok(()),
        _ => Err(Mismatch::new(
            path,
            format!("expected {} node, got {}", want.kind(), got.kind()),
            got,
            want,
        )),
    }
}

fn compare_children<'a, 'b>(
    path: &str,
    field: &str,
    got_children: impl Iterator<Item = NodeRef<'a>>,
    want_children: impl Iterator<Item = NodeRef<'b>>,
    (got_len, want_len): (usize, usize),
    (got, want): (NodeRef<'_>, NodeRef<'_>),
    options: CompareOptions,
) -> Result<(), Mismatch> {
    if !options.skip_length_check && got_len != want_len {
        return Err(Mismatch::new(
            path,
            format!("{field} length mismatch: got {got_len} nodes, want {want_len} nodes"),
            got,
            want,
        ));
    }
    for (index, (g, w)) in got_children.zip(want_children).enumerate() {
        compare_at(g, w, options, &format!("{path}.{field}[{index}]"))?;
    }
    Ok(())
}

/// A [`Visitor`] that compares the first node it is handed against an
/// expected tree and stops.
#[derive(Debug)]
pub struct CompareVisitor<'w> {
    expected: NodeRef<'w>,
    options: CompareOptions,
    outcome: Option<Result<(), Mismatch>>,
}

impl<'w> CompareVisitor<'w> {
    pub fn new(expected: impl Into<NodeRef<'w>>, options: CompareOptions) -> Self {
        Self {
            expected: expected.into(),
            options,
            outcome: None,
        }
    }

    /// Result of the comparison; an error if no node was ever visited.
    pub fn finish(self) -> Result<(), Mismatch> {
        match self.outcome {
            Some(outcome) => outcome,
            None => Err(Mismatch {
                path: "<root>".to_string(),
                reason: "visitor did not match any root node".to_string(),
                got: "nothing".to_string(),
                want: self.expected.to_string(),
            }),
        }
    }
}

impl<'a> Visitor<'a> for CompareVisitor<'_> {
    fn visit(&mut self, node: NodeRef<'a>) -> Control {
        if self.outcome.is_none() {
            self.outcome = Some(compare(node, self.expected, self.options));
        }
        Control::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Pos;
    use crate::syntax::ast::{Comment, File, Newline, TextBlock, Word};
    use crate::syntax::visitor::walk;

    fn file(body: Vec<crate::syntax::ast::Node>) -> File {
        File::new("t.gtex").with_body(body)
    }

    #[test]
    fn test_positions_are_ignored() {
        let got = file(vec![Word::new("a").with_span(Pos::new(4), Pos::new(5)).into()]);
        let want = file(vec![Word::new("a").into()]);
        assert_eq!(compare(&got, &want, CompareOptions::default()), Ok(()));
    }

    #[test]
    fn test_word_mismatch_reports_path() {
        let got = file(vec![
            Newline::new().into(),
            TextBlock::new(vec![Word::new("a").into(), Word::new("b").into()]).into(),
        ]);
        let want = file(vec![
            Newline::new().into(),
            TextBlock::new(vec![Word::new("a").into(), Word::new("c").into()]).into(),
        ]);
        let err = compare(&got, &want, CompareOptions::default()).unwrap_err();
        assert_eq!(err.path, "File.body[1].content[1]");
        assert_eq!(err.reason, r#"word mismatch: got "b", want "c""#);
        assert_eq!(err.got, r#"Word("b")"#);
    }

    #[test]
    fn test_kind_mismatch() {
        let got = file(vec![Comment::new("% x").into()]);
        let want = file(vec![Newline::new().into()]);
        let err = compare(&got, &want, CompareOptions::default()).unwrap_err();
        assert_eq!(err.reason, "expected Newline node, got Comment");
    }

    #[test]
    fn test_length_check_can_be_skipped() {
        let got = file(vec![Newline::new().into(), Newline::new().into()]);
        let want = file(vec![Newline::new().into()]);
        let err = compare(&got, &want, CompareOptions::default()).unwrap_err();
        assert_eq!(err.reason, "body length mismatch: got 2 nodes, want 1 nodes");

        let options = CompareOptions {
            skip_length_check: true,
        };
        assert_eq!(compare(&got, &want, options), Ok(()));
    }

    #[test]
    fn test_compare_visitor() {
        let got = file(vec![Word::new("x").into()]);
        let want = file(vec![Word::new("y").into()]);

        let mut visitor = CompareVisitor::new(&want, CompareOptions::default());
        walk(&mut visitor, &got);
        assert!(visitor.finish().is_err());

        let mut visitor = CompareVisitor::new(&got, CompareOptions::default());
        walk(&mut visitor, &got);
        assert_eq!(visitor.finish(), Ok(()));
    }

    #[test]
    fn test_compare_visitor_without_root() {
        let want = file(Vec::new());
        let err = CompareVisitor::new(&want, CompareOptions::default())
            .finish()
            .unwrap_err();
        assert_eq!(err.reason, "visitor did not match any root node");
    }
}
