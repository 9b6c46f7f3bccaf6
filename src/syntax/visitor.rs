//! Depth-first traversal over the document AST.

use super::ast::NodeRef;

/// What [`walk`] does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Visit the node's children.
    Descend,
    /// Do not visit the node's children.
    Skip,
}

/// Called by [`walk`] once per node, in pre-order.
pub trait Visitor<'a> {
    fn visit(&mut self, node: NodeRef<'a>) -> Control;
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(NodeRef<'a>) -> Control,
{
    fn visit(&mut self, node: NodeRef<'a>) -> Control {
        self(node)
    }
}

/// Traverses `node` depth-first.
///
/// The visitor sees `node` first. If it answers [`Control::Descend`], the
/// children are walked in order: `File.body` for a file, `TextBlock.content`
/// for a text block. Leaves have no children.
pub fn walk<'a, V>(visitor: &mut V, node: impl Into<NodeRef<'a>>)
where
    V: Visitor<'a> + ?Sized,
{
    let node = node.into();
    if visitor.visit(node) == Control::Skip {
        return;
    }

    match node {
        NodeRef::File(file) => {
            for child in &file.body {
                walk(visitor, child);
            }
        }
        NodeRef::TextBlock(block) => {
            for child in &block.content {
                walk(visitor, child);
            }
        }
        NodeRef::Word(_) | NodeRef::Newline(_) | NodeRef::LineBreak(_) | NodeRef::Comment(_) => {}
    }
}

/// Walks `node`, descending into children while `f` returns `true`.
pub fn inspect<'a, F>(node: impl Into<NodeRef<'a>>, mut f: F)
where
    F: FnMut(NodeRef<'a>) -> bool,
{
    let mut visitor = |node: NodeRef<'a>| {
        if f(node) {
            Control::Descend
        } else {
            Control::Skip
        }
    };
    walk(&mut visitor, node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{File, LineBreak, Newline, TextBlock, Word};

    fn sample() -> File {
        File::new("t.gtex").with_body(vec![
            TextBlock::new(vec![Word::new("a").into(), LineBreak::new("newline").into()]).into(),
            Newline::new().into(),
        ])
    }

    #[test]
    fn test_walk_is_pre_order() {
        let file = sample();
        let mut kinds = Vec::new();
        inspect(&file, |node| {
            kinds.push(node.kind());
            true
        });
        assert_eq!(kinds, ["File", "TextBlock", "Word", "LineBreak", "Newline"]);
    }

    #[test]
    fn test_skip_prunes_children() {
        let file = sample();
        let mut kinds = Vec::new();
        inspect(&file, |node| {
            kinds.push(node.kind());
            !matches!(node, NodeRef::TextBlock(_))
        });
        assert_eq!(kinds, ["File", "TextBlock", "Newline"]);
    }

    #[test]
    fn test_struct_visitor_collects_words() {
        struct Words<'a>(Vec<&'a str>);

        impl<'a> Visitor<'a> for Words<'a> {
            fn visit(&mut self, node: NodeRef<'a>) -> Control {
                if let NodeRef::Word(word) = node {
                    self.0.push(word.lit.as_str());
                }
                Control::Descend
            }
        }

        let file = sample();
        let mut words = Words(Vec::new());
        walk(&mut words, &file);
        assert_eq!(words.0, ["a"]);
    }
}
