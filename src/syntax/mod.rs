// Document AST, traversal and structural comparison
pub mod ast;
pub mod compare;
pub mod visitor;

pub use ast::{
    Comment, File, ImportSpec, LineBreak, Newline, Node, NodeRef, TextBlock, TextNode, Word,
};
pub use compare::{CompareOptions, CompareVisitor, Mismatch, compare};
pub use visitor::{Control, Visitor, inspect, walk};
