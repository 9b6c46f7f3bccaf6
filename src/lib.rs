//! # gotex
//!
//! Core library for Gotex source positions, scanning, and the document AST.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! syntax    → Document AST, Visitor/walk, structural comparison
//!   ↓
//! parser    → Token catalog, scanner, partial parser
//!   ↓
//! base      → Primitives (Pos, Position, File, FileSet)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax)
// ============================================================================

/// Foundation types: Pos, Position, File, FileSet
pub mod base;

/// Parser: token catalog, scanner, imports-only and full-text parsing
pub mod parser;

/// Syntax: AST node types, traversal, comparison
pub mod syntax;

// Re-export commonly needed items
pub use parser::{Mode, Parse, Scanner, Token, parse};

// Re-export foundation types
pub use base::{File, FileSet, NO_POS, Pos, Position};
