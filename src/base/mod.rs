//! Foundation types for the Gotex toolchain.
//!
//! This module provides the shared coordinate space used by every later stage:
//! - [`Pos`] - Opaque absolute coordinates, [`NO_POS`] being "no position"
//! - [`Position`] - Resolved `file:line:column` form of a [`Pos`]
//! - [`File`] - One source file's placement in the coordinate space
//! - [`FileSet`] - The owner of all registered files
//!
//! This module has NO dependencies on other gotex modules.

mod file_set;
mod position;

pub use file_set::{File, FileSet, FileSetError};
pub use position::{NO_POS, Pos, Position};
