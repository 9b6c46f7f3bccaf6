//! Gotex front end: token catalog, scanner and parser
//!
//! ## Architecture
//!
//! ```text
//! Source bytes
//!     ↓
//! Scanner → (Pos, Token, literal) triples, line table filled in as it goes
//!     ↓
//! Parser → syntax::ast::File
//! ```

#[allow(clippy::module_inception)]
mod parser;

pub mod scanner;
pub mod token;

pub use parser::{Mode, Parse, ParseError, parse, parse_files};
pub use scanner::{ErrorHandler, ErrorList, Scanner};
pub use token::{Token, lookup_keyword, lookup_symbol};
