//! Coordinates in the shared multi-file address space.

use std::fmt;

use smol_str::SmolStr;

/// An absolute coordinate in a [`FileSet`](super::FileSet).
///
/// Every registered file owns a disjoint range of coordinates; a `Pos` is
/// only meaningful together with the file set that produced it. The value
/// `0` ([`NO_POS`]) never belongs to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(u32);

/// The "no position" sentinel.
pub const NO_POS: Pos = Pos(0);

impl Pos {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Reports whether the position is not [`NO_POS`].
    pub const fn is_valid(self) -> bool {
        self.0 != NO_POS.0
    }

    /// Returns the position `n` bytes further along.
    ///
    /// Panics if the result leaves the coordinate type.
    pub fn offset_by(self, n: usize) -> Self {
        let n = u32::try_from(n).ok();
        match n.and_then(|n| self.0.checked_add(n)) {
            Some(raw) => Self(raw),
            None => panic!("position {} offset overflow", self.0),
        }
    }
}

impl From<Pos> for u32 {
    fn from(pos: Pos) -> Self {
        pos.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A resolved source position (1-based line and column).
///
/// This is a pure projection of a [`Pos`]; the zero value means the
/// coordinate could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub filename: SmolStr,
    /// Byte offset from the start of the file
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1 (byte count)
    pub column: usize,
}

impl Position {
    pub fn new(filename: impl Into<SmolStr>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }

    /// Reports whether the position carries a line number.
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

/// Renders `file:line:column`, `line:column` without a file name, or `-`
/// for an invalid position.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("-");
        }
        if !self.filename.is_empty() {
            write!(f, "{}:", self.filename)?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}
