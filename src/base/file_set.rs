//! File registration and coordinate resolution.
//!
//! A [`FileSet`] hands out disjoint coordinate ranges to [`File`]s. Each file
//! occupies `[base, base+size]`; the extra coordinate addresses end of file.
//! Line tables are filled in lazily by the scanner, so both structures are
//! shared behind locks:
//! - one `Mutex` per [`File`] guards its line table
//! - one `RwLock` per [`FileSet`] guards the file list

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use smol_str::SmolStr;
use thiserror::Error;

use super::position::{Pos, Position};

/// Misuse detected while registering a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileSetError {
    #[error("invalid base {base} (should be >= {min})")]
    InvalidBase { base: u32, min: u32 },

    #[error("position offset overflow (file of {size} bytes at base {base})")]
    Overflow { base: u32, size: usize },
}

/// A handle for a file registered in a [`FileSet`].
#[derive(Debug)]
pub struct File {
    name: SmolStr,
    base: u32,
    size: usize,
    /// Offset of the first byte of each line; `lines[0]` is always 0.
    lines: Mutex<Vec<usize>>,
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of lines registered so far.
    pub fn line_count(&self) -> usize {
        self.lines.lock().len()
    }

    /// Snapshot of the line table.
    pub fn lines(&self) -> Vec<usize> {
        self.lines.lock().clone()
    }

    /// Registers the start offset of a new line.
    ///
    /// Offsets not strictly greater than the last entry, or `>= size`, are
    /// ignored.
    pub fn add_line(&self, offset: usize) {
        let mut lines = self.lines.lock();
        if lines.last().is_none_or(|&last| last < offset) && offset < self.size {
            lines.push(offset);
        }
    }

    /// Replaces the line table.
    ///
    /// The table must start at 0, be strictly increasing and stay below
    /// `size`; otherwise nothing changes and `false` is returned.
    pub fn set_lines(&self, lines: Vec<usize>) -> bool {
        if lines.first() != Some(&0) {
            return false;
        }
        let increasing = lines.windows(2).all(|pair| pair[0] < pair[1]);
        let in_bounds = lines.last().is_some_and(|&last| last < self.size || last == 0);
        if !increasing || !in_bounds {
            return false;
        }
        *self.lines.lock() = lines;
        true
    }

    /// Computes the line table from the file content.
    pub fn set_lines_for_content(&self, content: &[u8]) {
        let mut lines = vec![0];
        lines.extend(
            content
                .iter()
                .enumerate()
                .filter(|&(offset, &b)| b == b'\n' && offset + 1 < self.size)
                .map(|(offset, _)| offset + 1),
        );
        *self.lines.lock() = lines;
    }

    /// Converts a file-relative byte offset into an absolute coordinate.
    ///
    /// Panics if `offset > size`.
    pub fn pos(&self, offset: usize) -> Pos {
        if offset > self.size {
            panic!("invalid file offset {offset} (should be <= {})", self.size);
        }
        // base + size + 1 fits in u32, checked at registration.
        Pos::new(self.base + offset as u32)
    }

    /// Converts an absolute coordinate back into a file-relative offset.
    ///
    /// Panics if `pos` lies outside `[base, base+size]`.
    pub fn offset(&self, pos: Pos) -> usize {
        match self.relative(pos) {
            Some(offset) if offset <= self.size => offset,
            _ => panic!(
                "invalid position {pos} (should be in [{}, {}])",
                self.base,
                self.base as usize + self.size
            ),
        }
    }

    /// Line number of `pos`; panics like [`File::offset`].
    pub fn line(&self, pos: Pos) -> usize {
        let offset = self.offset(pos);
        let lines = self.lines.lock();
        lines.partition_point(|&start| start <= offset)
    }

    /// Coordinate of the first byte of a 1-based line.
    ///
    /// Panics if the line has not been registered.
    pub fn line_start(&self, line: usize) -> Pos {
        let lines = self.lines.lock();
        if line < 1 || line > lines.len() {
            panic!("invalid line number {line} (should be in [1, {}])", lines.len());
        }
        Pos::new(self.base + lines[line - 1] as u32)
    }

    /// Resolves `pos` if it lies in `[base, base+size)`, else returns the
    /// zero [`Position`].
    pub fn position(&self, pos: Pos) -> Position {
        match self.relative(pos) {
            Some(offset) if pos.is_valid() && offset < self.size => self.resolve(offset),
            _ => Position::default(),
        }
    }

    fn relative(&self, pos: Pos) -> Option<usize> {
        pos.raw().checked_sub(self.base).map(|offset| offset as usize)
    }

    fn resolve(&self, offset: usize) -> Position {
        let lines = self.lines.lock();
        let line = lines.partition_point(|&start| start <= offset);
        let column = offset - lines[line - 1] + 1;
        Position {
            filename: self.name.clone(),
            offset,
            line,
            column,
        }
    }
}

#[derive(Debug)]
struct Files {
    /// Minimum base for the next registration
    base: u32,
    /// Registered files, in strictly increasing base order
    files: Vec<Arc<File>>,
}

/// The set of all files of one compilation unit.
#[derive(Debug)]
pub struct FileSet {
    inner: RwLock<Files>,
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSet {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Files {
                base: 1, // 0 == NO_POS
                files: Vec::new(),
            }),
        }
    }

    /// The minimum base accepted by the next [`FileSet::add_file`].
    pub fn base(&self) -> u32 {
        self.inner.read().base
    }

    /// Registers a file and advances the base cursor past it.
    ///
    /// Panics on misuse; see [`FileSet::try_add_file`].
    pub fn add_file(&self, name: impl Into<SmolStr>, base: u32, size: usize) -> Arc<File> {
        match self.try_add_file(name, base, size) {
            Ok(file) => file,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers a file, rejecting a `base` below [`FileSet::base`] or a
    /// range that would overflow the coordinate type.
    pub fn try_add_file(
        &self,
        name: impl Into<SmolStr>,
        base: u32,
        size: usize,
    ) -> Result<Arc<File>, FileSetError> {
        let name = name.into();
        let mut inner = self.inner.write();
        if base < inner.base {
            return Err(FileSetError::InvalidBase {
                base,
                min: inner.base,
            });
        }
        // +1 because end of file also has a position
        let next = u32::try_from(size)
            .ok()
            .and_then(|size| base.checked_add(size))
            .and_then(|end| end.checked_add(1))
            .ok_or(FileSetError::Overflow { base, size })?;

        tracing::trace!(file = %name, base, size, "registered file");
        let file = Arc::new(File {
            name,
            base,
            size,
            lines: Mutex::new(vec![0]),
        });
        inner.base = next;
        inner.files.push(Arc::clone(&file));
        Ok(file)
    }

    /// Returns the file containing `pos`, or `None` for [`NO_POS`](super::NO_POS)
    /// and coordinates outside every registered file.
    pub fn file(&self, pos: Pos) -> Option<Arc<File>> {
        if !pos.is_valid() {
            return None;
        }
        let inner = self.inner.read();
        let index = inner.files.partition_point(|file| file.base <= pos.raw());
        let file = inner.files.get(index.checked_sub(1)?)?;
        // End of file is addressable, hence `<=`.
        (pos.raw() as usize <= file.base as usize + file.size).then(|| Arc::clone(file))
    }

    /// Resolves `pos` to a [`Position`]; the zero value when unresolvable.
    pub fn position(&self, pos: Pos) -> Position {
        self.file(pos)
            .map(|file| file.resolve(pos.raw() as usize - file.base as usize))
            .unwrap_or_default()
    }

    /// Snapshot of the registered files in base order.
    pub fn files(&self) -> Vec<Arc<File>> {
        self.inner.read().files.clone()
    }
}
