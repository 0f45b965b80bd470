//! Source text cache for diagnostic rendering.

use crate::span::{FileId, Location, Span};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A cached source file with line information.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    /// Byte offsets where each line starts
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            id,
            path,
            source,
            line_starts,
        }
    }

    /// Get the 1-indexed line and column for a byte offset.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        ((line_idx + 1) as u32, (offset - line_start + 1).max(1))
    }

    /// Get the text of a 1-indexed line, without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\n').trim_end_matches('\r'))
    }
}

fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut starts = vec![0];
    starts.extend(
        source
            .char_indices()
            .filter(|&(_, c)| c == '\n')
            .map(|(i, _)| (i + 1) as u32),
    );
    starts
}

/// Source files known to the driver, indexed by [`FileId`].
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<FileId, SourceFile>,
    path_to_id: HashMap<PathBuf, FileId>,
    next_id: u32,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning its id. Adding the same path twice returns the
    /// existing id.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: String) -> FileId {
        let path = path.as_ref().to_path_buf();
        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }

        let id = FileId(self.next_id);
        self.next_id += 1;
        self.files.insert(id, SourceFile::new(id, path.clone(), source));
        self.path_to_id.insert(path, id);
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(&id)
    }

    /// Resolve a span to a location. Dummy spans and unknown files have none.
    pub fn location(&self, span: Span) -> Option<Location> {
        if span.is_dummy() {
            return None;
        }
        let file = self.files.get(&span.file_id)?;
        let (line, column) = file.line_column(span.start);
        Some(Location {
            file: file.path.to_string_lossy().into_owned(),
            line,
            column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts() {
        assert_eq!(compute_line_starts("line1\nline2\nline3"), vec![0, 6, 12]);
    }

    #[test]
    fn test_line_column() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("test.py", "hello\nworld\n".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_column(0), (1, 1));
        assert_eq!(file.line_column(4), (1, 5));
        assert_eq!(file.line_column(6), (2, 1));
        assert_eq!(file.line_column(7), (2, 2));
    }

    #[test]
    fn test_line_text() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("test.py", "a = 1\r\nb = 2\nc".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_text(1), Some("a = 1"));
        assert_eq!(file.line_text(2), Some("b = 2"));
        assert_eq!(file.line_text(3), Some("c"));
        assert_eq!(file.line_text(4), None);
        assert_eq!(file.line_text(0), None);
    }

    #[test]
    fn test_location_and_text() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("adder.py", "x: int = 1\ny: int = x\n".to_string());
        assert_eq!(cache.add_file("adder.py", String::new()), id);

        let span = Span::new(id, 20, 21);
        let loc = cache.location(span).unwrap();
        assert_eq!(loc.to_string(), "adder.py:2:10");
        assert!(cache.location(Span::DUMMY).is_none());
    }
}
