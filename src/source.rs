//! Named input streams and positions within them.
//!
//! A [`SourceMap`] holds an ordered list of [`Source`]s that the lexer reads
//! as one logical input. The live position is a [`Cursor`], a small `Copy`
//! value, so speculative recognizers can snapshot it with
//! [`SourceMap::save`] and roll back with [`SourceMap::restore`].

use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;

use crate::Error;

/// A named, immutable sequence of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    chars: Vec<char>,
}

impl Source {
    pub fn new(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            chars: content.chars().collect(),
        }
    }

    /// Read a file into a source named after its path.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(
            path.display().to_string(),
            &String::from_utf8_lossy(&bytes),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// A live position in a [`SourceMap`].
///
/// `offset` is always a valid index into the source at `source`, or exactly
/// its length when the whole input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub source: usize,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    fn start_of(source: usize) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start_of(0)
    }
}

/// A frozen position with the name of its source resolved, used in
/// diagnostics. Displayed as `source:line:column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub source: String,
    pub source_index: usize,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// The ordered registry of sources together with the live cursor.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: Vec<Source>,
    cursor: Cursor,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. The cursor starts at the first source added.
    pub fn add_source(&mut self, source: Source) {
        debug!(
            "Adding source {} ({} characters)",
            source.name(),
            source.len()
        );
        self.sources.push(source);
        if self.sources.len() == 1 {
            self.cursor = Cursor::start_of(0);
        }
        // The cursor may sit at the end of an exhausted (or empty) source
        // that is now followed by this one.
        self.settle();
    }

    pub fn add_named(&mut self, name: impl Into<String>, content: &str) {
        self.add_source(Source::new(name, content));
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.add_source(Source::from_file(path)?);
        Ok(())
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The character under the cursor, or `None` at the end of all input.
    pub fn peek(&self) -> Option<char> {
        self.sources
            .get(self.cursor.source)
            .and_then(|s| s.chars.get(self.cursor.offset))
            .copied()
    }

    /// Consume the character under the cursor.
    ///
    /// Returns `true` when this call exhausted the current source and moved
    /// the cursor to the start of the next one. At the end of all input this
    /// is a no-op returning `false`.
    pub fn advance(&mut self) -> bool {
        let Some(ch) = self.peek() else {
            return false;
        };
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        self.cursor.offset += 1;
        self.settle()
    }

    /// Move past the end of exhausted sources, skipping empty ones.
    fn settle(&mut self) -> bool {
        let mut crossed = false;
        while let Some(current) = self.sources.get(self.cursor.source) {
            if self.cursor.offset < current.len() || self.cursor.source + 1 >= self.sources.len() {
                break;
            }
            self.cursor = Cursor::start_of(self.cursor.source + 1);
            crossed = true;
        }
        crossed
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_none()
    }

    pub fn save(&self) -> Cursor {
        self.cursor
    }

    pub fn restore(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Resolve a cursor into a named location.
    pub fn location(&self, cursor: Cursor) -> Location {
        let source = self
            .sources
            .get(cursor.source)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| "<empty>".to_string());
        Location {
            source,
            source_index: cursor.source,
            offset: cursor.offset,
            line: cursor.line,
            column: cursor.column,
        }
    }

    /// The location of the live cursor.
    pub fn here(&self) -> Location {
        self.location(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(map: &mut SourceMap) -> String {
        let mut out = String::new();
        while let Some(ch) = map.peek() {
            out.push(ch);
            map.advance();
        }
        out
    }

    #[test]
    fn test_empty_map_has_no_input() {
        let mut map = SourceMap::new();
        assert_eq!(map.peek(), None);
        assert!(!map.advance());
        assert_eq!(map.here().to_string(), "<empty>:1:1");
    }

    #[test]
    fn test_lines_and_columns() {
        let mut map = SourceMap::new();
        map.add_named("a", "ab\ncd");
        map.advance();
        map.advance();
        assert_eq!(map.here().to_string(), "a:1:3");
        map.advance();
        assert_eq!(map.here().to_string(), "a:2:1");
        assert_eq!(map.peek(), Some('c'));
    }

    #[test]
    fn test_crossing_sources() {
        let mut map = SourceMap::new();
        map.add_named("first", "ab");
        map.add_named("second", "c");
        assert!(!map.advance());
        assert!(map.advance());
        let here = map.here();
        assert_eq!(here.source, "second");
        assert_eq!((here.line, here.column, here.offset), (1, 1, 0));
        // Exhausting the last source does not cross anything.
        assert!(!map.advance());
        assert!(map.is_at_end());
    }

    #[test]
    fn test_empty_sources_are_skipped() {
        let mut map = SourceMap::new();
        map.add_named("empty", "");
        map.add_named("x", "x");
        map.add_named("also-empty", "");
        map.add_named("y", "y");
        assert_eq!(map.here().source, "x");
        assert_eq!(drain(&mut map), "xy");
    }

    #[test]
    fn test_source_added_after_exhaustion() {
        let mut map = SourceMap::new();
        map.add_named("a", "a");
        assert_eq!(drain(&mut map), "a");
        map.add_named("b", "b");
        assert_eq!(map.here().source, "b");
        assert_eq!(drain(&mut map), "b");
    }

    #[test]
    fn test_save_and_restore() {
        let mut map = SourceMap::new();
        map.add_named("a", "x\ny");
        map.add_named("b", "z");
        let saved = map.save();
        assert_eq!(drain(&mut map), "x\nyz");
        map.restore(saved);
        assert_eq!(map.save(), saved);
        assert_eq!(map.peek(), Some('x'));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut map = SourceMap::new();
        let err = map.add_file("/definitely/not/here.sexpr").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.sexpr"));
    }

    #[test]
    fn test_invalid_utf8_file_is_decoded_lossily() {
        let path = std::env::temp_dir().join(format!("sexpr-eval-lossy-{}.sexpr", std::process::id()));
        fs::write(&path, b"ab\xffc").unwrap();
        let source = Source::from_file(&path);
        fs::remove_file(&path).unwrap();

        let source = source.unwrap();
        assert_eq!(source.chars(), &['a', 'b', '\u{FFFD}', 'c']);
    }
}
