//! Compiled output with holes.
//!
//! A compiled stylesheet is a [`ChunkStream`]: literal text interleaved with
//! values that can only be produced once the device is known, and with
//! references to the streams of imported stylesheets. The renderer fills the
//! holes; the compiler only ever appends through a [`ChunkAccumulator`].

use std::path::PathBuf;

/// What a deferred unit value turns into at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// `rpx` resolved to device pixels.
    Pixel,
    /// Reserved; renders nothing.
    Suffix,
}

/// One piece of a compiled stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Literal output.
    Text(String),
    /// A device-relative value waiting for a device profile.
    Unit { kind: UnitKind, raw: f64 },
    /// The whole stream of the imported stylesheet at this path.
    Nested(PathBuf),
}

impl Chunk {
    pub fn pixel(raw: f64) -> Self {
        Chunk::Unit {
            kind: UnitKind::Pixel,
            raw,
        }
    }
}

/// An ordered sequence of chunks. Adjacent text is always coalesced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkStream {
    chunks: Vec<Chunk>,
}

impl ChunkStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Paths referenced by [`Chunk::Nested`] chunks, in stream order.
    pub fn nested(&self) -> impl Iterator<Item = &PathBuf> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            Chunk::Nested(path) => Some(path),
            _ => None,
        })
    }

    fn push(&mut self, chunk: Chunk) {
        if let Chunk::Text(text) = &chunk {
            if text.is_empty() {
                return;
            }
            if let Some(Chunk::Text(last)) = self.chunks.last_mut() {
                last.push_str(text);
                return;
            }
        }
        self.chunks.push(chunk);
    }
}

impl<'a> IntoIterator for &'a ChunkStream {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

/// Builds a [`ChunkStream`] from text writes and out-of-band chunks.
///
/// Text is buffered until [`flush`](Self::flush); chunk order always equals
/// emission order.
///
/// ```rust
/// use wxss_bundle::chunk::{Chunk, ChunkAccumulator};
///
/// let mut acc = ChunkAccumulator::new();
/// acc.append("width:");
/// acc.flush(Some(Chunk::pixel(10.0)));
/// acc.append(";");
/// let stream = acc.into_stream();
///
/// assert_eq!(
///     stream.chunks(),
///     &[Chunk::Text("width:".into()), Chunk::pixel(10.0), Chunk::Text(";".into())]
/// );
/// ```
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    current: String,
    stream: ChunkStream,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the pending text buffer.
    pub fn append(&mut self, text: &str) {
        self.current.push_str(text);
    }

    /// Moves pending text into the stream, then appends `extra` after it.
    pub fn flush(&mut self, extra: Option<Chunk>) {
        if !self.current.is_empty() {
            let text = std::mem::take(&mut self.current);
            self.stream.push(Chunk::Text(text));
        }
        if let Some(chunk) = extra {
            self.stream.push(chunk);
        }
    }

    /// Flushes pending text. Called once per completed walk.
    pub fn finish(&mut self) {
        self.flush(None);
    }

    /// Text written since the last flush.
    pub fn pending(&self) -> &str {
        &self.current
    }

    pub fn into_stream(mut self) -> ChunkStream {
        self.finish();
        self.stream
    }
}
