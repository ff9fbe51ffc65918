use crate::chunk::Chunks;
use crate::error::Result;
use crate::format::Format;
use crate::ingest::{add_from_stream, DecodedStream, WavSource};
use crate::progress::Observer;
use crate::writer::{write_file, write_to};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Builder for a wav file, collecting raw sample chunks for one [`Format`].
///
/// The builder is meant to have a single owner: every mutation takes
/// `&mut self` and chunks are written in the order they were added. The boxed
/// observer carries no thread bounds, so a builder is neither `Send` nor `Sync`.
pub struct WavBuilder {
    format: Format,
    chunks: Chunks,
    observer: Option<Box<dyn Observer>>,
}

impl WavBuilder {
    /// Create an empty builder for `format`.
    ///
    /// ```
    /// use wavbuild::{Format, WavBuilder};
    ///
    /// let mut builder = WavBuilder::new(Format::pcm(2, 48_000, 16).unwrap());
    /// builder.add_chunk(vec![1, 0, 2, 0, 3, 0, 255, 255]).unwrap();
    ///
    /// let mut bytes = vec![];
    /// builder.write_to(&mut bytes).unwrap();
    ///
    /// assert_eq!(bytes.len(), 52);
    /// assert_eq!(&bytes[0..4], b"RIFF");
    /// assert_eq!(&bytes[44..], &[1, 0, 2, 0, 3, 0, 255, 255]);
    /// ```
    pub fn new(format: Format) -> Self {
        WavBuilder {
            chunks: Chunks::new(format.block_align()),
            format,
            observer: None,
        }
    }

    /// Attach an observer receiving [`Progress`](crate::Progress) events while writing.
    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    /// Replace the observer.
    pub fn set_observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Format every chunk is checked against.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Bytes per sample frame, every chunk must be a multiple of this.
    pub fn block_align(&self) -> u16 {
        self.format.block_align()
    }

    /// Append raw interleaved sample bytes, see [`Chunks::add_chunk`].
    pub fn add_chunk(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.chunks.add_chunk(bytes)
    }

    /// Decode the WAV file at `path` and append its samples as one chunk.
    ///
    /// The file must have the same frame size as the builder's format, no
    /// conversion takes place.
    pub fn add_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "adding audio file");

        let mut source = WavSource::open(path)?;
        self.add_from_stream(&mut source)
    }

    /// Drain an already decoded stream and append its bytes as one chunk.
    pub fn add_from_stream<S: DecodedStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        add_from_stream(&self.format, &mut self.chunks, stream)
    }

    /// Collected chunks.
    pub fn chunks(&self) -> &Chunks {
        &self.chunks
    }

    /// Total bytes of sample data collected.
    pub fn total_length(&self) -> u64 {
        self.chunks.total_length()
    }

    /// Drop all collected samples, the format is kept.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Write a new wav file at `path`, refusing to overwrite an existing one.
    ///
    /// Returns the number of bytes written. See [`write_file`](crate::write_file).
    pub fn write(&self, path: impl AsRef<Path>) -> Result<u64> {
        write_file(path, &self.format, &self.chunks, self.observer.as_deref())
    }

    /// Stream the wav file into `sink`.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        write_to(sink, &self.format, &self.chunks, self.observer.as_deref())
    }
}

impl fmt::Debug for WavBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavBuilder")
            .field("format", &self.format)
            .field("chunks", &self.chunks.len())
            .field("total_length", &self.chunks.total_length())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
