use crate::chunk::Chunks;
use crate::error::{Error, Result};
use crate::format::{Format, IEEE_FLOAT, PCM};
use crate::header::MAX_DATA_SIZE;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Samples decoded per refill of a [`WavSource`].
const BATCH: usize = 4096;

/// Upper bound for the buffer reserved up front from a reported frame count.
const MAX_RESERVE: usize = 16 * 1024 * 1024;

/// A decoded audio source producing raw, interleaved sample bytes.
///
/// `read` may return fewer bytes than requested, the stream is drained until
/// it reports end of stream.
pub trait DecodedStream: Read {
    /// Bytes per sample frame, `None` if the decoder can't tell.
    fn frame_size(&self) -> Option<usize>;

    /// Number of frames the source claims to hold, only used as a capacity hint.
    fn frame_count(&self) -> Option<u64> {
        None
    }
}

/// Drain `stream` into a single chunk and append it to `chunks`.
///
/// No conversion is attempted: if the stream reports a frame size that
/// differs from the block align of `format` this fails with
/// [`Error::FormatMismatch`] before anything is read. Read failures surface as
/// [`Error::Ingestion`]. `chunks` is only modified on success.
pub fn add_from_stream<S: DecodedStream + ?Sized>(
    format: &Format,
    chunks: &mut Chunks,
    stream: &mut S,
) -> Result<()> {
    let expected = format.block_align();

    if let Some(found) = stream.frame_size() {
        if found != usize::from(expected) {
            warn!(
                found,
                expected,
                "source frame size does not match, no conversion available"
            );
            return Err(Error::FormatMismatch { expected, found });
        }
    }

    let reserve = stream
        .frame_count()
        .and_then(|frames| frames.checked_mul(u64::from(expected)))
        .map(|bytes| bytes.min(u64::from(MAX_DATA_SIZE)))
        .map_or(0, |bytes| (bytes as usize).min(MAX_RESERVE));

    let mut bytes = Vec::with_capacity(reserve);
    stream.read_to_end(&mut bytes).map_err(Error::ingestion)?;

    debug!(len = bytes.len(), "drained decoded source");

    chunks.add_chunk(bytes)
}

/// Raw sample bytes from any reader, with an optionally known frame size.
///
/// Useful for bytes decoded elsewhere.
#[derive(Debug)]
pub struct RawStream<R> {
    inner: R,
    frame_size: Option<usize>,
}

impl<R: Read> RawStream<R> {
    /// Wrap `inner`, reporting `frame_size` to the ingestion check.
    pub fn new(inner: R, frame_size: Option<usize>) -> Self {
        RawStream { inner, frame_size }
    }
}

impl<R: Read> Read for RawStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> DecodedStream for RawStream<R> {
    fn frame_size(&self) -> Option<usize> {
        self.frame_size
    }
}

/// Samples of a WAV file decoded with `hound`, re-encoded as little endian bytes.
///
/// 8 bit samples come out unsigned, wider integer samples signed in as many
/// bytes as the bit depth needs and float samples as 32 bit IEEE values, the
/// same layout they have in a wav `data` chunk.
pub struct WavSource<R: Read> {
    reader: hound::WavReader<R>,
    pending: Vec<u8>,
    pos: usize,
}

impl WavSource<BufReader<File>> {
    /// Open and decode the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let reader = hound::WavReader::open(path).map_err(Error::ingestion)?;
        Ok(Self::from_reader(reader))
    }
}

impl<R: Read> WavSource<R> {
    /// Decode a WAV stream from `reader`.
    pub fn new(reader: R) -> Result<Self> {
        let reader = hound::WavReader::new(reader).map_err(Error::ingestion)?;
        Ok(Self::from_reader(reader))
    }

    fn from_reader(reader: hound::WavReader<R>) -> Self {
        WavSource {
            reader,
            pending: vec![],
            pos: 0,
        }
    }

    /// Format of the source as reported by the decoder.
    pub fn spec(&self) -> hound::WavSpec {
        self.reader.spec()
    }

    fn bytes_per_sample(&self) -> usize {
        usize::from(self.reader.spec().bits_per_sample).div_ceil(8)
    }

    fn refill(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.pos = 0;

        let width = self.bytes_per_sample();

        match self.reader.spec().sample_format {
            hound::SampleFormat::Float => {
                for sample in self.reader.samples::<f32>().take(BATCH) {
                    let sample = sample.map_err(decode_error)?;
                    self.pending.extend_from_slice(&sample.to_le_bytes());
                }
            }
            hound::SampleFormat::Int => {
                for sample in self.reader.samples::<i32>().take(BATCH) {
                    let sample = sample.map_err(decode_error)?;
                    if width == 1 {
                        // hound shifts unsigned 8 bit samples into the signed range
                        self.pending.push((sample + 128) as u8);
                    } else {
                        let bytes = sample.to_le_bytes();
                        self.pending.extend_from_slice(&bytes[..width]);
                    }
                }
            }
        }

        Ok(())
    }
}

impl<R: Read> Read for WavSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.pending.len() {
            self.refill()?;

            if self.pending.is_empty() {
                return Ok(0);
            }
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;

        Ok(n)
    }
}

impl<R: Read> DecodedStream for WavSource<R> {
    fn frame_size(&self) -> Option<usize> {
        Some(usize::from(self.reader.spec().channels) * self.bytes_per_sample())
    }

    fn frame_count(&self) -> Option<u64> {
        Some(u64::from(self.reader.duration()))
    }
}

/// Read the format of the WAV file at `path` without decoding its samples.
pub fn probe(path: impl AsRef<Path>) -> Result<Format> {
    let reader = hound::WavReader::open(path).map_err(Error::ingestion)?;
    let spec = reader.spec();

    let format_tag = match spec.sample_format {
        hound::SampleFormat::Int => PCM,
        hound::SampleFormat::Float => IEEE_FLOAT,
    };

    Format::new(
        format_tag,
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
    )
}

fn decode_error(err: hound::Error) -> io::Error {
    match err {
        hound::Error::IoError(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}
