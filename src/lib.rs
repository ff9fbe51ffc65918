//! Streaming builder for canonical PCM wav files.
//!
//! Raw sample bytes are collected in chunks, from memory or decoded from other
//! wav files, and written out behind a 44 byte header computed from what was
//! collected.
//!
//! ```rust
//! use wavbuild::{Format, Header, WavBuilder};
//!
//! let mut builder = WavBuilder::new(Format::pcm(2, 44_100, 16).unwrap());
//!
//! builder.add_chunk(vec![0; 8]).unwrap();
//! builder.add_chunk(vec![1, 0, 1, 0]).unwrap();
//!
//! // a 5 byte chunk would split a stereo frame
//! assert!(builder.add_chunk(vec![0; 5]).is_err());
//!
//! let mut bytes = vec![];
//! builder.write_to(&mut bytes).unwrap();
//!
//! let header = Header::from_bytes(&bytes).unwrap();
//! assert_eq!(header.data_size, 12);
//! assert_eq!(header.format.byte_rate(), 176_400);
//! ```

#![warn(missing_docs)]

mod chunk;
mod error;
mod format;
mod header;
mod ingest;
mod progress;
mod tag;
mod wav;
mod writer;

pub use chunk::Chunks;
pub use error::{Error, Result};
pub use format::{Format, IEEE_FLOAT, MONO, PCM, STEREO};
pub use header::{serialize, Header, FMT_SIZE, HEADER_LEN, MAX_DATA_SIZE};
pub use ingest::{add_from_stream, probe, DecodedStream, RawStream, WavSource};
pub use progress::{Observer, Progress};
pub use tag::ChunkTag;
pub use wav::WavBuilder;
pub use writer::{write_file, write_to};
