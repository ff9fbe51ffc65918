use crate::chunk::Chunks;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::header::{serialize, HEADER_LEN};
use crate::progress::{notify, Observer, Progress};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Stream a container into `sink`: the header, then every chunk in insertion order.
///
/// Chunks are written one by one as they are reached, nothing is concatenated
/// in memory. Returns the number of bytes written, `44 + chunks.total_length()`.
/// On a failed write the sink may hold a partial container.
pub fn write_to<W: Write + ?Sized>(
    sink: &mut W,
    format: &Format,
    chunks: &Chunks,
    observer: Option<&dyn Observer>,
) -> Result<u64> {
    match stream(sink, format, chunks, observer) {
        Ok(bytes_written) => {
            notify(observer, Progress::Finished { bytes_written });
            Ok(bytes_written)
        }
        Err(err) => Err(failed(observer, err)),
    }
}

/// Write a container to a new file at `path`.
///
/// Fails with [`Error::DestinationExists`] without touching anything if `path`
/// is already present. The container is streamed into a temporary file next
/// to `path` which is moved into place only once every byte is written and
/// synced, so `path` either doesn't exist or holds the complete container.
pub fn write_file(
    path: impl AsRef<Path>,
    format: &Format,
    chunks: &Chunks,
    observer: Option<&dyn Observer>,
) -> Result<u64> {
    let path = path.as_ref();

    match publish(path, |tmp| stream(tmp, format, chunks, observer)) {
        Ok(bytes_written) => {
            info!(path = %path.display(), bytes_written, "container written");
            notify(observer, Progress::Finished { bytes_written });
            Ok(bytes_written)
        }
        Err(err) => Err(failed(observer, err)),
    }
}

fn publish<F>(path: &Path, emit: F) -> Result<u64>
where
    F: FnOnce(&mut NamedTempFile) -> Result<u64>,
{
    if exists(path)? {
        warn!(path = %path.display(), "destination already exists");
        return Err(Error::DestinationExists(path.to_path_buf()));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".wavbuild-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    let bytes_written = emit(&mut tmp)?;
    tmp.as_file().sync_all()?;

    // `tmp` is removed on drop if persisting fails
    tmp.persist_noclobber(path).map_err(|err| {
        if err.error.kind() == io::ErrorKind::AlreadyExists {
            Error::DestinationExists(path.to_path_buf())
        } else {
            Error::Io(err.error)
        }
    })?;

    Ok(bytes_written)
}

fn stream<W: Write + ?Sized>(
    sink: &mut W,
    format: &Format,
    chunks: &Chunks,
    observer: Option<&dyn Observer>,
) -> Result<u64> {
    let data_size = u32::try_from(chunks.total_length()).map_err(|_| Error::DataTooLarge {
        size: chunks.total_length(),
    })?;

    let header = serialize(format, data_size);
    let total_bytes = HEADER_LEN as u64 + u64::from(data_size);

    notify(observer, Progress::HeaderPending { total_bytes });

    sink.write_all(&header)?;
    let mut bytes_written = HEADER_LEN as u64;

    notify(observer, Progress::HeaderWritten);

    let count = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        sink.write_all(chunk)?;
        bytes_written += chunk.len() as u64;

        debug!(index, len = chunk.len(), bytes_written, "chunk written");
        notify(
            observer,
            Progress::ChunkWritten {
                index,
                chunks: count,
                bytes_written,
                total_bytes,
            },
        );
    }

    sink.flush()?;

    Ok(bytes_written)
}

fn exists(path: &Path) -> Result<bool> {
    // dangling symlinks count as existing, persisting onto them would fail anyway
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn failed(observer: Option<&dyn Observer>, err: Error) -> Error {
    notify(
        observer,
        Progress::Failed {
            reason: err.to_string(),
        },
    );
    err
}
