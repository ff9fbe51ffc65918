/// Checkpoints reported while a container is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Header computed, nothing written yet
    HeaderPending {
        /// Header plus sample bytes that will be written.
        total_bytes: u64,
    },
    /// The 44 header bytes went out
    HeaderWritten,
    /// One chunk of samples went out
    ChunkWritten {
        /// Zero based position of the chunk.
        index: usize,
        /// Number of chunks in the container.
        chunks: usize,
        /// Bytes written so far, header included.
        bytes_written: u64,
        /// Header plus sample bytes that will be written.
        total_bytes: u64,
    },
    /// The container is complete and published
    Finished {
        /// Total bytes written.
        bytes_written: u64,
    },
    /// Writing stopped, the error is returned to the caller as well
    Failed {
        /// Display form of the error.
        reason: String,
    },
}

/// Passive receiver of [`Progress`] events.
///
/// Observers see each event once and can't influence the write. Any
/// `Fn(&Progress)` closure is an observer.
pub trait Observer {
    /// Called at every checkpoint.
    fn notify(&self, event: &Progress);
}

impl<F> Observer for F
where
    F: Fn(&Progress),
{
    fn notify(&self, event: &Progress) {
        self(event)
    }
}

pub(crate) fn notify(observer: Option<&dyn Observer>, event: Progress) {
    if let Some(observer) = observer {
        observer.notify(&event);
    }
}
