use crate::error::{Error, Result};
use crate::header::MAX_DATA_SIZE;
use tracing::{debug, warn};

/// Ordered, append-only list of raw sample buffers.
///
/// Every buffer holds whole sample frames: its length is a multiple of the
/// block align given at construction. Buffers are kept as they were added,
/// never merged, and written in insertion order.
#[derive(Debug, Clone)]
pub struct Chunks {
    block_align: u16,
    chunks: Vec<Vec<u8>>,
    total: u64,
}

impl Chunks {
    /// Create an empty list accepting buffers aligned to `block_align`.
    pub fn new(block_align: u16) -> Self {
        Chunks {
            block_align,
            chunks: vec![],
            total: 0,
        }
    }

    /// Append a buffer of raw samples.
    ///
    /// On error nothing is appended and [`Chunks::total_length`] is unchanged.
    ///
    /// ```
    /// use wavbuild::{Chunks, Error};
    ///
    /// let mut chunks = Chunks::new(4);
    ///
    /// assert!(matches!(chunks.add_chunk(vec![0; 5]), Err(Error::MisalignedChunk { .. })));
    /// assert!(chunks.add_chunk(vec![0; 8]).is_ok());
    /// assert_eq!(chunks.total_length(), 8);
    /// ```
    pub fn add_chunk(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let bytes = bytes.into();
        let len = bytes.len();

        // a zero block align never comes out of `Format::new`
        if self.block_align == 0 || len % usize::from(self.block_align) != 0 {
            warn!(
                len,
                block_align = self.block_align,
                "rejecting misaligned chunk"
            );
            return Err(Error::MisalignedChunk {
                len,
                block_align: self.block_align,
            });
        }

        let total = self.total + len as u64;
        if total > u64::from(MAX_DATA_SIZE) {
            warn!(len, total, "rejecting chunk, container would be too large");
            return Err(Error::DataTooLarge { size: total });
        }

        self.chunks.push(bytes);
        self.total = total;

        debug!(len, total, index = self.chunks.len() - 1, "chunk added");

        Ok(())
    }

    /// Sum of the lengths of all buffers.
    pub fn total_length(&self) -> u64 {
        self.total
    }

    /// Block align every buffer is checked against.
    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    /// Number of buffers.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if no buffers were added since creation or the last [`Chunks::clear`].
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Buffers in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.chunks.iter().map(Vec::as_slice)
    }

    /// Drop all buffers.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_any_length_for_single_byte_frames() {
        let mut chunks = Chunks::new(1);

        chunks.add_chunk(vec![1, 2]).unwrap();
        chunks.add_chunk(vec![3, 4, 5]).unwrap();
        chunks.add_chunk(vec![6, 7, 8, 9, 10]).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.total_length(), 10);
    }

    #[test]
    fn should_reject_misaligned_chunk() {
        let mut chunks = Chunks::new(4);
        chunks.add_chunk(vec![0; 8]).unwrap();

        let err = chunks.add_chunk(vec![0; 5]).unwrap_err();

        assert!(matches!(
            err,
            Error::MisalignedChunk {
                len: 5,
                block_align: 4
            }
        ));
        assert_eq!(chunks.total_length(), 8);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn should_keep_insertion_order() {
        let mut chunks = Chunks::new(2);

        chunks.add_chunk(vec![3, 3]).unwrap();
        chunks.add_chunk(vec![1, 1, 1, 1]).unwrap();
        chunks.add_chunk(vec![2, 2]).unwrap();

        let collected: Vec<&[u8]> = chunks.iter().collect();
        assert_eq!(collected, vec![&[3, 3][..], &[1, 1, 1, 1][..], &[2, 2][..]]);
    }

    #[test]
    fn empty_chunks_are_aligned() {
        let mut chunks = Chunks::new(6);

        chunks.add_chunk(Vec::new()).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks.total_length(), 0);
    }

    #[test]
    fn clear_resets_total() {
        let mut chunks = Chunks::new(2);
        chunks.add_chunk(vec![0; 4]).unwrap();

        chunks.clear();

        assert!(chunks.is_empty());
        assert_eq!(chunks.total_length(), 0);
        assert_eq!(chunks.block_align(), 2);

        chunks.add_chunk(vec![0; 2]).unwrap();
        assert_eq!(chunks.total_length(), 2);
    }

    #[test]
    fn should_accept_slices() {
        let mut chunks = Chunks::new(2);
        chunks.add_chunk(&[1u8, 2][..]).unwrap();

        assert_eq!(chunks.iter().next(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn should_reject_chunks_past_the_size_limit() {
        let mut chunks = Chunks::new(1);
        chunks.total = u64::from(MAX_DATA_SIZE) - 1;

        assert!(matches!(
            chunks.add_chunk(vec![0; 2]),
            Err(Error::DataTooLarge { .. })
        ));
        assert_eq!(chunks.total_length(), u64::from(MAX_DATA_SIZE) - 1);

        chunks.add_chunk(vec![0; 1]).unwrap();
        assert_eq!(chunks.total_length(), u64::from(MAX_DATA_SIZE));
    }
}
