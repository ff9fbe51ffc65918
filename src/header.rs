use crate::error::{Error, Result};
use crate::format::Format;
use crate::tag::ChunkTag;

/// Size of the canonical header: RIFF descriptor, `fmt ` chunk and `data` chunk header.
pub const HEADER_LEN: usize = 44;

/// Size of a plain PCM `fmt ` chunk body; extended fmt chunks are never written.
pub const FMT_SIZE: u32 = 16;

/// Bytes counted by the RIFF chunk size besides the sample data.
const RIFF_OVERHEAD: u32 = 4 + (8 + FMT_SIZE) + 8;

/// Largest data size for which the RIFF chunk size still fits in 32 bits.
pub const MAX_DATA_SIZE: u32 = u32::MAX - RIFF_OVERHEAD;

/// The 44 byte header in front of the sample data of a wav file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Contents of the `fmt ` chunk
    pub format: Format,
    /// Size of the `data` chunk body in bytes
    pub data_size: u32,
}

impl Header {
    /// Create a header for `data_size` bytes of samples in `format`.
    pub fn new(format: Format, data_size: u32) -> Self {
        Header { format, data_size }
    }

    /// Value of the RIFF chunk size field, everything after the first 8 bytes.
    ///
    /// Saturates at `u32::MAX` for data sizes above [`MAX_DATA_SIZE`].
    pub fn chunk_size(&self) -> u32 {
        RIFF_OVERHEAD.saturating_add(self.data_size)
    }

    /// Encode the header, all integers little endian and all tags as raw ASCII.
    ///
    /// ```
    /// use wavbuild::{Format, Header};
    ///
    /// let header = Header::new(Format::pcm(2, 48_000, 16).unwrap(), 8);
    ///
    /// let bytes: [u8; 44] = [
    ///     0x52, 0x49, 0x46, 0x46, // RIFF
    ///     0x2c, 0x00, 0x00, 0x00, // chunk size
    ///     0x57, 0x41, 0x56, 0x45, // WAVE
    ///     0x66, 0x6d, 0x74, 0x20, // fmt_
    ///     0x10, 0x00, 0x00, 0x00, // chunk size
    ///     0x01, 0x00, // audio format
    ///     0x02, 0x00, // num channels
    ///     0x80, 0xbb, 0x00, 0x00, // sample rate
    ///     0x00, 0xee, 0x02, 0x00, // byte rate
    ///     0x04, 0x00, // block align
    ///     0x10, 0x00, // bits per sample
    ///     0x64, 0x61, 0x74, 0x61, // data
    ///     0x08, 0x00, 0x00, 0x00, // chunk size
    /// ];
    ///
    /// assert_eq!(header.to_bytes(), bytes);
    /// ```
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let f = &self.format;
        let mut bytes = [0u8; HEADER_LEN];

        bytes[0..4].copy_from_slice(&ChunkTag::Riff.to_bytes());
        bytes[4..8].copy_from_slice(&self.chunk_size().to_le_bytes());
        bytes[8..12].copy_from_slice(&ChunkTag::Wave.to_bytes());

        bytes[12..16].copy_from_slice(&ChunkTag::Fmt.to_bytes());
        bytes[16..20].copy_from_slice(&FMT_SIZE.to_le_bytes());
        bytes[20..22].copy_from_slice(&f.format_tag().to_le_bytes());
        bytes[22..24].copy_from_slice(&f.channels().to_le_bytes());
        bytes[24..28].copy_from_slice(&f.sample_rate().to_le_bytes());
        bytes[28..32].copy_from_slice(&f.byte_rate().to_le_bytes());
        bytes[32..34].copy_from_slice(&f.block_align().to_le_bytes());
        bytes[34..36].copy_from_slice(&f.bits_per_sample().to_le_bytes());

        bytes[36..40].copy_from_slice(&ChunkTag::Data.to_bytes());
        bytes[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        bytes
    }

    /// Parse a canonical header from the start of `bytes`.
    ///
    /// Only the layout produced by [`Header::to_bytes`] is accepted: `fmt `
    /// directly after `WAVE`, a 16 byte fmt chunk and `data` right after it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::HeaderTooShort(bytes.len()));
        }

        expect_tag(bytes, 0, ChunkTag::Riff)?;
        expect_tag(bytes, 8, ChunkTag::Wave)?;
        expect_tag(bytes, 12, ChunkTag::Fmt)?;

        let fmt_size = read_u32(bytes, 16);
        if fmt_size != FMT_SIZE {
            return Err(Error::UnsupportedFmtSize(fmt_size));
        }

        expect_tag(bytes, 36, ChunkTag::Data)?;

        let format = Format::new(
            read_u16(bytes, 20),
            read_u16(bytes, 22),
            read_u32(bytes, 24),
            read_u16(bytes, 34),
        )?;

        let byte_rate = read_u32(bytes, 28);
        let block_align = read_u16(bytes, 32);
        if byte_rate != format.byte_rate() || block_align != format.block_align() {
            return Err(Error::invalid_format(
                "stored byte rate or block align disagrees with the format parameters",
            ));
        }

        Ok(Header {
            format,
            data_size: read_u32(bytes, 40),
        })
    }
}

/// Encode the header for `data_size` bytes of samples in `format`.
pub fn serialize(format: &Format, data_size: u32) -> [u8; HEADER_LEN] {
    Header::new(*format, data_size).to_bytes()
}

fn expect_tag(bytes: &[u8], offset: usize, expected: ChunkTag) -> Result<()> {
    let found = ChunkTag::from_bytes(field(bytes, offset));

    if found != expected {
        return Err(Error::UnexpectedTag {
            offset,
            expected,
            found,
        });
    }

    Ok(())
}

// Callers have checked `bytes.len() >= HEADER_LEN`, all offsets are constant.
fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(field(bytes, offset))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(field(bytes, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MONO, STEREO};
    use pretty_assertions::assert_eq;

    #[test]
    fn should_serialize_16_bit_stereo() {
        let format = Format::pcm(STEREO, 22_050, 16).unwrap();

        let bytes: [u8; 44] = [
            0x52, 0x49, 0x46, 0x46, // RIFF
            0x34, 0x00, 0x00, 0x00, // chunk size
            0x57, 0x41, 0x56, 0x45, // WAVE
            0x66, 0x6d, 0x74, 0x20, // fmt_
            0x10, 0x00, 0x00, 0x00, // chunk size
            0x01, 0x00, // audio format
            0x02, 0x00, // num channels
            0x22, 0x56, 0x00, 0x00, // sample rate
            0x88, 0x58, 0x01, 0x00, // byte rate
            0x04, 0x00, // block align
            0x10, 0x00, // bits per sample
            0x64, 0x61, 0x74, 0x61, // data
            0x10, 0x00, 0x00, 0x00, // chunk size
        ];

        assert_eq!(serialize(&format, 16), bytes);
    }

    #[test]
    fn should_serialize_24_bit_mono() {
        let format = Format::pcm(MONO, 48_000, 24).unwrap();

        let bytes: [u8; 44] = [
            0x52, 0x49, 0x46, 0x46, // RIFF
            0x30, 0x00, 0x00, 0x00, // chunk size
            0x57, 0x41, 0x56, 0x45, // WAVE
            0x66, 0x6d, 0x74, 0x20, // fmt_
            0x10, 0x00, 0x00, 0x00, // chunk size
            0x01, 0x00, // audio format
            0x01, 0x00, // num channels
            0x80, 0xbb, 0x00, 0x00, // sample rate
            0x80, 0x32, 0x02, 0x00, // byte rate
            0x03, 0x00, // block align
            0x18, 0x00, // bits per sample
            0x64, 0x61, 0x74, 0x61, // data
            0x0c, 0x00, 0x00, 0x00, // chunk size
        ];

        assert_eq!(serialize(&format, 12), bytes);
    }

    #[test]
    fn empty_data_has_chunk_size_36() {
        let header = Header::new(Format::pcm(MONO, 8_000, 8).unwrap(), 0);
        let bytes = header.to_bytes();

        assert_eq!(header.chunk_size(), 36);
        assert_eq!(bytes[4..8], [0x24, 0x00, 0x00, 0x00]);
        assert_eq!(bytes[40..44], [0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn chunk_size_counts_data() {
        let header = Header::new(Format::pcm(MONO, 8_000, 8).unwrap(), 10);
        assert_eq!(header.chunk_size(), 46);
    }

    #[test]
    fn serialize_is_deterministic() {
        let format = Format::pcm(STEREO, 44_100, 16).unwrap();
        assert_eq!(serialize(&format, 1024), serialize(&format, 1024));
    }

    #[test]
    fn should_encode_large_sizes_little_endian() {
        let format = Format::pcm(STEREO, 44_100, 16).unwrap();
        let bytes = serialize(&format, MAX_DATA_SIZE);

        assert_eq!(bytes[4..8], [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(bytes[40..44], [0xdb, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn should_read_back_header() {
        let format = Format::new(3, STEREO, 96_000, 32).unwrap();
        let header = Header::new(format, 4096);

        assert_eq!(Header::from_bytes(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn should_read_header_followed_by_samples() {
        let mut bytes = serialize(&Format::pcm(MONO, 8_000, 8).unwrap(), 3).to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);

        assert_eq!(Header::from_bytes(&bytes).unwrap().data_size, 3);
    }

    #[test]
    fn should_fail_on_short_input() {
        assert!(matches!(
            Header::from_bytes(&[0x52, 0x49, 0x46, 0x46]),
            Err(Error::HeaderTooShort(4))
        ));
    }

    #[test]
    fn should_fail_on_non_wave_files() {
        let mut bytes = serialize(&Format::pcm(MONO, 8_000, 8).unwrap(), 0);
        bytes[8..12].copy_from_slice(b"WAVV");

        match Header::from_bytes(&bytes) {
            Err(Error::UnexpectedTag {
                offset,
                expected,
                found,
            }) => {
                assert_eq!(offset, 8);
                assert_eq!(expected, ChunkTag::Wave);
                assert_eq!(found, ChunkTag::Unknown(*b"WAVV"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_fail_on_extended_fmt() {
        let mut bytes = serialize(&Format::pcm(MONO, 8_000, 8).unwrap(), 0);
        bytes[16] = 0x12;

        assert!(matches!(
            Header::from_bytes(&bytes),
            Err(Error::UnsupportedFmtSize(18))
        ));
    }

    #[test]
    fn should_fail_on_inconsistent_block_align() {
        let mut bytes = serialize(&Format::pcm(STEREO, 44_100, 16).unwrap(), 0);
        // block align assuming 8 bit samples
        bytes[32] = 0x02;

        assert!(matches!(
            Header::from_bytes(&bytes),
            Err(Error::InvalidFormat { .. })
        ));
    }
}
