/// RIFF chunks are tagged with 4 byte identifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChunkTag {
    /// Root level "chunk"
    Riff,
    /// Mandatory chunk for WAV files, contains data such as the sample rate,
    /// bit depth, and number of channels.
    Fmt,
    /// Mandatory chunk for WAV files, contains the (interleaved) samples.
    Data,
    /// File identifier, located right after the RIFF tag and chunk size
    Wave,
    /// Unknown tag, only ever produced when reading bytes back.
    Unknown([u8; 4]),
}

impl ChunkTag {
    pub(crate) fn from_bytes(bytes: [u8; 4]) -> Self {
        match &bytes {
            b"RIFF" => ChunkTag::Riff,
            b"fmt " => ChunkTag::Fmt,
            b"data" => ChunkTag::Data,
            b"WAVE" => ChunkTag::Wave,
            _ => ChunkTag::Unknown(bytes),
        }
    }

    pub(crate) fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Riff => *b"RIFF",
            ChunkTag::Fmt => *b"fmt ",
            ChunkTag::Data => *b"data",
            ChunkTag::Wave => *b"WAVE",
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_raw_ascii() {
        assert_eq!(ChunkTag::Riff.to_bytes(), [0x52, 0x49, 0x46, 0x46]);
        assert_eq!(ChunkTag::Wave.to_bytes(), [0x57, 0x41, 0x56, 0x45]);
        assert_eq!(ChunkTag::Fmt.to_bytes(), [0x66, 0x6d, 0x74, 0x20]);
        assert_eq!(ChunkTag::Data.to_bytes(), [0x64, 0x61, 0x74, 0x61]);
    }

    #[test]
    fn should_keep_unknown_tags() {
        let tag = ChunkTag::from_bytes(*b"LIST");

        assert_eq!(tag, ChunkTag::Unknown(*b"LIST"));
        assert_eq!(tag.to_bytes(), *b"LIST");
    }

    #[test]
    fn should_parse_known_tags() {
        for tag in [
            ChunkTag::Riff,
            ChunkTag::Wave,
            ChunkTag::Fmt,
            ChunkTag::Data,
        ] {
            assert_eq!(ChunkTag::from_bytes(tag.to_bytes()), tag);
        }
    }
}
