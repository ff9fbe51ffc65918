use crate::error::{Error, Result};

/// Audio format tag for linear PCM
pub const PCM: u16 = 1;
/// Audio format tag for 32 bit IEEE float samples
pub const IEEE_FLOAT: u16 = 3;
/// Channel count of a mono stream
pub const MONO: u16 = 1;
/// Channel count of a stereo stream
pub const STEREO: u16 = 2;

/// Parameters of the `fmt ` section of a WAV file, plus the fields derived from them.
///
/// `byte_rate` and `block_align` are computed once in [`Format::new`] and every
/// alignment check afterwards uses that `block_align`.
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    byte_rate: u32,
    block_align: u16,
}

impl Format {
    /// Create a new [`Format`], validating the parameters.
    ///
    /// ```
    /// use wavbuild::{Format, PCM};
    ///
    /// let format = Format::new(PCM, 2, 44_100, 16).unwrap();
    ///
    /// assert_eq!(format.block_align(), 4);
    /// assert_eq!(format.byte_rate(), 176_400);
    /// ```
    pub fn new(
        format_tag: u16,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self> {
        if channels < 1 {
            return Err(Error::invalid_format("at least one channel is required"));
        }

        if sample_rate == 0 {
            return Err(Error::invalid_format("sample rate must be positive"));
        }

        if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(Error::invalid_format(format!(
                "bits per sample must be a positive multiple of 8, got {}",
                bits_per_sample
            )));
        }

        let block_align = channels
            .checked_mul(bits_per_sample / 8)
            .ok_or_else(|| Error::invalid_format("block align does not fit in 16 bits"))?;

        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| Error::invalid_format("byte rate does not fit in 32 bits"))?;

        Ok(Format {
            format_tag,
            channels,
            sample_rate,
            bits_per_sample,
            byte_rate,
            block_align,
        })
    }

    /// Shorthand for a linear [`PCM`] format.
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Result<Self> {
        Self::new(PCM, channels, sample_rate, bits_per_sample)
    }

    /// audio encoding tag, `1` for linear PCM
    pub fn format_tag(&self) -> u16 {
        self.format_tag
    }

    /// number of audio channels in the sample data, channels are interleaved
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// sample rate, typical values are `44_100`, `48_000` or `96_000`
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// bit depth for each sample, typical values are `16` or `24`
    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// bytes per second of audio
    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    /// bytes in one sample frame across all channels
    pub fn block_align(&self) -> u16 {
        self.block_align
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_8_bit() {
        let format = Format::pcm(MONO, 8_000, 8).unwrap();

        assert_eq!(format.block_align(), 1);
        assert_eq!(format.byte_rate(), 8_000);
    }

    #[test]
    fn stereo_16_bit() {
        let format = Format::pcm(STEREO, 44_100, 16).unwrap();

        assert_eq!(format.block_align(), 4);
        assert_eq!(format.byte_rate(), 176_400);
    }

    #[test]
    fn derived_fields_follow_parameters() {
        for channels in 1..=8u16 {
            for bits in [8u16, 16, 24, 32] {
                for rate in [8_000u32, 22_050, 44_100, 96_000] {
                    let format = Format::new(PCM, channels, rate, bits).unwrap();

                    assert_eq!(format.block_align(), channels * (bits / 8));
                    assert_eq!(format.byte_rate(), rate * u32::from(format.block_align()));
                }
            }
        }
    }

    #[test]
    fn should_reject_zero_channels() {
        assert!(matches!(
            Format::pcm(0, 44_100, 16),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn should_reject_zero_sample_rate() {
        assert!(matches!(
            Format::pcm(MONO, 0, 16),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn should_reject_partial_bytes() {
        for bits in [0, 4, 12, 20] {
            assert!(matches!(
                Format::pcm(MONO, 44_100, bits),
                Err(Error::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn should_reject_overflowing_derived_fields() {
        assert!(matches!(
            Format::pcm(u16::MAX, 44_100, 16),
            Err(Error::InvalidFormat { .. })
        ));
        assert!(matches!(
            Format::pcm(1024, u32::MAX, 32),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn keeps_format_tag() {
        let format = Format::new(IEEE_FLOAT, STEREO, 48_000, 32).unwrap();
        assert_eq!(format.format_tag(), 3);
    }
}
