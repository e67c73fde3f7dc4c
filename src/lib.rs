//! pcmarray converts audio files into C header arrays of raw PCM samples.
//!
//! Firmware for small audio players often has no file system, so the sound has to be
//! compiled into the image. pcmarray lets ffmpeg normalize any input into raw PCM and
//! then renders the samples as a `const` array inside an include-guarded header.
//!
//! The encoder itself is pure and can be used without ffmpeg.
//!
//! # Examples
//!
//! Encode one 32bit little endian sample.
//! ```
//! use pcmarray::{encode, EncoderConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = EncoderConfig::new("beep", "BEEP_H")?;
//! let header = encode(&[0x01, 0x00, 0x00, 0x00], &config)?;
//!
//! assert!(header.contains("const uint32_t beep_len = 4;"));
//! assert!(header.contains("    0x00000001\n};"));
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod decoder;
mod encoder;
pub mod output;
mod sample;
mod usage;

pub use encoder::{encode, guard_from_path, is_c_identifier, EncoderConfig};
pub use sample::{decode_samples, format_sample};
pub use usage::usage_snippet;

/// Default sample rate requested from the external decoder.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Default number of channels requested from the external decoder.
pub const DEFAULT_NUM_CHANNELS: u16 = 2;
/// Default number of array elements per line.
pub const DEFAULT_VALUES_PER_LINE: usize = 8;
/// Default array identifier.
pub const DEFAULT_ARRAY_NAME: &str = "audio_data";
/// Default header file name.
pub const DEFAULT_HEADER_FILE: &str = "audio_data.h";
/// Raw PCM sizes above this many bytes trigger a warning before the header is written.
pub const DEFAULT_SIZE_WARNING_BYTES: u64 = 1024 * 1024;

/// Sample format of the raw PCM stream.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum SampleFormat {
    /// Signed 8bit
    S8,
    /// Signed 16bit little endian
    S16Le,
    /// Signed 16bit big endian
    S16Be,
    /// Signed 32bit little endian
    #[default]
    S32Le,
    /// Signed 32bit big endian
    S32Be,
}

impl SampleFormat {
    /// Number of bytes per sample.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            SampleFormat::S8 => 1,
            SampleFormat::S16Le | SampleFormat::S16Be => 2,
            SampleFormat::S32Le | SampleFormat::S32Be => 4,
        }
    }

    /// Bit depth.
    #[must_use]
    pub const fn bit_depth(self) -> u16 {
        (self.width() * 8) as u16
    }

    /// Name of the format as understood by `ffmpeg -f`.
    #[must_use]
    pub const fn ffmpeg_name(self) -> &'static str {
        match self {
            SampleFormat::S8 => "s8",
            SampleFormat::S16Le => "s16le",
            SampleFormat::S16Be => "s16be",
            SampleFormat::S32Le => "s32le",
            SampleFormat::S32Be => "s32be",
        }
    }

    /// C type used for array elements unless overridden.
    #[must_use]
    pub const fn c_type(self) -> &'static str {
        match self {
            SampleFormat::S8 => "int8_t",
            SampleFormat::S16Le | SampleFormat::S16Be => "int16_t",
            SampleFormat::S32Le | SampleFormat::S32Be => "int32_t",
        }
    }
}

/// Basic information on the raw PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpecs {
    /// Sample format.
    pub sample_format: SampleFormat,
    /// Number of channels.
    pub num_channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for PcmSpecs {
    fn default() -> Self {
        PcmSpecs {
            sample_format: SampleFormat::default(),
            num_channels: DEFAULT_NUM_CHANNELS,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl PcmSpecs {
    /// Number of bytes per second of audio.
    #[must_use]
    pub fn bytes_per_second(&self) -> u64 {
        self.sample_rate as u64 * self.num_channels as u64 * self.sample_format.width() as u64
    }

    /// Playback duration in seconds of `num_bytes` bytes of PCM.
    #[must_use]
    pub fn duration_secs(&self, num_bytes: usize) -> f64 {
        let bytes_per_second = self.bytes_per_second();
        if bytes_per_second == 0 {
            return 0.0;
        }
        num_bytes as f64 / bytes_per_second as f64
    }
}

/// Numeric base of the array literals.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Radix {
    /// `0x` prefixed, zero padded, masked to the sample width.
    #[default]
    Hex,
    /// Signed decimal.
    Decimal,
}

/// Error type for the sample encoder.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Buffer length {len} is not a multiple of the sample width ({width} bytes).")]
    InvalidInput { len: usize, width: usize },
    #[error("Values per line must be at least 1.")]
    InvalidValuesPerLine,
    #[error("'{0}' is not a valid C identifier.")]
    InvalidIdentifier(String),
    #[error("'{0}' is not a valid C element type.")]
    InvalidElementType(String),
    #[error("Header formatting error.")]
    Fmt(#[from] core::fmt::Error),
}

#[cfg(test)]
mod tests {
    use crate::{PcmSpecs, SampleFormat};

    #[test]
    fn default_specs_match_i2s_stream() {
        let specs = PcmSpecs::default();
        assert_eq!(specs.sample_format, SampleFormat::S32Le);
        assert_eq!(specs.sample_rate, 44100);
        assert_eq!(specs.num_channels, 2);
        assert_eq!(specs.bytes_per_second(), 352800);
    }

    #[test]
    fn duration() {
        let specs = PcmSpecs::default();
        assert_eq!(specs.duration_secs(352800 * 3), 3.0);
        assert_eq!(specs.duration_secs(0), 0.0);

        let silent = PcmSpecs {
            num_channels: 0,
            ..Default::default()
        };
        assert_eq!(silent.duration_secs(1024), 0.0);
    }

    #[test]
    fn format_widths() {
        assert_eq!(SampleFormat::S8.width(), 1);
        assert_eq!(SampleFormat::S16Be.bit_depth(), 16);
        assert_eq!(SampleFormat::S32Le.ffmpeg_name(), "s32le");
        assert_eq!(SampleFormat::S16Le.c_type(), "int16_t");
    }
}
