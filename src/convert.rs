//! One conversion from an audio file to a header on disk.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::decoder::{Decoder, DecoderError};
use crate::output::{write_atomic, OutputError};
use crate::{encode, EncodeError, EncoderConfig};

/// Error type for a whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decoder(#[from] DecoderError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to ask for confirmation: {0}")]
    Confirm(#[source] io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// How a conversion ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The header was written. `num_bytes` is the size of the raw PCM.
    Written { num_bytes: usize },
    /// The size check was declined. Nothing was written.
    Cancelled,
}

/// Everything needed to turn an audio file into a header.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub decoder: Decoder,
    pub config: EncoderConfig,
    /// Raw PCM larger than this many bytes is reported and has to be confirmed.
    pub size_warning: u64,
}

impl Conversion {
    /// Decode `input`, encode it and write the header to `output`.
    ///
    /// `confirm` is called with the raw PCM size when it exceeds `size_warning`; returning
    /// `false` cancels. The intermediate raw file is removed in every outcome, and `output` is
    /// either fully written or left untouched.
    ///
    /// # Errors
    ///
    /// * `ConvertError::Decoder` - ffmpeg is missing, failed, or `input` does not exist.
    /// * `ConvertError::Read` - The raw PCM could not be read back.
    /// * `ConvertError::Confirm` - `confirm` failed.
    /// * `ConvertError::Encode` - The raw PCM is not a whole number of samples.
    /// * `ConvertError::Output` - The header could not be written.
    pub fn run<F>(&self, input: &Path, output: &Path, confirm: F) -> Result<Outcome, ConvertError>
    where
        F: FnOnce(u64) -> io::Result<bool>,
    {
        let raw = self.decoder.convert(input)?;

        if raw.size() > self.size_warning {
            warn!("Audio data is large ({:.2} KB)", raw.size() as f64 / 1024.0);
            warn!("Consider a shorter clip, or SPIFFS/SD card storage instead of a header");
            if !confirm(raw.size()).map_err(ConvertError::Confirm)? {
                info!("Cancelled");
                return Ok(Outcome::Cancelled);
            }
        }

        let data = raw.read().map_err(|source| ConvertError::Read {
            path: raw.path().to_owned(),
            source,
        })?;
        info!(
            "Audio data: {} bytes ({:.2} KB), {:.2} s",
            data.len(),
            data.len() as f64 / 1024.0,
            self.config.specs().duration_secs(data.len())
        );

        let header = encode(&data, &self.config)?;
        write_atomic(output, header.as_bytes())?;
        info!("Wrote {}", output.display());
        Ok(Outcome::Written {
            num_bytes: data.len(),
        })
    }
}
