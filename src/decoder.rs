//! Invocation of the external decoder (ffmpeg).
//!
//! ffmpeg does all of the actual audio work: container parsing, decoding, resampling and
//! channel mixing. This module only builds its command line and turns its outcome into errors.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info};

use crate::output::TempFile;
use crate::PcmSpecs;

/// Default name of the ffmpeg executable, looked up in `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Error type for the external decoder.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Input file does not exist: {0}")]
    MissingInput(PathBuf),
    #[error("'{0}' not found. Make sure ffmpeg is installed and in PATH.")]
    DecoderUnavailable(String),
    #[error("ffmpeg failed ({status}): {stderr}")]
    DecoderFailure { status: ExitStatus, stderr: String },
    #[error("Failed to run ffmpeg: {0}")]
    Io(#[from] io::Error),
}

/// Raw PCM produced by the external decoder.
/// The intermediate file is deleted when this is dropped.
#[derive(Debug)]
pub struct RawPcm {
    file: TempFile,
    size: u64,
}

impl RawPcm {
    /// Path of the intermediate raw file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the raw PCM in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole raw PCM stream.
    ///
    /// # Errors
    ///
    /// Any I/O error reading the intermediate file.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(self.file.path())
    }
}

/// Runs ffmpeg to normalize arbitrary audio into raw PCM of fixed specs.
#[derive(Debug, Clone)]
pub struct Decoder {
    program: String,
    specs: PcmSpecs,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new(DEFAULT_FFMPEG, PcmSpecs::default())
    }
}

impl Decoder {
    /// * 'program' - ffmpeg executable name or path.
    /// * 'specs' - Sample rate, channel count and sample format of the raw output.
    #[must_use]
    pub fn new(program: &str, specs: PcmSpecs) -> Self {
        Decoder {
            program: program.to_owned(),
            specs,
        }
    }

    #[must_use]
    pub fn specs(&self) -> &PcmSpecs {
        &self.specs
    }

    /// ffmpeg arguments for converting `input` into `output`.
    #[must_use]
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-ar".into(),
            self.specs.sample_rate.to_string().into(),
            "-ac".into(),
            self.specs.num_channels.to_string().into(),
            "-f".into(),
            self.specs.sample_format.ffmpeg_name().into(),
            "-y".into(),
            output.as_os_str().to_owned(),
        ]
    }

    /// Convert `input` into raw PCM and wait for ffmpeg to finish.
    ///
    /// # Errors
    ///
    /// * `DecoderError::MissingInput` - `input` does not exist.
    /// * `DecoderError::DecoderUnavailable` - The ffmpeg executable was not found.
    /// * `DecoderError::DecoderFailure` - ffmpeg exited with a non-zero status.
    /// * `DecoderError::Io` - Any other error spawning ffmpeg or inspecting its output.
    pub fn convert(&self, input: &Path) -> Result<RawPcm, DecoderError> {
        if !input.exists() {
            return Err(DecoderError::MissingInput(input.to_owned()));
        }

        let file = TempFile::create("raw")?;
        let args = self.args(input, file.path());
        info!("Converting {}", input.display());
        debug!("{} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DecoderError::DecoderUnavailable(self.program.clone()),
                _ => DecoderError::Io(e),
            })?;

        if !output.status.success() {
            return Err(DecoderError::DecoderFailure {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let size = fs::metadata(file.path())?.len();
        info!("Converted to {} bytes of raw PCM", size);
        Ok(RawPcm { file, size })
    }
}
