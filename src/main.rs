//! Convert an audio file into a C header holding its raw PCM samples.
//!
//! ```text
//! pcmarray voice.mp3
//! pcmarray voice.mp3 my_audio.h
//! pcmarray voice.mp3 my_audio.h my_voice_data
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pcmarray::convert::{Conversion, Outcome};
use pcmarray::decoder::{Decoder, DEFAULT_FFMPEG};
use pcmarray::{
    guard_from_path, usage_snippet, EncoderConfig, PcmSpecs, Radix, SampleFormat,
    DEFAULT_ARRAY_NAME, DEFAULT_HEADER_FILE, DEFAULT_NUM_CHANNELS, DEFAULT_SAMPLE_RATE,
    DEFAULT_SIZE_WARNING_BYTES, DEFAULT_VALUES_PER_LINE,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pcmarray",
    version,
    about = "Convert an audio file into a C header array of raw PCM samples"
)]
struct Args {
    /// Input audio file (any format ffmpeg can read)
    input: PathBuf,

    /// Output header file
    #[arg(default_value = DEFAULT_HEADER_FILE)]
    output: PathBuf,

    /// Array identifier
    #[arg(default_value = DEFAULT_ARRAY_NAME)]
    array_name: String,

    /// Include guard macro [default: derived from the output file name]
    #[arg(long)]
    guard: Option<String>,

    /// Array elements per line
    #[arg(long, default_value_t = DEFAULT_VALUES_PER_LINE)]
    values_per_line: usize,

    /// Sample rate of the raw PCM in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Number of channels of the raw PCM
    #[arg(long, default_value_t = DEFAULT_NUM_CHANNELS)]
    channels: u16,

    /// Sample format of the raw PCM
    #[arg(long, value_enum, default_value_t = FormatArg::S32le)]
    format: FormatArg,

    /// Numeric base of the array literals
    #[arg(long, value_enum, default_value_t = RadixArg::Hex)]
    radix: RadixArg,

    /// C type of the array elements [default: matches the sample format]
    #[arg(long)]
    element_type: Option<String>,

    /// ffmpeg executable
    #[arg(long, default_value = DEFAULT_FFMPEG)]
    ffmpeg: String,

    /// Ask for confirmation when the raw PCM is larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_SIZE_WARNING_BYTES)]
    size_warning: u64,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    S8,
    S16le,
    S16be,
    S32le,
    S32be,
}

impl From<FormatArg> for SampleFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::S8 => SampleFormat::S8,
            FormatArg::S16le => SampleFormat::S16Le,
            FormatArg::S16be => SampleFormat::S16Be,
            FormatArg::S32le => SampleFormat::S32Le,
            FormatArg::S32be => SampleFormat::S32Be,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RadixArg {
    Hex,
    Dec,
}

impl From<RadixArg> for Radix {
    fn from(r: RadixArg) -> Self {
        match r {
            RadixArg::Hex => Radix::Hex,
            RadixArg::Dec => Radix::Decimal,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let specs = PcmSpecs {
        sample_format: args.format.into(),
        num_channels: args.channels,
        sample_rate: args.sample_rate,
    };
    let guard = args
        .guard
        .clone()
        .unwrap_or_else(|| guard_from_path(&args.output));
    let mut config = EncoderConfig::new(&args.array_name, &guard)?
        .with_specs(specs)
        .with_values_per_line(args.values_per_line)?
        .with_radix(args.radix.into());
    if let Some(element_type) = &args.element_type {
        config = config.with_element_type(element_type)?;
    }

    if let Ok(meta) = fs::metadata(&args.input) {
        info!("Input file size: {:.2} KB", meta.len() as f64 / 1024.0);
    }

    let conversion = Conversion {
        decoder: Decoder::new(&args.ffmpeg, specs),
        config,
        size_warning: args.size_warning,
    };
    let outcome = conversion.run(&args.input, &args.output, |_| {
        if args.yes {
            Ok(true)
        } else {
            confirm("Continue? (y/n): ")
        }
    })?;
    if outcome == Outcome::Cancelled {
        return Ok(());
    }

    let header_file = args
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_HEADER_FILE.to_owned());
    println!("{}", usage_snippet(&header_file, conversion.config.array_name()));
    Ok(())
}

/// Ask a yes/no question on the terminal. Only `y` or `Y` counts as yes.
fn confirm(question: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
