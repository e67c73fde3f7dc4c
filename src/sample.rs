use core::fmt::{self, Write};

use winnow::binary::{be_i16, be_i32, le_i16, le_i32, le_i8};
use winnow::combinator::repeat;
use winnow::error::ModalResult;
use winnow::Parser;

use crate::{EncodeError, Radix, SampleFormat};

/// Parse one sample and widen it to i32.
fn parse_sample(input: &mut &[u8], format: SampleFormat) -> ModalResult<i32> {
    match format {
        SampleFormat::S8 => le_i8.map(i32::from).parse_next(input),
        SampleFormat::S16Le => le_i16.map(i32::from).parse_next(input),
        SampleFormat::S16Be => be_i16.map(i32::from).parse_next(input),
        SampleFormat::S32Le => le_i32.parse_next(input),
        SampleFormat::S32Be => be_i32.parse_next(input),
    }
}

/// Decode a raw PCM byte buffer into sample values.
///
/// # Errors
///
/// * `EncodeError::InvalidInput` - `data.len()` is not a multiple of the sample width.
pub fn decode_samples(data: &[u8], format: SampleFormat) -> Result<Vec<i32>, EncodeError> {
    let width = format.width();
    let invalid = || EncodeError::InvalidInput {
        len: data.len(),
        width,
    };
    if data.len() % width != 0 {
        return Err(invalid());
    }

    let mut input = data;
    let samples: Vec<i32> = repeat(data.len() / width, |i: &mut &[u8]| parse_sample(i, format))
        .parse_next(&mut input)
        .map_err(|_| invalid())?;
    Ok(samples)
}

/// Write a sample as a C literal.
/// Hex literals are masked to the sample width so that negative values are never sign extended.
pub(crate) fn write_sample<W: Write>(
    out: &mut W,
    sample: i32,
    format: SampleFormat,
    radix: Radix,
) -> fmt::Result {
    match radix {
        Radix::Hex => {
            let mask = u32::MAX >> (32 - format.bit_depth() as u32);
            let digits = format.width() * 2;
            write!(out, "0x{:0digits$X}", sample as u32 & mask)
        }
        Radix::Decimal => write!(out, "{sample}"),
    }
}

/// Format a sample as a C literal.
#[must_use]
pub fn format_sample(sample: i32, format: SampleFormat, radix: Radix) -> String {
    let mut s = String::new();
    // Writing into a String never fails.
    let _ = write_sample(&mut s, sample, format, radix);
    s
}
