use core::fmt::Write;
use std::path::Path;

use crate::sample::{decode_samples, write_sample};
use crate::{EncodeError, PcmSpecs, Radix, DEFAULT_VALUES_PER_LINE};

const FALLBACK_GUARD: &str = "AUDIO_DATA_H";
const GUARD_PREFIX: &str = "PCM_";

/// Formatting parameters of the generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    specs: PcmSpecs,
    values_per_line: usize,
    radix: Radix,
    element_type: Option<String>,
    array_name: String,
    guard: String,
}

impl EncoderConfig {
    /// * 'array_name' - Identifier of the array. `<array_name>_len` holds the size in bytes.
    /// * 'guard' - Include guard macro.
    ///
    /// # Errors
    ///
    /// * `EncodeError::InvalidIdentifier` - Either name is not a valid C identifier.
    pub fn new(array_name: &str, guard: &str) -> Result<Self, EncodeError> {
        for name in [array_name, guard] {
            if !is_c_identifier(name) {
                return Err(EncodeError::InvalidIdentifier(name.to_owned()));
            }
        }

        Ok(EncoderConfig {
            specs: PcmSpecs::default(),
            values_per_line: DEFAULT_VALUES_PER_LINE,
            radix: Radix::default(),
            element_type: None,
            array_name: array_name.to_owned(),
            guard: guard.to_owned(),
        })
    }

    /// Describe the PCM stream. The sample format decides how the buffer is split.
    #[must_use]
    pub fn with_specs(mut self, specs: PcmSpecs) -> Self {
        self.specs = specs;
        self
    }

    /// # Errors
    ///
    /// * `EncodeError::InvalidValuesPerLine` - `values_per_line` is 0.
    pub fn with_values_per_line(mut self, values_per_line: usize) -> Result<Self, EncodeError> {
        if values_per_line == 0 {
            return Err(EncodeError::InvalidValuesPerLine);
        }
        self.values_per_line = values_per_line;
        Ok(self)
    }

    #[must_use]
    pub fn with_radix(mut self, radix: Radix) -> Self {
        self.radix = radix;
        self
    }

    /// Override the C element type, e.g. `uint32_t` instead of `int32_t`.
    /// Only identifiers separated by spaces are accepted, such as `unsigned int`.
    ///
    /// # Errors
    ///
    /// * `EncodeError::InvalidElementType` - `element_type` is anything else.
    pub fn with_element_type(mut self, element_type: &str) -> Result<Self, EncodeError> {
        let plain = element_type
            .chars()
            .all(|c| c == ' ' || c == '_' || c.is_ascii_alphanumeric());
        let words: Vec<&str> = element_type.split(' ').filter(|w| !w.is_empty()).collect();
        if !plain || words.is_empty() || !words.iter().all(|w| is_c_identifier(w)) {
            return Err(EncodeError::InvalidElementType(element_type.to_owned()));
        }
        self.element_type = Some(words.join(" "));
        Ok(self)
    }

    #[must_use]
    pub fn specs(&self) -> &PcmSpecs {
        &self.specs
    }

    #[must_use]
    pub fn values_per_line(&self) -> usize {
        self.values_per_line
    }

    #[must_use]
    pub fn radix(&self) -> Radix {
        self.radix
    }

    #[must_use]
    pub fn array_name(&self) -> &str {
        &self.array_name
    }

    #[must_use]
    pub fn guard(&self) -> &str {
        &self.guard
    }

    /// C type of the array elements.
    #[must_use]
    pub fn element_type(&self) -> &str {
        self.element_type
            .as_deref()
            .unwrap_or(self.specs.sample_format.c_type())
    }
}

/// Render raw PCM bytes as an include-guarded C header.
///
/// # Errors
///
/// * `EncodeError::InvalidInput` - `data.len()` is not a multiple of the sample width.
pub fn encode(data: &[u8], config: &EncoderConfig) -> Result<String, EncodeError> {
    let format = config.specs.sample_format;
    let samples = decode_samples(data, format)?;

    // "0x00000000, " is the widest hex element.
    let mut out = String::with_capacity(512 + samples.len() * (format.width() * 2 + 4));
    write_preamble(&mut out, data.len(), config)?;

    writeln!(
        out,
        "const {} {}[] = {{",
        config.element_type(),
        config.array_name
    )?;
    for (line_index, line) in samples.chunks(config.values_per_line).enumerate() {
        if line_index > 0 {
            out.push_str(",\n");
        }
        out.push_str("    ");
        for (i, sample) in line.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_sample(&mut out, *sample, format, config.radix)?;
        }
    }
    out.push_str("\n};\n\n");
    writeln!(out, "#endif // {}", config.guard)?;

    Ok(out)
}

fn write_preamble(
    out: &mut String,
    num_bytes: usize,
    config: &EncoderConfig,
) -> Result<(), EncodeError> {
    let specs = &config.specs;
    let channels = match specs.num_channels {
        1 => " (mono)",
        2 => " (stereo)",
        _ => "",
    };

    out.push_str("/**\n");
    out.push_str(" * Generated by pcmarray. Do not edit.\n");
    writeln!(out, " * Data size: {num_bytes} bytes")?;
    writeln!(out, " * Duration: {:.2} s", specs.duration_secs(num_bytes))?;
    writeln!(out, " * Sample rate: {} Hz", specs.sample_rate)?;
    writeln!(out, " * Bit depth: {} bit", specs.sample_format.bit_depth())?;
    writeln!(out, " * Channels: {}{channels}", specs.num_channels)?;
    out.push_str(" */\n\n");

    writeln!(out, "#ifndef {}", config.guard)?;
    writeln!(out, "#define {}\n", config.guard)?;
    out.push_str("#include <stdint.h>\n\n");
    writeln!(out, "const uint32_t {}_len = {num_bytes};\n", config.array_name)?;
    Ok(())
}

/// Whether `name` can be used as a C identifier.
#[must_use]
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derive an include guard from a header file name, e.g. `audio_data.h` -> `AUDIO_DATA_H`.
/// Names that would start with a digit or an underscore get a `PCM_` prefix, since a leading
/// underscore followed by a capital is reserved in C.
#[must_use]
pub fn guard_from_path(path: &Path) -> String {
    let Some(file_name) = path.file_name() else {
        return FALLBACK_GUARD.to_owned();
    };

    let mut guard: String = file_name
        .to_string_lossy()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if guard.starts_with(|c: char| c.is_ascii_digit() || c == '_') {
        guard.insert_str(0, GUARD_PREFIX);
    }
    guard
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::encoder::{encode, guard_from_path, is_c_identifier, EncoderConfig};
    use crate::{EncodeError, PcmSpecs, Radix, SampleFormat};

    fn array_body(header: &str) -> &str {
        let start = header.find("[] = {\n").unwrap() + "[] = {\n".len();
        let end = header.find("\n};").unwrap();
        &header[start..end]
    }

    #[test]
    fn single_sample() {
        let config = EncoderConfig::new("audio_data", "AUDIO_DATA_H").unwrap();
        let header = encode(&[0x01, 0x00, 0x00, 0x00], &config).unwrap();
        assert!(header.contains("const uint32_t audio_data_len = 4;\n"));
        assert!(header.contains("const int32_t audio_data[] = {\n"));
        assert_eq!(array_body(&header), "    0x00000001");
    }

    #[test]
    fn empty_buffer() {
        let config = EncoderConfig::new("audio_data", "AUDIO_DATA_H").unwrap();
        let header = encode(&[], &config).unwrap();
        assert!(header.contains("const uint32_t audio_data_len = 0;\n"));
        assert!(header.contains("const int32_t audio_data[] = {\n\n};\n"));
    }

    #[test]
    fn negative_sample() {
        let config = EncoderConfig::new("audio_data", "AUDIO_DATA_H").unwrap();
        let header = encode(&[0xFF; 4], &config).unwrap();
        assert_eq!(array_body(&header), "    0xFFFFFFFF");
    }

    #[test]
    fn guard_wraps_document() {
        let config = EncoderConfig::new("beep", "BEEP_H").unwrap();
        let header = encode(&[0; 8], &config).unwrap();
        assert!(header.starts_with("/**\n"));
        assert!(header.contains("#ifndef BEEP_H\n#define BEEP_H\n\n#include <stdint.h>\n"));
        assert!(header.ends_with("};\n\n#endif // BEEP_H\n"));
    }

    #[test]
    fn line_wrapping() {
        let config = EncoderConfig::new("a", "A_H")
            .unwrap()
            .with_values_per_line(8)
            .unwrap();
        let data: Vec<u8> = (0u32..10).flat_map(|v| v.to_le_bytes()).collect();
        let header = encode(&data, &config).unwrap();
        let lines: Vec<&str> = array_body(&header).lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches("0x").count(), 8);
        assert!(lines[0].ends_with("0x00000007,"));
        assert_eq!(lines[1], "    0x00000008, 0x00000009");
    }

    #[test]
    fn exact_multiple_of_line_width() {
        let config = EncoderConfig::new("a", "A_H")
            .unwrap()
            .with_values_per_line(2)
            .unwrap();
        let data: Vec<u8> = (0u32..4).flat_map(|v| v.to_le_bytes()).collect();
        let header = encode(&data, &config).unwrap();
        assert_eq!(
            array_body(&header),
            "    0x00000000, 0x00000001,\n    0x00000002, 0x00000003"
        );
    }

    #[test]
    fn unaligned_buffer_is_rejected() {
        let config = EncoderConfig::new("a", "A_H").unwrap();
        let r = encode(&[0x00; 6], &config);
        assert!(matches!(r, Err(EncodeError::InvalidInput { len: 6, width: 4 })));
    }

    #[test]
    fn sixteen_bit_decimal() {
        let specs = PcmSpecs {
            sample_format: SampleFormat::S16Le,
            num_channels: 1,
            sample_rate: 16000,
        };
        let config = EncoderConfig::new("click", "CLICK_H")
            .unwrap()
            .with_specs(specs)
            .with_radix(Radix::Decimal);
        let header = encode(&[0xFF, 0xFF, 0x10, 0x00], &config).unwrap();
        assert!(header.contains("const int16_t click[] = {\n"));
        assert!(header.contains(" * Channels: 1 (mono)\n"));
        assert!(header.contains(" * Bit depth: 16 bit\n"));
        assert_eq!(array_body(&header), "    -1, 16");
    }

    #[test]
    fn element_type_override() {
        let config = EncoderConfig::new("a", "A_H")
            .unwrap()
            .with_element_type("uint32_t")
            .unwrap();
        let header = encode(&[], &config).unwrap();
        assert!(header.contains("const uint32_t a[] = {"));
    }

    #[test]
    fn duration_comment() {
        let config = EncoderConfig::new("a", "A_H").unwrap();
        let header = encode(&vec![0; 352800 / 2], &config).unwrap();
        assert!(header.contains(" * Duration: 0.50 s\n"));
        assert!(header.contains(" * Channels: 2 (stereo)\n"));
    }

    #[test]
    fn multi_word_element_type() {
        let config = EncoderConfig::new("a", "A_H")
            .unwrap()
            .with_element_type("  unsigned   int ")
            .unwrap();
        assert_eq!(config.element_type(), "unsigned int");
    }

    #[test]
    fn element_type_cannot_inject_code() {
        for bad in ["int x; //", "int{", "int}", "int/", "int\nx", "int\tx", "", "   ", "9int"] {
            let r = EncoderConfig::new("a", "A_H").unwrap().with_element_type(bad);
            assert!(
                matches!(r, Err(EncodeError::InvalidElementType(ref t)) if t == bad),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn invalid_config() {
        assert!(matches!(
            EncoderConfig::new("1abc", "A_H"),
            Err(EncodeError::InvalidIdentifier(name)) if name == "1abc"
        ));
        assert!(matches!(
            EncoderConfig::new("abc", "A-H"),
            Err(EncodeError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            EncoderConfig::new("abc", "A_H").unwrap().with_values_per_line(0),
            Err(EncodeError::InvalidValuesPerLine)
        ));
    }

    #[test]
    fn identifiers() {
        assert!(is_c_identifier("audio_data"));
        assert!(is_c_identifier("_x1"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("9lives"));
        assert!(!is_c_identifier("my-voice"));
    }

    #[test]
    fn guards() {
        assert_eq!(guard_from_path(Path::new("audio_data.h")), "AUDIO_DATA_H");
        assert_eq!(guard_from_path(Path::new("out/my-voice.h")), "MY_VOICE_H");
        assert_eq!(guard_from_path(Path::new("8bit.h")), "PCM_8BIT_H");
        assert_eq!(guard_from_path(Path::new("_voice.h")), "PCM__VOICE_H");
        assert!(is_c_identifier(&guard_from_path(Path::new("8bit.h"))));
        assert_eq!(guard_from_path(Path::new("/")), "AUDIO_DATA_H");
    }
}
