//! Field remap, value compaction and query-string serialization
//!
//! A configuration becomes a flat `code=value&...` string terminated by a
//! `z=<hex>` checksum. Fields equal to their default are left out, except
//! `dataCount` and `dataType`.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;

use crate::core::{
    ColumnVisibility, Configuration, DataType, ImageSize, ModelSize, PdfData, Provider, Tier,
};
use crate::error::CodecError;

const CHECKSUM_KEY: &str = "z";
/// Upper bound on a decoded prompt/example length
const MAX_TEXT_CHARS: usize = 16 * 1024 * 1024;
/// Escaped inside a single capability tag so the list survives the `,` join
const TAG_ESCAPES: &AsciiSet = &CONTROLS.add(b',').add(b'%');
const FILLER: &str = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    DataCount,
    DataType,
    Prompt,
    Example,
    ImageSize,
    PdfData,
    ModelSize,
    Capabilities,
    Batch,
    Tiers,
    Providers,
    Columns,
    Name,
}

impl Field {
    const ALL: [Field; 13] = [
        Field::DataCount,
        Field::DataType,
        Field::Prompt,
        Field::Example,
        Field::ImageSize,
        Field::PdfData,
        Field::ModelSize,
        Field::Capabilities,
        Field::Batch,
        Field::Tiers,
        Field::Providers,
        Field::Columns,
        Field::Name,
    ];

    fn code(self) -> &'static str {
        match self {
            Field::DataCount => "c",
            Field::DataType => "t",
            Field::Prompt => "p",
            Field::Example => "e",
            Field::ImageSize => "i",
            Field::PdfData => "d",
            Field::ModelSize => "s",
            Field::Capabilities => "m",
            Field::Batch => "b",
            Field::Tiers => "r",
            Field::Providers => "v",
            Field::Columns => "k",
            Field::Name => "n",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::DataCount => "dataCount",
            Field::DataType => "dataType",
            Field::Prompt => "prompt",
            Field::Example => "example",
            Field::ImageSize => "imageSize",
            Field::PdfData => "pdfData",
            Field::ModelSize => "modelSize",
            Field::Capabilities => "modelCapabilities",
            Field::Batch => "batchEnabled",
            Field::Tiers => "selectedTiers",
            Field::Providers => "selectedProviders",
            Field::Columns => "showColumns",
            Field::Name => "configName",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    /// Compact value, or `None` when the field holds its default
    fn compact(self, config: &Configuration, default: &Configuration) -> Option<String> {
        let changed = |same: bool| (!same).then_some(());
        let value = match self {
            Field::DataCount => config.data_count.to_string(),
            Field::DataType => config.data_type.code().to_string(),
            Field::Prompt => {
                changed(config.prompt == default.prompt)?;
                config.prompt.chars().count().to_string()
            }
            Field::Example => {
                changed(config.example == default.example)?;
                config.example.chars().count().to_string()
            }
            Field::ImageSize => {
                changed(config.image_size == default.image_size)?;
                format!("{}x{}", config.image_size.width, config.image_size.height)
            }
            Field::PdfData => {
                changed(config.pdf_data == default.pdf_data)?;
                format!("{}-{}", config.pdf_data.pages, config.pdf_data.token_per_page)
            }
            Field::ModelSize => {
                changed(config.model_size == default.model_size)?;
                config.model_size.code().to_string()
            }
            Field::Capabilities => {
                changed(config.model_capabilities == default.model_capabilities)?;
                config
                    .model_capabilities
                    .iter()
                    .map(|tag| utf8_percent_encode(tag, TAG_ESCAPES).to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }
            Field::Batch => {
                changed(config.batch_enabled == default.batch_enabled)?;
                if config.batch_enabled { "1" } else { "0" }.to_string()
            }
            Field::Tiers => {
                changed(config.selected_tiers == default.selected_tiers)?;
                config.selected_tiers.iter().map(|t| t.code()).collect()
            }
            Field::Providers => {
                changed(config.selected_providers == default.selected_providers)?;
                config.selected_providers.iter().map(|p| p.code()).collect()
            }
            Field::Columns => {
                changed(config.show_columns == default.show_columns)?;
                config.show_columns.to_bits()
            }
            Field::Name => {
                changed(config.config_name == default.config_name)?;
                config.config_name.clone()
            }
        };
        Some(value)
    }

    fn apply(self, config: &mut Configuration, value: &str) -> Result<(), CodecError> {
        let invalid = || CodecError::InvalidValue {
            field: self.name(),
            value: value.to_string(),
        };
        match self {
            Field::DataCount => config.data_count = value.parse().map_err(|_| invalid())?,
            Field::DataType => {
                config.data_type = single_char(value)
                    .and_then(DataType::from_code)
                    .ok_or_else(invalid)?;
            }
            Field::Prompt => config.prompt = filler(parse_len(value).ok_or_else(invalid)?),
            Field::Example => config.example = filler(parse_len(value).ok_or_else(invalid)?),
            Field::ImageSize => {
                let (w, h) = parse_pair(value, 'x').ok_or_else(invalid)?;
                config.image_size = ImageSize {
                    width: w,
                    height: h,
                };
            }
            Field::PdfData => {
                let (pages, per_page) = parse_pair(value, '-').ok_or_else(invalid)?;
                config.pdf_data = PdfData {
                    pages,
                    token_per_page: per_page,
                };
            }
            Field::ModelSize => {
                config.model_size = single_char(value)
                    .and_then(ModelSize::from_code)
                    .ok_or_else(invalid)?;
            }
            Field::Capabilities => {
                // Present means non-default, so "" is one empty tag
                config.model_capabilities = value
                    .split(',')
                    .map(|tag| {
                        percent_decode_str(tag)
                            .decode_utf8()
                            .map(|t| t.into_owned())
                            .map_err(|_| invalid())
                    })
                    .collect::<Result<_, _>>()?;
            }
            Field::Batch => {
                config.batch_enabled = match value {
                    "1" => true,
                    "0" => false,
                    _ => return Err(invalid()),
                };
            }
            Field::Tiers => {
                config.selected_tiers = value
                    .chars()
                    .map(Tier::from_code)
                    .collect::<Option<_>>()
                    .ok_or_else(invalid)?;
            }
            Field::Providers => {
                config.selected_providers = value
                    .chars()
                    .map(Provider::from_code)
                    .collect::<Option<_>>()
                    .ok_or_else(invalid)?;
            }
            Field::Columns => {
                config.show_columns = ColumnVisibility::from_bits(value).ok_or_else(invalid)?;
            }
            Field::Name => config.config_name = value.to_string(),
        }
        Ok(())
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn parse_len(value: &str) -> Option<usize> {
    value.parse().ok().filter(|&n| n <= MAX_TEXT_CHARS)
}

fn parse_pair(value: &str, sep: char) -> Option<(u32, u32)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.parse().ok()?, b.parse().ok()?))
}

/// Deterministic stand-in text of exactly `len` chars
fn filler(len: usize) -> String {
    FILLER.chars().cycle().take(len).collect()
}

/// FNV-1a folded to 16 bits
fn checksum(text: &str) -> u16 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in text.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    ((hash >> 16) ^ (hash & 0xffff)) as u16
}

/// Stages 1-3: the readable query string that gets obfuscated
pub(crate) fn structural_form(config: &Configuration) -> String {
    let default = Configuration::default();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for field in Field::ALL {
        if let Some(value) = field.compact(config, &default) {
            serializer.append_pair(field.code(), &value);
        }
    }
    let body = serializer.finish();
    format!("{body}&{CHECKSUM_KEY}={:04x}", checksum(&body))
}

pub(crate) fn parse_structural_form(text: &str) -> Result<Configuration, CodecError> {
    let (body, sum) = text
        .rsplit_once(&format!("&{CHECKSUM_KEY}="))
        .ok_or(CodecError::MissingChecksum)?;
    if sum.len() != 4 || u16::from_str_radix(sum, 16).ok() != Some(checksum(body)) {
        return Err(CodecError::ChecksumMismatch);
    }

    let mut config = Configuration::default();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        let field =
            Field::from_code(&key).ok_or_else(|| CodecError::UnknownField(key.to_string()))?;
        field.apply(&mut config, &value)?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Column;

    #[test]
    fn field_codes_are_unique() {
        for (i, a) in Field::ALL.iter().enumerate() {
            for b in &Field::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
            assert_ne!(a.code(), CHECKSUM_KEY);
            assert_eq!(Field::from_code(a.code()), Some(*a));
        }
    }

    #[test]
    fn default_config_keeps_only_required_fields() {
        let form = structural_form(&Configuration::default());
        let body = form.rsplit_once("&z=").unwrap().0;
        assert_eq!(body, "c=1&t=p");
    }

    #[test]
    fn image_workload_structural_form() {
        let config = Configuration {
            data_count: 500,
            data_type: DataType::Images,
            image_size: ImageSize {
                width: 512,
                height: 512,
            },
            ..Configuration::default()
        };
        let form = structural_form(&config);
        assert!(form.starts_with("c=500&t=i&i=512x512&z="), "{form}");
        assert_eq!(parse_structural_form(&form).unwrap(), config);
    }

    #[test]
    fn composite_and_set_fields() {
        let mut columns = ColumnVisibility::default();
        columns.set(Column::CachedCost, false);
        let config = Configuration {
            data_count: 3,
            data_type: DataType::Pdfs,
            pdf_data: PdfData {
                pages: 40,
                token_per_page: 1200,
            },
            model_size: ModelSize::Big,
            model_capabilities: vec!["vision".into(), "tools".into()],
            batch_enabled: true,
            selected_tiers: vec![Tier::Big, Tier::Small],
            selected_providers: vec![Provider::Meta, Provider::OpenAi],
            show_columns: columns,
            config_name: "Q3 invoices & receipts".into(),
            ..Configuration::default()
        };
        let form = structural_form(&config);
        assert!(form.contains("d=40-1200"));
        assert!(form.contains("r=bs"));
        assert!(form.contains("v=lo"));
        assert!(form.contains("k=11111101"));
        assert!(form.contains("b=1"));
        assert_eq!(parse_structural_form(&form).unwrap(), config);
    }

    #[test]
    fn text_is_reduced_to_its_length() {
        let config = Configuration {
            prompt: "Résumé: translate ✓".into(),
            example: "{\"a\":\"b\"}".into(),
            ..Configuration::default()
        };
        let form = structural_form(&config);
        assert!(form.contains("p=19"));
        assert!(form.contains("e=9"));
        assert!(!form.contains("translate"));

        let back = parse_structural_form(&form).unwrap();
        assert_eq!(back.prompt.chars().count(), 19);
        assert_eq!(back.example.chars().count(), 9);
        assert_ne!(back.prompt, config.prompt);
    }

    #[test]
    fn filler_has_exact_length() {
        assert_eq!(filler(0), "");
        assert_eq!(filler(5), "lorem");
        assert_eq!(filler(1000).chars().count(), 1000);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let body = "c=1&t=p&q=7";
        let form = format!("{body}&z={:04x}", checksum(body));
        assert_eq!(
            parse_structural_form(&form),
            Err(CodecError::UnknownField("q".into()))
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        for body in [
            "c=abc",
            "c=1&t=x",
            "c=1&i=512",
            "c=1&d=1x2",
            "c=1&b=yes",
            "c=1&r=sz",
            "c=1&k=101",
            "c=1&t=pp",
            "c=1&p=99999999999",
        ] {
            let form = format!("{body}&z={:04x}", checksum(body));
            assert!(
                matches!(
                    parse_structural_form(&form),
                    Err(CodecError::InvalidValue { .. })
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn checksum_is_required_and_verified() {
        assert_eq!(
            parse_structural_form("c=1&t=p"),
            Err(CodecError::MissingChecksum)
        );
        let form = structural_form(&Configuration {
            data_count: 500,
            ..Configuration::default()
        });
        let tampered = form.replacen("c=500", "c=50", 1);
        assert_eq!(
            parse_structural_form(&tampered),
            Err(CodecError::ChecksumMismatch)
        );
    }
}
