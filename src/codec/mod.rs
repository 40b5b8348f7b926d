//! Configuration codec
//!
//! Turns a `Configuration` into a short, URL-safe string and back.
//! Prompt and example text are reduced to their lengths, so a decoded
//! configuration carries filler text of the same size. Two formats exist:
//!
//! - classic: `base64url(xor(structural form))`
//! - packed:  `~1` + `base64url(xor(huffman(structural form)))`
//!
//! Both end the structural form with a checksum, so truncated or edited
//! strings are rejected instead of decoding to a different workload.

mod fields;
mod link;
mod obfuscate;
mod packed;

use clap::ValueEnum;
use serde::Deserialize;

use crate::core::Configuration;
use crate::error::CodecError;

pub(crate) use fields::structural_form;
pub(crate) use link::{config_from_link, share_link};

const PACKED_PREFIX: char = '~';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LinkFormat {
    #[default]
    Classic,
    Packed,
}

pub(crate) fn encode_as(config: &Configuration, format: LinkFormat) -> String {
    let form = structural_form(config);
    match format {
        LinkFormat::Classic => obfuscate::to_transport(form.as_bytes()),
        LinkFormat::Packed => format!(
            "{PACKED_PREFIX}{}{}",
            packed::VERSION,
            obfuscate::to_transport(&packed::pack(form.as_bytes()))
        ),
    }
}

pub(crate) fn try_decode(encoded: &str) -> Result<Configuration, CodecError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(CodecError::Empty);
    }

    let bytes = match encoded.strip_prefix(PACKED_PREFIX) {
        Some(rest) => {
            let mut chars = rest.chars();
            let version = chars.next().ok_or(CodecError::Empty)?;
            if version != packed::VERSION {
                return Err(CodecError::UnsupportedVersion(version));
            }
            packed::unpack(&obfuscate::from_transport(chars.as_str())?)?
        }
        None => obfuscate::from_transport(encoded)?,
    };

    let text = String::from_utf8(bytes).map_err(|_| CodecError::NotText)?;
    fields::parse_structural_form(&text)
}

/// Decode, logging and discarding any failure
pub(crate) fn decode(encoded: &str) -> Option<Configuration> {
    match try_decode(encoded) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("ignoring shared configuration: {e}");
            None
        }
    }
}
