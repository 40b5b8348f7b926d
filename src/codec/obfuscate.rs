//! Keystream mixing and URL-safe transport encoding

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::CodecError;

const KEYSTREAM: &[u8] = b"llmquote/share#K7";

/// XOR with the repeating keystream; applying it twice is the identity
pub(super) fn mix(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(KEYSTREAM.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

pub(super) fn to_transport(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(mix(bytes))
}

pub(super) fn from_transport(text: &str) -> Result<Vec<u8>, CodecError> {
    let text = text.trim_end_matches('=');
    if text.is_empty() {
        return Err(CodecError::Empty);
    }
    let raw = URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|e| CodecError::Transport(e.to_string()))?;
    Ok(mix(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_an_involution() {
        let data = b"c=500&t=i&i=512x512&z=0000";
        assert_eq!(mix(&mix(data)), data);
        assert_ne!(mix(data), data);
    }

    #[test]
    fn transport_is_url_safe() {
        let encoded = to_transport(&(0u8..=255).collect::<Vec<_>>());
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(from_transport(&encoded).unwrap(), (0u8..=255).collect::<Vec<_>>());
    }

    #[test]
    fn padding_is_tolerated() {
        let encoded = to_transport(b"ab");
        let padded = format!("{encoded}==");
        assert_eq!(from_transport(&padded).unwrap(), b"ab");
    }

    #[test]
    fn rejects_foreign_alphabet_and_empty_input() {
        assert!(matches!(from_transport("abc$def"), Err(CodecError::Transport(_))));
        assert_eq!(from_transport(""), Err(CodecError::Empty));
    }
}
