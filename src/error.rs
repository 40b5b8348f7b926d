use std::path::PathBuf;

use thiserror::Error;

use crate::core::Provider;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Unknown model \"{id}\" (run `llmquote models` to list the catalog)")]
    UnknownModel { id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Estimate(#[from] EstimateError),
}

/// Failures of the token estimator and price calculator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum EstimateError {
    #[error("No image pricing formula for provider {provider}")]
    UnsupportedImageProvider { provider: Provider },
}

/// Reasons a shared configuration string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CodecError {
    #[error("shared configuration is empty")]
    Empty,

    #[error("malformed transport encoding: {0}")]
    Transport(String),

    #[error("payload is not valid text")]
    NotText,

    #[error("unsupported link format version '{0}'")]
    UnsupportedVersion(char),

    #[error("packed payload is truncated or corrupt")]
    Truncated,

    #[error("unknown field code \"{0}\"")]
    UnknownField(String),

    #[error("invalid value for field \"{field}\": \"{value}\"")]
    InvalidValue { field: &'static str, value: String },

    #[error("checksum missing")]
    MissingChecksum,

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_locale() {
        let e = AppError::UnsupportedLocale {
            input: "xx".to_string(),
        };
        assert_eq!(e.to_string(), "Unsupported locale: xx");
    }

    #[test]
    fn app_error_display_unknown_model() {
        let e = AppError::UnknownModel {
            id: "gpt-9".to_string(),
        };
        assert!(e.to_string().starts_with("Unknown model \"gpt-9\""));
    }

    #[test]
    fn estimate_error_names_provider() {
        let e = EstimateError::UnsupportedImageProvider {
            provider: Provider::DeepSeek,
        };
        assert_eq!(e.to_string(), "No image pricing formula for provider deepseek");
    }

    #[test]
    fn app_error_from_estimate_error() {
        let e: AppError = EstimateError::UnsupportedImageProvider {
            provider: Provider::Meta,
        }
        .into();
        assert_eq!(e.to_string(), "No image pricing formula for provider meta");
    }

    #[test]
    fn codec_error_invalid_value() {
        let e = CodecError::InvalidValue {
            field: "dataCount",
            value: "abc".to_string(),
        };
        assert_eq!(e.to_string(), r#"invalid value for field "dataCount": "abc""#);
    }
}
