/// Model used by `estimate` when none is given
pub(crate) const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Share links point here unless `--base-url` or `base_url` says otherwise
pub(crate) const DEFAULT_BASE_URL: &str = "https://llmquote.dev/";

/// Placeholder for values that do not apply to a model
pub(crate) const NOT_APPLICABLE: &str = "-";
