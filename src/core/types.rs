//! Core data types shared by the estimator, ranking and share codec
//!
//! `Configuration` is the user-declared workload. `Model` is an immutable
//! catalog entry. `TokenResult` and `PricingResult` are recomputed per
//! (Configuration, Model) pair and carry no identity.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which auxiliary payload a workload carries besides its prompt text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DataType {
    /// Plain text prompts (default)
    #[default]
    Prompts,
    /// One image per item
    Images,
    /// One PDF document per item
    Pdfs,
}

impl DataType {
    pub(crate) const ALL: [DataType; 3] = [DataType::Prompts, DataType::Images, DataType::Pdfs];

    pub(crate) fn code(self) -> char {
        match self {
            DataType::Prompts => 'p',
            DataType::Images => 'i',
            DataType::Pdfs => 'd',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DataType::Prompts => "prompts",
            DataType::Images => "images",
            DataType::Pdfs => "pdfs",
        }
    }
}

/// Coarse model-size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Tier {
    Small,
    Medium,
    Big,
}

impl Tier {
    pub(crate) const ALL: [Tier; 3] = [Tier::Small, Tier::Medium, Tier::Big];

    pub(crate) fn code(self) -> char {
        match self {
            Tier::Small => 's',
            Tier::Medium => 'm',
            Tier::Big => 'b',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Big => "big",
        }
    }
}

/// Preferred model size; narrows ranking to one tier unless `Any`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModelSize {
    #[default]
    Any,
    Small,
    Medium,
    Big,
}

impl ModelSize {
    pub(crate) const ALL: [ModelSize; 4] = [
        ModelSize::Any,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Big,
    ];

    pub(crate) fn code(self) -> char {
        match self {
            ModelSize::Any => 'a',
            ModelSize::Small => 's',
            ModelSize::Medium => 'm',
            ModelSize::Big => 'b',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub(crate) fn tier(self) -> Option<Tier> {
        match self {
            ModelSize::Any => None,
            ModelSize::Small => Some(Tier::Small),
            ModelSize::Medium => Some(Tier::Medium),
            ModelSize::Big => Some(Tier::Big),
        }
    }
}

/// Model vendor. Selects image formula, batch discount and PDF policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Provider {
    Anthropic,
    #[value(name = "openai")]
    OpenAi,
    Google,
    Mistral,
    Meta,
    #[value(name = "deepseek")]
    DeepSeek,
}

impl Provider {
    pub(crate) const ALL: [Provider; 6] = [
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Google,
        Provider::Mistral,
        Provider::Meta,
        Provider::DeepSeek,
    ];

    pub(crate) fn code(self) -> char {
        match self {
            Provider::Anthropic => 'a',
            Provider::OpenAi => 'o',
            Provider::Google => 'g',
            Provider::Mistral => 'm',
            Provider::Meta => 'l',
            Provider::DeepSeek => 'd',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Google => "google",
            Provider::Mistral => "mistral",
            Provider::Meta => "meta",
            Provider::DeepSeek => "deepseek",
        }
    }

    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
            Provider::Google => "Google",
            Provider::Mistral => "Mistral",
            Provider::Meta => "Meta",
            Provider::DeepSeek => "DeepSeek",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ImageSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize {
            width: 1024,
            height: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PdfData {
    pub(crate) pages: u32,
    pub(crate) token_per_page: u32,
}

impl Default for PdfData {
    fn default() -> Self {
        PdfData {
            pages: 1,
            token_per_page: 500,
        }
    }
}

pub(crate) const COLUMN_COUNT: usize = 8;

/// Result table columns, in their fixed bit-string order
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Column {
    Provider,
    Tier,
    InputTokens,
    OutputTokens,
    InputCost,
    OutputCost,
    CachedCost,
    TotalCost,
}

impl Column {
    pub(crate) const ALL: [Column; COLUMN_COUNT] = [
        Column::Provider,
        Column::Tier,
        Column::InputTokens,
        Column::OutputTokens,
        Column::InputCost,
        Column::OutputCost,
        Column::CachedCost,
        Column::TotalCost,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn header(self) -> &'static str {
        match self {
            Column::Provider => "Provider",
            Column::Tier => "Tier",
            Column::InputTokens => "Input Tok",
            Column::OutputTokens => "Output Tok",
            Column::InputCost => "Input $",
            Column::OutputCost => "Output $",
            Column::CachedCost => "Cached $",
            Column::TotalCost => "Total $",
        }
    }
}

/// Per-column visibility flags for the comparison table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnVisibility([bool; COLUMN_COUNT]);

impl Default for ColumnVisibility {
    fn default() -> Self {
        ColumnVisibility([true; COLUMN_COUNT])
    }
}

impl ColumnVisibility {
    pub(crate) fn only(columns: &[Column]) -> Self {
        let mut flags = [false; COLUMN_COUNT];
        for column in columns {
            flags[column.index()] = true;
        }
        ColumnVisibility(flags)
    }

    pub(crate) fn is_visible(&self, column: Column) -> bool {
        self.0[column.index()]
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, column: Column, visible: bool) {
        self.0[column.index()] = visible;
    }

    /// One '0'/'1' per column, in `Column::ALL` order
    pub(crate) fn to_bits(self) -> String {
        self.0.iter().map(|&v| if v { '1' } else { '0' }).collect()
    }

    pub(crate) fn from_bits(bits: &str) -> Option<Self> {
        if bits.len() != COLUMN_COUNT {
            return None;
        }
        let mut flags = [false; COLUMN_COUNT];
        for (flag, c) in flags.iter_mut().zip(bits.chars()) {
            *flag = match c {
                '1' => true,
                '0' => false,
                _ => return None,
            };
        }
        Some(ColumnVisibility(flags))
    }
}

impl Serialize for ColumnVisibility {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bits())
    }
}

impl<'de> Deserialize<'de> for ColumnVisibility {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = String::deserialize(deserializer)?;
        ColumnVisibility::from_bits(&bits).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "expected {} '0'/'1' flags, got \"{bits}\"",
                COLUMN_COUNT
            ))
        })
    }
}

/// User-declared workload
///
/// Only `data_count`, `data_type`, the active payload (`image_size` or
/// `pdf_data`), `prompt`, `example` and `batch_enabled` feed the cost math.
/// The remaining fields are filters and display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Configuration {
    pub(crate) data_count: u64,
    pub(crate) data_type: DataType,
    pub(crate) prompt: String,
    pub(crate) example: String,
    pub(crate) image_size: ImageSize,
    pub(crate) pdf_data: PdfData,
    pub(crate) model_size: ModelSize,
    pub(crate) model_capabilities: Vec<String>,
    pub(crate) batch_enabled: bool,
    pub(crate) selected_tiers: Vec<Tier>,
    pub(crate) selected_providers: Vec<Provider>,
    pub(crate) show_columns: ColumnVisibility,
    pub(crate) config_name: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            data_count: 1,
            data_type: DataType::Prompts,
            prompt: String::new(),
            example: String::new(),
            image_size: ImageSize::default(),
            pdf_data: PdfData::default(),
            model_size: ModelSize::Any,
            model_capabilities: Vec::new(),
            batch_enabled: false,
            selected_tiers: Vec::new(),
            selected_providers: Vec::new(),
            show_columns: ColumnVisibility::default(),
            config_name: String::new(),
        }
    }
}

/// Catalog entry. Costs are money per million tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Model {
    pub(crate) id: String,
    pub(crate) provider: Provider,
    pub(crate) tier: Tier,
    pub(crate) input_cost: f64,
    pub(crate) output_cost: f64,
    /// `None` means the model does not support prompt caching
    #[serde(default)]
    pub(crate) cache_cost: Option<f64>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    pub(crate) max_token: u64,
    #[serde(default)]
    pub(crate) license: String,
}

impl Model {
    pub(crate) fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Per-item input token breakdown
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct InputTokens {
    pub(crate) text: u64,
    pub(crate) document: u64,
    pub(crate) image: u64,
    pub(crate) total: u64,
}

/// Token counts for a single item of the workload
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct TokenResult {
    pub(crate) input: InputTokens,
    pub(crate) output: u64,
    pub(crate) total: u64,
}

/// Input cost breakdown over the whole workload
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct InputCost {
    pub(crate) text: f64,
    pub(crate) document: f64,
    pub(crate) image: f64,
    /// text + document + image + cached
    pub(crate) total: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct PricingResult {
    pub(crate) tokens: TokenResult,
    /// Per-item total multiplied by the item count
    pub(crate) total_tokens: u64,
    pub(crate) input_cost: InputCost,
    /// Present only for models with a cache rate
    pub(crate) cached_cost: Option<f64>,
    pub(crate) output_cost: f64,
    /// Excludes `cached_cost`, see `InputCost::total`
    pub(crate) total_cost: f64,
}
