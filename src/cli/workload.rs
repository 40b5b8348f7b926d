//! Workload flags and how they build a `Configuration`
//!
//! The base comes from `--workload` (JSON file) or `--link`, or the
//! defaults. Individual flags are then applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::codec;
use crate::core::{Column, ColumnVisibility, Configuration, DataType, ModelSize, Provider, Tier};
use crate::error::AppError;

#[derive(Debug, Default, Args)]
pub(crate) struct WorkloadArgs {
    /// Workload JSON file (camelCase fields, unknown fields ignored)
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "link")]
    pub(crate) workload: Option<PathBuf>,

    /// Start from a share link or encoded string
    #[arg(long, global = true, value_name = "LINK")]
    pub(crate) link: Option<String>,

    /// Number of items in the workload
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) count: Option<u64>,

    /// Payload carried by each item
    #[arg(long = "type", global = true, value_enum, value_name = "TYPE")]
    pub(crate) data_type: Option<DataType>,

    /// Prompt text sent with every item
    #[arg(long, global = true, conflicts_with = "prompt_file")]
    pub(crate) prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) prompt_file: Option<PathBuf>,

    /// Example of the expected output for one item
    #[arg(long, global = true, conflicts_with = "example_file")]
    pub(crate) example: Option<String>,

    /// Read the output example from a file
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) example_file: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, global = true)]
    pub(crate) width: Option<u32>,

    /// Image height in pixels
    #[arg(long, global = true)]
    pub(crate) height: Option<u32>,

    /// Pages per PDF
    #[arg(long, global = true)]
    pub(crate) pages: Option<u32>,

    /// Tokens per PDF page
    #[arg(long, global = true)]
    pub(crate) tokens_per_page: Option<u32>,

    /// Use the provider batch API where discounted
    #[arg(long, global = true)]
    pub(crate) batch: bool,

    /// Turn batch pricing off, overriding a workload file or link
    #[arg(long, global = true, conflicts_with = "batch")]
    pub(crate) no_batch: bool,

    /// Restrict to these tiers (comma separated)
    #[arg(long, global = true, value_enum, value_delimiter = ',')]
    pub(crate) tiers: Option<Vec<Tier>>,

    /// Restrict to these providers (comma separated)
    #[arg(long, global = true, value_enum, value_delimiter = ',')]
    pub(crate) providers: Option<Vec<Provider>>,

    /// Require at least one of these capability tags (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub(crate) tags: Option<Vec<String>>,

    /// Preferred model size
    #[arg(long, global = true, value_enum)]
    pub(crate) size: Option<ModelSize>,

    /// Comparison table columns to show (comma separated)
    #[arg(long, global = true, value_enum, value_delimiter = ',')]
    pub(crate) columns: Option<Vec<Column>>,

    /// Label for the workload
    #[arg(long, global = true)]
    pub(crate) name: Option<String>,
}

fn read_text(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_workload_file(path: &Path) -> Result<Configuration, AppError> {
    let content = read_text(path)?;
    serde_json::from_str(&content).map_err(|source| AppError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl WorkloadArgs {
    pub(crate) fn build(&self) -> Result<Configuration, AppError> {
        let mut config = match (&self.workload, &self.link) {
            (Some(path), _) => load_workload_file(path)?,
            (None, Some(link)) => codec::config_from_link(link),
            (None, None) => Configuration::default(),
        };
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut Configuration) -> Result<(), AppError> {
        if let Some(count) = self.count {
            config.data_count = count;
        }
        if let Some(data_type) = self.data_type {
            config.data_type = data_type;
        }

        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        } else if let Some(path) = &self.prompt_file {
            config.prompt = read_text(path)?;
        }
        if let Some(example) = &self.example {
            config.example = example.clone();
        } else if let Some(path) = &self.example_file {
            config.example = read_text(path)?;
        }

        if let Some(width) = self.width {
            config.image_size.width = width;
        }
        if let Some(height) = self.height {
            config.image_size.height = height;
        }
        if let Some(pages) = self.pages {
            config.pdf_data.pages = pages;
        }
        if let Some(per_page) = self.tokens_per_page {
            config.pdf_data.token_per_page = per_page;
        }
        if self.batch {
            config.batch_enabled = true;
        } else if self.no_batch {
            config.batch_enabled = false;
        }

        if let Some(tiers) = &self.tiers {
            config.selected_tiers = dedup(tiers);
        }
        if let Some(providers) = &self.providers {
            config.selected_providers = dedup(providers);
        }
        if let Some(tags) = &self.tags {
            config.model_capabilities = normalize_tags(tags);
        } else {
            // Workload files and links may carry untrimmed or comma-joined tags
            config.model_capabilities = normalize_tags(&config.model_capabilities);
        }
        if let Some(size) = self.size {
            config.model_size = size;
        }
        if let Some(columns) = &self.columns {
            config.show_columns = ColumnVisibility::only(columns);
        }
        if let Some(name) = &self.name {
            config.config_name = name.clone();
        }

        if config.data_count == 0 {
            return Err(AppError::InvalidArgument(
                "workload must have at least one item".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split comma-joined tags, trim them and drop empty ones
fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .flat_map(|t| t.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep first occurrences, in order
fn dedup<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for &item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
