//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};

use super::commands::Commands;
use super::workload::WorkloadArgs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortOrder {
    /// Cheapest first (default)
    #[default]
    Asc,
    /// Most expensive first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "llmquote")]
#[command(about = "Estimate LLM token usage and cost for a workload", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    #[command(flatten)]
    pub(crate) workload: WorkloadArgs,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Sort order for ranked results
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Locale for number formatting (e.g., "en", "zh", "de")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Model catalog JSON file replacing the builtin catalog
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) catalog: Option<PathBuf>,

    /// Count tokens with a provider tokenizer when one is available
    #[arg(long, global = true)]
    pub(crate) exact: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.exact && config.exact_tokens {
            self.exact = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // Enum values: only override when CLI is at its default
        if let Some(ConfigSortOrder::Desc) = config.order
            && self.order == SortOrder::Asc
        {
            self.order = SortOrder::Desc;
        }
        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.catalog.is_none() {
            self.catalog = config.catalog.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("llmquote").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_means_estimate() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.order, SortOrder::Asc);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["compare", "-j", "-o", "desc", "--count", "10"]);
        assert!(matches!(cli.command, Some(Commands::Compare { .. })));
        assert!(cli.json);
        assert_eq!(cli.order, SortOrder::Desc);
        assert_eq!(cli.workload.count, Some(10));
    }

    #[test]
    fn config_fills_unset_values() {
        let config: Config = toml::from_str(
            r#"
            order = "desc"
            color = "never"
            locale = "de"
            exact_tokens = true
            "#,
        )
        .unwrap();
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.order, SortOrder::Desc);
        assert_eq!(cli.color, ColorMode::Never);
        assert_eq!(cli.locale.as_deref(), Some("de"));
        assert!(cli.exact);
        assert!(!cli.use_color());
    }

    #[test]
    fn cli_values_win_over_config() {
        let config: Config = toml::from_str(
            r#"
            color = "never"
            locale = "de"
            "#,
        )
        .unwrap();
        let cli = parse(&["--color", "always", "--locale", "fr"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Always);
        assert_eq!(cli.locale.as_deref(), Some("fr"));
    }

    #[test]
    fn no_color_beats_always() {
        let cli = parse(&["--color", "always", "--no-color"]);
        assert!(!cli.use_color());
    }

    #[test]
    fn batch_and_no_batch_conflict() {
        assert!(Cli::try_parse_from(["llmquote", "--batch", "--no-batch"]).is_err());
        assert!(parse(&["share", "--no-batch"]).workload.no_batch);
    }

    #[test]
    fn zero_count_is_rejected() {
        let result = Cli::try_parse_from(["llmquote", "--count", "0"]);
        assert!(result.is_err());
    }
}
