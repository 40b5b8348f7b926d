//! CLI subcommand definitions

use clap::Subcommand;

use crate::codec::LinkFormat;

/// Main CLI commands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Estimate tokens and cost of the workload on one model (default)
    Estimate {
        /// Catalog model id
        #[arg(short, long, value_name = "ID")]
        model: Option<String>,
    },
    /// Rank catalog models by total cost for the workload
    Compare {
        /// Only models whose id contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Group models by provider and mark the cheapest of each
        #[arg(short, long)]
        group: bool,
    },
    /// Print a share link for the workload
    Share {
        /// Link encoding
        #[arg(long, value_enum)]
        format: Option<LinkFormat>,
        /// Base URL the encoded workload is attached to
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
    /// Reconstruct a workload from a share link or encoded string
    Decode {
        /// Share link, `?config=...` query, or bare encoded string
        input: String,
    },
    /// List the model catalog
    Models,
}

/// Normalized command with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Estimate { model: Option<String> },
    Compare { search: Option<String>, group: bool },
    Share { format: Option<LinkFormat>, base_url: Option<String> },
    Decode { input: String },
    Models,
}

impl Command {
    /// Whether the command reads the workload flags
    pub(crate) fn uses_workload(&self) -> bool {
        matches!(
            self,
            Command::Estimate { .. } | Command::Compare { .. } | Command::Share { .. }
        )
    }
}

impl From<&Commands> for Command {
    fn from(cmd: &Commands) -> Self {
        match cmd {
            Commands::Estimate { model } => Command::Estimate {
                model: model.clone(),
            },
            Commands::Compare { search, group } => Command::Compare {
                search: search.clone(),
                group: *group,
            },
            Commands::Share { format, base_url } => Command::Share {
                format: *format,
                base_url: base_url.clone(),
            },
            Commands::Decode { input } => Command::Decode {
                input: input.clone(),
            },
            Commands::Models => Command::Models,
        }
    }
}

/// Parse CLI command, defaulting to `estimate`
pub(crate) fn parse_command(cmd: &Option<Commands>) -> Command {
    match cmd {
        Some(cmd) => Command::from(cmd),
        None => Command::Estimate { model: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_estimate() {
        assert_eq!(parse_command(&None), Command::Estimate { model: None });
    }

    #[test]
    fn workload_commands() {
        assert!(parse_command(&None).uses_workload());
        assert!(parse_command(&Some(Commands::Share {
            format: None,
            base_url: None
        }))
        .uses_workload());
        assert!(!parse_command(&Some(Commands::Models)).uses_workload());
        assert!(!parse_command(&Some(Commands::Decode {
            input: "x".into()
        }))
        .uses_workload());
    }
}
