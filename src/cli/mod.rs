pub(crate) mod args;
pub(crate) mod commands;
pub(crate) mod workload;

pub(crate) use args::{Cli, SortOrder};
pub(crate) use commands::{Command, parse_command};
