use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::codec::LinkFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) exact_tokens: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) catalog: Option<PathBuf>,
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    #[serde(default)]
    pub(crate) link_format: Option<LinkFormat>,

    /// File the values came from
    #[serde(skip)]
    origin: Option<PathBuf>,
    /// Files that failed to parse, reported once logging is up
    #[serde(skip)]
    rejected: Vec<(PathBuf, String)>,
}

impl Config {
    /// Load the first readable config file. Runs before logging is set up,
    /// so outcomes are kept for `report`.
    pub(crate) fn load() -> Self {
        let mut rejected = Vec::new();

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(mut config) => {
                        config.origin = Some(path);
                        config.rejected = rejected;
                        return config;
                    }
                    Err(e) => rejected.push((path, e.to_string())),
                }
            }
        }

        Config {
            rejected,
            ..Self::default()
        }
    }

    pub(crate) fn report(&self) {
        for (path, error) in &self.rejected {
            tracing::warn!("Failed to parse {}: {}", path.display(), error);
        }
        if let Some(path) = &self.origin {
            tracing::debug!("Loaded config from {}", path.display());
        }
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/llmquote/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("llmquote").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support/llmquote/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("llmquote").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.llmquote.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".llmquote.toml"));
        }

        paths
    }
}
