//! Runtime configuration: built-in defaults, an optional JSON file, then
//! environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COMPOSITE_ANALYZER_CONFIG";
/// Config file looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "composite-analyzer.json";

const DEMO_MODE_ENV: &str = "DEMO_MODE";
const UPLOADS_ENV: &str = "COMPOSITE_ANALYZER_UPLOADS";
const BRIDGE_ENV: &str = "COMPOSITE_ANALYZER_BRIDGE";

/// How to reach the modelling engine's automation interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Skip the engine entirely and run with an unavailable session.
    #[serde(default)]
    pub demo_mode: bool,

    /// Bridge executable that forwards verbs to the engine.
    #[serde(default = "default_bridge_program")]
    pub bridge_program: PathBuf,

    /// Arguments placed before the verb (e.g. a script path for an interpreter).
    #[serde(default)]
    pub bridge_args: Vec<String>,
}

fn default_bridge_program() -> PathBuf {
    PathBuf::from("studio-bridge")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            bridge_program: default_bridge_program(),
            bridge_args: Vec::new(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where picked `.dm` files are copied.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploaded_files")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the configuration for this process.
    pub fn load() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration with environment variables read through
    /// `lookup`. An unreadable config file falls back to the defaults; the
    /// environment overrides are applied either way.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let file = match lookup(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(path) => Self::from_json(&path).unwrap_or_else(|e| {
                log::error!("Invalid configuration, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_env(lookup);
        config
    }

    pub fn from_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(flag) = lookup(DEMO_MODE_ENV) {
            self.engine.demo_mode = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(dir) = lookup(UPLOADS_ENV) {
            self.uploads_dir = PathBuf::from(dir);
        }
        if let Some(program) = lookup(BRIDGE_ENV) {
            self.engine.bridge_program = PathBuf::from(program);
        }
    }
}
