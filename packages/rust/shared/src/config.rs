//! Application configuration for Bleacher.
//!
//! User config lives at `~/.bleacher/bleacher.toml`.
//! CLI flags override environment variables, which override the config file,
//! which overrides defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BleacherError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "bleacher.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bleacher";

// ---------------------------------------------------------------------------
// Config structs (matching bleacher.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Team being reported on.
    #[serde(default)]
    pub team: TeamConfig,

    /// Generation service settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Where and how the rendered document is written.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[team]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Display name, e.g. "Miami Dolphins".
    #[serde(default = "default_team_name")]
    pub name: String,

    /// Subreddit without the `r/` prefix.
    #[serde(default = "default_subreddit")]
    pub subreddit: String,

    /// Google News query, `+`-joined.
    #[serde(default = "default_news_query")]
    pub news_query: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: default_team_name(),
            subreddit: default_subreddit(),
            news_query: default_news_query(),
        }
    }
}

fn default_team_name() -> String {
    "Miami Dolphins".into()
}
fn default_subreddit() -> String {
    "miamidolphins".into()
}
fn default_news_query() -> String {
    "Miami+Dolphins+NFL".into()
}

/// `[generator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for every generation call.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable for tests and proxies).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Attempts per call, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff; attempt `n` waits `n * retry_delay_secs`.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "gemma-3-27b-it".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_temperature() -> f64 {
    0.4
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay_secs() -> u64 {
    5
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the rendered report is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Write a preview file instead of a dated report.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            dry_run: false,
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

impl AppConfig {
    /// Apply `TEAM_NAME`, `TEAM_SUBREDDIT`, `TEAM_NEWS_QUERY` and `DRY_RUN`
    /// from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (used by tests).
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("TEAM_NAME").filter(|v| !v.is_empty()) {
            self.team.name = name;
        }
        if let Some(sub) = lookup("TEAM_SUBREDDIT").filter(|v| !v.is_empty()) {
            self.team.subreddit = sub;
        }
        if let Some(query) = lookup("TEAM_NEWS_QUERY").filter(|v| !v.is_empty()) {
            self.team.news_query = query;
        }
        if let Some(flag) = lookup("DRY_RUN") {
            self.output.dry_run = flag.eq_ignore_ascii_case("true");
        }
    }

    /// Read the generator API key from the configured env var.
    pub fn validate_api_key(&self) -> Result<String> {
        let var_name = &self.generator.api_key_env;
        match std::env::var(var_name) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Err(BleacherError::config(format!(
                "generator API key not found. Set the {var_name} environment variable.\n\
                 Get a key at https://aistudio.google.com/app/apikey"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Seasonal keyword
// ---------------------------------------------------------------------------

/// Offseason/season search keyword for a calendar month (1–12).
pub fn seasonal_keyword(month: u32) -> &'static str {
    match month {
        1 => "Playoffs OR Super Bowl",
        2 => "Free Agency OR Combine",
        3 => "Free Agency OR Signing",
        4 => "Mock Draft OR NFL Draft",
        5 => "NFL Draft OR Undrafted",
        6 => "OTAs OR Offseason",
        7 => "Training Camp OR Roster",
        8 => "Preseason OR Depth Chart",
        9 => "Week 1 OR Season Opener",
        10 => "Standings OR Injury Report",
        11 => "Playoff Race OR Trade Deadline",
        12 => "Playoff Push OR Wild Card",
        _ => "NFL Season",
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bleacher/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BleacherError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.bleacher/bleacher.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk, then apply env overrides.
/// Returns defaults (plus env) if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    let mut config = if path.exists() {
        load_config_from(&path)?
    } else {
        tracing::debug!(?path, "config file not found, using defaults");
        AppConfig::default()
    };

    config.apply_env();
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BleacherError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BleacherError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BleacherError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BleacherError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BleacherError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
