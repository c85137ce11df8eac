use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub similarity: SimilaritySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// Inputs of the scoring session hosted by this process
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_requirements_path")]
    pub requirements_path: PathBuf,
    #[serde(default = "default_reference_profiles_path")]
    pub reference_profiles_path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            requirements_path: default_requirements_path(),
            reference_profiles_path: default_reference_profiles_path(),
        }
    }
}

fn default_requirements_path() -> PathBuf { PathBuf::from("data/processed/jd_requirements.json") }
fn default_reference_profiles_path() -> PathBuf { PathBuf::from("data/processed/structured_profiles.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct SimilaritySettings {
    #[serde(default = "default_similarity_enabled")]
    pub enabled: bool,
    #[serde(default = "default_similarity_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_similarity_model")]
    pub model: String,
    #[serde(default = "default_similarity_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_skills")]
    pub max_skills_per_list: usize,
}

impl SimilaritySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key, if the remote backend is enabled and one is configured
    pub fn active_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| self.enabled && !key.trim().is_empty())
    }
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self {
            enabled: default_similarity_enabled(),
            endpoint: default_similarity_endpoint(),
            api_key: None,
            model: default_similarity_model(),
            timeout_secs: default_similarity_timeout(),
            max_skills_per_list: default_max_skills(),
        }
    }
}

fn default_similarity_enabled() -> bool { true }
fn default_similarity_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_similarity_model() -> String { "gpt-5-nano".to_string() }
fn default_similarity_timeout() -> u64 { 10 }
fn default_max_skills() -> usize { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_batch_workers")]
    pub workers: usize,
    #[serde(default)]
    pub pacing_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            workers: default_batch_workers(),
            pacing_ms: 0,
        }
    }
}

fn default_batch_workers() -> usize { 4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCORER_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCORER__SIMILARITY__TIMEOUT_SECS -> similarity.timeout_secs
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SCORER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Fill in the similarity API key from OPENAI_API_KEY when none is configured
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let configured = settings
        .get_string("similarity.api_key")
        .ok()
        .filter(|key| !key.trim().is_empty());

    match (configured, std::env::var("OPENAI_API_KEY")) {
        (None, Ok(key)) if !key.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("similarity.api_key", key)?
            .build(),
        _ => Ok(settings),
    }
}
