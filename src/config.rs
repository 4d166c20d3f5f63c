use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub regions: HashMap<String, String>,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub clipboard: ClipboardSettings,
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

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Directory or http(s) URL holding one sub-directory per region
    #[serde(default = "default_data_base")]
    pub base: String,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_regions")]
    pub max_regions: u64,
    pub flavour_path: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            base: default_data_base(),
            fetch_timeout_secs: default_fetch_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            max_regions: default_max_regions(),
            flavour_path: None,
        }
    }
}

fn default_data_base() -> String { "./data".to_string() }
fn default_fetch_timeout() -> u64 { 30 }
fn default_cache_ttl() -> u64 { 3600 }
fn default_max_regions() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius(),
            max_radius_km: default_max_radius(),
        }
    }
}

fn default_radius() -> f64 { 10.0 }
fn default_max_radius() -> f64 { 2000.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_idle_timeout() -> u64 { 1800 }
fn default_max_sessions() -> u64 { 1000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipboardSettings {
    /// Write copies to the host clipboard; off for headless deployments
    #[serde(default)]
    pub enabled: bool,
}

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
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOOLS_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOOLS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCHOOLS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCHOOLS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Display name for a region code, falling back to the uppercased code
    pub fn region_name(&self, region: &str) -> String {
        let code = region.trim().to_lowercase();
        self.regions
            .get(&code)
            .cloned()
            .unwrap_or_else(|| code.to_uppercase())
    }
}

/// Short environment aliases for the settings most often changed per deployment
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(base) = env::var("DATA_BASE") {
        builder = builder.set_override("data.base", base)?;
    }
    if let Ok(path) = env::var("FLAVOUR_PATH") {
        builder = builder.set_override("data.flavour_path", path)?;
    }

    builder.build()
}
