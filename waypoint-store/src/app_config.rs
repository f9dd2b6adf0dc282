use serde::Deserialize;
use std::env;
use std::time::Duration;
use waypoint_shared::Masked;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub flight_search: FlightSearchConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub table: TableDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlightSearchConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: Masked<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BulkConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self { concurrency: default_concurrency() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableDefaults {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self { default_page_size: default_page_size() }
    }
}

fn default_timeout() -> u64 { 30 }
fn default_concurrency() -> usize { 3 }
fn default_page_size() -> usize { 10 }

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked overrides
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `WAYPOINT_BACKEND__BASE_URL=http://...`
            .add_source(config::Environment::with_prefix("WAYPOINT").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
