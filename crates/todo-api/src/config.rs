use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Server settings, read from `DATABASE_URL`, `API_HOST` and `API_PORT`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("api_host", DEFAULT_HOST)?
            .set_default("api_port", i64::from(DEFAULT_PORT))?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            api_host: DEFAULT_HOST.to_string(),
            api_port: DEFAULT_PORT,
        }
    }
}
