use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;
use zeroize::Zeroizing;

use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default)]
    pub provider_cloud_name: String,

    #[serde(default)]
    pub provider_api_key: String,

    #[serde(default)]
    pub provider_api_secret: Zeroizing<String>,

    #[serde(default = "default_provider_api_base")]
    pub provider_api_base: String,

    #[serde(default = "default_delivery_base")]
    pub delivery_base: String,

    #[serde(default)]
    pub provider_upload_folder: Option<String>,

    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Clipforge-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_provider_api_base() -> String {
    "https://api.cloudinary.com".to_string()
}
fn default_delivery_base() -> String {
    "https://res.cloudinary.com".to_string()
}
fn default_provider_timeout() -> u64 {
    120
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.provider_cloud_name = fill_or_env(config.provider_cloud_name, "APP_PROVIDER_CLOUD_NAME")?;
        config.provider_api_key = fill_or_env(config.provider_api_key, "APP_PROVIDER_API_KEY")?;
        if config.provider_api_secret.trim().is_empty() {
            config.provider_api_secret = Zeroizing::new(
                fill_or_env(String::new(), "APP_PROVIDER_API_SECRET")?
            );
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty".to_string());
        }
        if self.provider_cloud_name.trim().is_empty() {
            errors.push("PROVIDER_CLOUD_NAME cannot be empty".to_string());
        }
        if self.provider_api_key.trim().is_empty() {
            errors.push("PROVIDER_API_KEY cannot be empty".to_string());
        }
        if self.provider_api_secret.trim().is_empty() {
            errors.push("PROVIDER_API_SECRET cannot be empty".to_string());
        }
        if self.max_upload_bytes == 0 {
            errors.push("MAX_UPLOAD_BYTES must be greater than zero".to_string());
        }
        if self.provider_timeout_secs == 0 {
            errors.push("PROVIDER_TIMEOUT_SECS must be greater than zero".to_string());
        }
        for (key, value) in [
            ("PROVIDER_API_BASE", &self.provider_api_base),
            ("DELIVERY_BASE", &self.delivery_base),
        ] {
            if let Err(e) = Url::parse(value) {
                errors.push(format!("{key} is not a valid URL: {e}"));
            }
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Upload ceiling as a `usize`, saturating on 32-bit targets.
    pub fn max_upload_len(&self) -> usize {
        usize::try_from(self.max_upload_bytes).unwrap_or(usize::MAX)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("provider_cloud_name", &self.provider_cloud_name)
            .field("provider_api_key", &self.provider_api_key.redact())
            .field("provider_api_secret", &self.provider_api_secret.as_str().redact())
            .field("provider_api_base", &self.provider_api_base)
            .field("delivery_base", &self.delivery_base)
            .field("provider_upload_folder", &self.provider_upload_folder)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .finish()
    }
}
