use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "WIKIWRAPPER_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub games: GamesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// Upstream wiki configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WikiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries on 429/5xx and connection failures. Zero disables retrying.
    #[serde(default)]
    pub max_retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// CORS configuration: one entry per allowed origin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub origins: Vec<OriginConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    pub origin: String,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

impl CorsConfig {
    pub fn allowed_origins(&self) -> Vec<String> {
        self.origins.iter().map(|o| o.origin.clone()).collect()
    }

    /// Union of the methods of every origin, first occurrence order
    pub fn allowed_methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = Vec::new();
        for method in self.origins.iter().flat_map(|o| o.methods.iter()) {
            let method = method.to_uppercase();
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        methods
    }
}

/// Game registry source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamesConfig {
    /// YAML games file replacing the built-in table
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_url() -> String {
    "https://yume.wiki/api.php".to_string()
}

fn default_user_agent() -> String {
    "yumeWikiAPIBot".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in WIKIWRAPPER_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (defaults are used when absent)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let path = PathBuf::from("config.toml");
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::warn!("No config.toml found, using built-in defaults");
                    Config::default()
                }
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Read and parse one TOML file without validating it
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }

        let api_url = url::Url::parse(&self.wiki.api_url)
            .with_context(|| format!("wiki.api_url is not a valid URL: {}", self.wiki.api_url))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            anyhow::bail!("wiki.api_url must use http or https, got {}", api_url.scheme());
        }

        if self.wiki.timeout_secs == 0 {
            anyhow::bail!("wiki.timeout_secs must be greater than 0");
        }

        for method in self.cors.allowed_methods() {
            if axum::http::Method::from_bytes(method.as_bytes()).is_err() {
                anyhow::bail!("cors method is not a valid HTTP method: {}", method);
            }
        }

        if let Some(file) = &self.games.file {
            if !file.is_file() {
                anyhow::bail!("games.file does not exist: {}", file.display());
            }
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
