use secrecy::SecretString;
use serde::Deserialize;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_VAR: &str = "MAIL_DISPATCH_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Incomplete environment configuration: {0}")]
    Env(#[from] envy::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub gmail: ProviderConfig,
    pub outlook: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where the OpenAPI document is written on startup
    #[serde(default = "default_openapi_path")]
    pub openapi_path: PathBuf,
}

/// SMTP account of a single provider.
///
/// The username doubles as the sender identity of outgoing messages.
/// Host and port fall back to the provider's public submission endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openapi_path: default_openapi_path(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    8888
}

fn default_openapi_path() -> PathBuf {
    PathBuf::from("./docs/OAS.json")
}

// Flat view of the process environment, envy matches lowercased names
#[derive(Deserialize)]
struct EnvConfig {
    #[serde(rename = "host_envv", default = "default_host")]
    host: String,
    #[serde(rename = "port_envv", default = "default_port")]
    port: u16,
    #[serde(default = "default_openapi_path")]
    openapi_path: PathBuf,

    gmail_username: String,
    gmail_password: SecretString,
    gmail_smtp_host: Option<String>,
    gmail_smtp_port: Option<u16>,

    outlook_username: String,
    outlook_password: SecretString,
    outlook_smtp_host: Option<String>,
    outlook_smtp_port: Option<u16>,
}

impl From<EnvConfig> for Config {
    fn from(env: EnvConfig) -> Self {
        Self {
            server: ServerConfig {
                host: env.host,
                port: env.port,
                openapi_path: env.openapi_path,
            },
            gmail: ProviderConfig {
                username: env.gmail_username,
                password: env.gmail_password,
                smtp_host: env.gmail_smtp_host,
                smtp_port: env.gmail_smtp_port,
            },
            outlook: ProviderConfig {
                username: env.outlook_username,
                password: env.outlook_password,
                smtp_host: env.outlook_smtp_host,
                smtp_port: env.outlook_smtp_port,
            },
        }
    }
}

impl Config {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(Into::into)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Builds the config from `(name, value)` pairs such as `std::env::vars()`.
    /// Credentials have no defaults: a missing one is an error.
    pub fn from_env_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: EnvConfig = envy::from_iter(vars)?;
        Ok(env.into())
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Try the config file first
    if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
        if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from '{}'", config_path);
            return Config::from_yaml_file(&config_path);
        }
        tracing::warn!(
            "Config file '{}' not found, falling back to environment variables",
            config_path
        );
    }

    Config::from_env_vars(env::vars())
}
