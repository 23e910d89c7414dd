//! Veriflow configuration file handling
//!
//! Provides default configuration generation and loading for the Veriflow
//! service. Configuration files are TOML format and stored adjacent to the
//! request database.
//!
//! ## Secrets
//!
//! The prover application secret and the mail API token are NEVER stored
//! inline in the config. Each is loaded from a file path named here, or
//! from an environment variable (`VERIFLOW_PROVER_SECRET`,
//! `VERIFLOW_MAIL_TOKEN`), with the environment taking precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default bind address for the API server
const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default TTL for cached rehydrated prover sessions
const DEFAULT_SESSION_TTL: &str = "10m";

/// Veriflow service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeriflowConfig {
    pub server: ServerConfig,
    pub prover: ProverConfig,
    pub store: StoreConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Externally reachable base URL of this deployment. The prover
    /// callback URL and the links in notification mails derive from it.
    pub public_base_url: String,

    /// How long a rehydrated prover session is served from cache
    /// (humantime format, e.g. "10m", "1h")
    #[serde(default = "default_session_ttl")]
    pub session_ttl: String,
}

/// External proof-protocol configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Base URL of the prover service REST API
    pub api_url: String,

    /// Application id registered with the prover service
    pub app_id: String,

    /// Path to a file holding the application secret
    pub secret_file: Option<PathBuf>,
}

/// Request database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database holding verification requests
    pub db_path: PathBuf,
}

/// Mail API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mail API endpoint the notifier POSTs to
    pub api_url: String,

    /// From address on outgoing mail
    pub from: String,

    /// Path to a file holding the mail API token
    pub token_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_session_ttl() -> String {
    DEFAULT_SESSION_TTL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl VeriflowConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: VeriflowConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Parsed session cache TTL
    pub fn session_ttl(&self) -> Result<std::time::Duration, Box<dyn std::error::Error>> {
        Ok(humantime::parse_duration(&self.server.session_ttl)
            .map_err(|e| format!("Invalid session_ttl '{}': {}", self.server.session_ttl, e))?)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(data_dir: &Path) -> String {
        format!(
            r#"# Veriflow Service Configuration
#
# Secrets are NOT stored here. Put the prover application secret in
# prover_secret.txt and the mail API token in mail_token.txt (paths below),
# or export VERIFLOW_PROVER_SECRET / VERIFLOW_MAIL_TOKEN instead.

[server]
# Socket address the API server binds to
bind = "{DEFAULT_BIND}"

# Externally reachable base URL of this deployment.
# The prover callback URL and the links in notification mails derive from it.
public_base_url = "https://verify.example.com"

# How long a rehydrated prover session is served from cache
session_ttl = "{DEFAULT_SESSION_TTL}"

[prover]
# Base URL of the prover service REST API
api_url = "https://api.prover.example.com"

# Application id registered with the prover service
app_id = "YOUR-APP-ID"

# File holding the application secret (overridden by VERIFLOW_PROVER_SECRET)
secret_file = "{secret_file}"

[store]
# SQLite database holding verification requests
db_path = "{db_path}"

[mail]
# Mail API endpoint the notifier POSTs to
api_url = "https://api.mail.example.com/v1/send"

# From address on outgoing mail
from = "verify@example.com"

# File holding the mail API token (overridden by VERIFLOW_MAIL_TOKEN)
token_file = "{token_file}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#,
            secret_file = data_dir.join("prover_secret.txt").display(),
            db_path = data_dir.join("veriflow.db").display(),
            token_file = data_dir.join("mail_token.txt").display(),
        )
    }

    /// Write the commented default config, creating parent directories
    pub fn create_default(path: &Path, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        fs::write(path, Self::generate_default_toml(data_dir))
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;
        Ok(())
    }
}

/// Default data directory: `~/.local/share/veriflow`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("veriflow")
}

/// Default config path: `<data dir>/config.toml`
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Load a secret, environment variable first, then the configured file.
pub fn load_secret(
    env_var: &str,
    file: Option<&Path>,
) -> Result<Zeroizing<String>, Box<dyn std::error::Error>> {
    if let Ok(value) = std::env::var(env_var) {
        return Ok(Zeroizing::new(value.trim().to_string()));
    }
    let path = file.ok_or_else(|| {
        format!("No secret source: set {env_var} or configure the secret file path")
    })?;
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read secret file '{}': {}", path.display(), e))?;
    Ok(Zeroizing::new(contents.trim().to_string()))
}
