use crate::core::status::{DEFAULT_ANTICIPATION_MINUTES, DEFAULT_SOON_WINDOW_MINUTES};
use crate::core::ConfigProvider;
use crate::utils::error::{AzbaError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://www.sia.aviation-civile.gouv.fr/schedules";
pub const DEFAULT_USER_AGENT: &str = "AZBA-Scraper-Rust";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Service settings. Every section and field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub server: ServerConfig,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub anticipation_minutes: i64,
    pub soon_window_minutes: i64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            anticipation_minutes: DEFAULT_ANTICIPATION_MINUTES,
            soon_window_minutes: DEFAULT_SOON_WINDOW_MINUTES,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AzbaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AzbaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.bind", &self.server.bind)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn user_agent(&self) -> &str {
        &self.source.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn anticipation(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.evaluation.anticipation_minutes)
    }

    fn soon_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.evaluation.soon_window_minutes)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_non_empty_string("source.user_agent", &self.source.user_agent)?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;
        self.bind_addr()?;
        validation::validate_range(
            "evaluation.anticipation_minutes",
            self.evaluation.anticipation_minutes,
            0,
            60,
        )?;
        validation::validate_range(
            "evaluation.soon_window_minutes",
            self.evaluation.soon_window_minutes,
            1,
            7 * 24 * 60,
        )?;
        Ok(())
    }
}
