//! Process configuration from the environment

use thiserror::Error;

pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;
pub const DEFAULT_LOG_FILTER: &str = "hokm_scorer=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidCapacity { name: &'static str, value: String },
    #[error("{name} must be \"text\" or \"json\", got {value:?}")]
    InvalidLogFormat { name: &'static str, value: String },
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Pending inputs buffered per conversation before senders wait
    pub mailbox_capacity: usize,
    pub log_format: LogFormat,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            log_format: LogFormat::Text,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("HOKM_MAILBOX_CAPACITY") {
            config.mailbox_capacity = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidCapacity {
                    name: "HOKM_MAILBOX_CAPACITY",
                    value,
                })?;
        }

        if let Some(value) = lookup("HOKM_LOG_FORMAT") {
            config.log_format = match value.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidLogFormat {
                        name: "HOKM_LOG_FORMAT",
                        value,
                    })
                }
            };
        }

        if let Some(filter) = lookup("HOKM_LOG_FILTER").or_else(|| lookup("RUST_LOG")) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
