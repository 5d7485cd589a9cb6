use crate::rewards::selection::NonePolicy;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/rewards_data.json";
pub const DEFAULT_OTHER_CATEGORY: &str = "Other";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rewards: RewardsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_path = env::var("REWARDS_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));
        let none_policy = match env::var("REWARDS_NONE_POLICY") {
            Ok(value) => parse_none_policy(&value)?,
            Err(_) => NonePolicy::default(),
        };
        let other_category = env::var("REWARDS_OTHER_CATEGORY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OTHER_CATEGORY.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rewards: RewardsConfig {
                data_path,
                none_policy,
                other_category,
            },
        })
    }
}

fn parse_none_policy(value: &str) -> Result<NonePolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pinned" | "pinned_first" | "pinned-first" => Ok(NonePolicy::PinnedFirst),
        "removable" => Ok(NonePolicy::Removable),
        _ => Err(ConfigError::InvalidNonePolicy {
            value: value.to_string(),
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the benefit table lives and how the explorer treats selections and spending.
#[derive(Debug, Clone)]
pub struct RewardsConfig {
    pub data_path: PathBuf,
    pub none_policy: NonePolicy,
    /// Spending key that maps onto each card's `Default` rate.
    pub other_category: String,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            none_policy: NonePolicy::default(),
            other_category: DEFAULT_OTHER_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNonePolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNonePolicy { value } => write!(
                f,
                "REWARDS_NONE_POLICY must be 'pinned' or 'removable', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNonePolicy { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("REWARDS_DATA_PATH");
        env::remove_var("REWARDS_NONE_POLICY");
        env::remove_var("REWARDS_OTHER_CATEGORY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.rewards.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.rewards.none_policy, NonePolicy::PinnedFirst);
        assert_eq!(config.rewards.other_category, "Other");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_rewards_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REWARDS_DATA_PATH", "/tmp/cards.json");
        env::set_var("REWARDS_NONE_POLICY", "Removable");
        env::set_var("REWARDS_OTHER_CATEGORY", "Everything Else");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.rewards.data_path, PathBuf::from("/tmp/cards.json"));
        assert_eq!(config.rewards.none_policy, NonePolicy::Removable);
        assert_eq!(config.rewards.other_category, "Everything Else");
        reset_env();
    }

    #[test]
    fn rejects_unknown_none_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REWARDS_NONE_POLICY", "sometimes");
        let error = AppConfig::load().expect_err("policy rejected");
        assert!(matches!(error, ConfigError::InvalidNonePolicy { .. }));
        reset_env();
    }
}
