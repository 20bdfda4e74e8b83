use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the embedding host.
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

/// Top-level configuration for the lead engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub routing: RoutingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let auto_assign = match env::var("LEAD_AUTO_ASSIGN") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidAutoAssign { value })?,
            Err(_) => true,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            routing: RoutingConfig { auto_assign },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Switches for the routing engine in the embedding host.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// When false, inbound leads are left unassigned even if a rule matches.
    pub auto_assign: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAutoAssign { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAutoAssign { value } => {
                write!(f, "LEAD_AUTO_ASSIGN must be a boolean, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
