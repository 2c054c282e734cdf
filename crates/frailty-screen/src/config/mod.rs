use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Open sessions allowed when `FRAILTY_MAX_SESSIONS` is unset.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;
/// Idle minutes before a session is discarded when `FRAILTY_SESSION_IDLE_MINUTES` is unset.
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 480;

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
    pub screening: ScreeningConfig,
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

        let history_cap = match env::var("FRAILTY_HISTORY_CAP") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                parse_positive(&raw)
                    .ok_or_else(|| ConfigError::InvalidHistoryCap { value: raw.clone() })?,
            ),
            _ => None,
        };

        let max_sessions = match env::var("FRAILTY_MAX_SESSIONS") {
            Ok(raw) if !raw.trim().is_empty() => parse_positive(&raw)
                .ok_or_else(|| ConfigError::InvalidMaxSessions { value: raw.clone() })?,
            _ => DEFAULT_MAX_SESSIONS,
        };

        let idle_minutes = match env::var("FRAILTY_SESSION_IDLE_MINUTES") {
            Ok(raw) if !raw.trim().is_empty() => parse_positive(&raw)
                .ok_or_else(|| ConfigError::InvalidSessionIdle { value: raw.clone() })?,
            _ => DEFAULT_SESSION_IDLE_MINUTES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningConfig {
                history_cap,
                max_sessions,
                session_idle_timeout: Duration::from_secs(idle_minutes.saturating_mul(60)),
            },
        })
    }
}

fn parse_positive<T>(raw: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value > T::default())
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

/// Session limits. A `None` history cap keeps every assessment for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub history_cap: Option<usize>,
    pub max_sessions: usize,
    pub session_idle_timeout: Duration,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            history_cap: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidHistoryCap { value: String },
    InvalidMaxSessions { value: String },
    InvalidSessionIdle { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHistoryCap { value } => write!(
                f,
                "FRAILTY_HISTORY_CAP must be a positive integer (found '{value}')"
            ),
            ConfigError::InvalidMaxSessions { value } => write!(
                f,
                "FRAILTY_MAX_SESSIONS must be a positive integer (found '{value}')"
            ),
            ConfigError::InvalidSessionIdle { value } => write!(
                f,
                "FRAILTY_SESSION_IDLE_MINUTES must be a positive integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidHistoryCap { .. }
            | ConfigError::InvalidMaxSessions { .. }
            | ConfigError::InvalidSessionIdle { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
