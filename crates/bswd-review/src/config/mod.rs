use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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

/// Top-level configuration for the review service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reasoning: ReasoningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reasoning: ReasoningConfig::from_env()?,
        })
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

/// Which backend writes the reasoning narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasoningBackend {
    /// Deterministic template only; no outbound calls.
    Template,
    OpenAi { api_key: String },
}

/// External reasoning settings. The template fallback is always available.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    pub backend: ReasoningBackend,
    pub model: String,
    pub timeout: Duration,
}

pub const DEFAULT_REASONING_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_REASONING_TIMEOUT_MS: u64 = 8_000;

impl ReasoningConfig {
    pub fn template_only() -> Self {
        Self {
            backend: ReasoningBackend::Template,
            model: DEFAULT_REASONING_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_REASONING_TIMEOUT_MS),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let provider = env::var("REASONING_PROVIDER").unwrap_or_else(|_| "template".to_string());
        let backend = match provider.trim().to_ascii_lowercase().as_str() {
            "" | "template" | "disabled" | "none" => ReasoningBackend::Template,
            "openai" => {
                let api_key = env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or(ConfigError::MissingCredential("OPENAI_API_KEY"))?;
                ReasoningBackend::OpenAi { api_key }
            }
            _ => return Err(ConfigError::UnknownReasoningProvider(provider)),
        };

        let model = env::var("REASONING_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REASONING_MODEL.to_string());

        let timeout_ms = match env::var("REASONING_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_REASONING_TIMEOUT_MS,
        };

        Ok(Self {
            backend,
            model,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    UnknownReasoningProvider(String),
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "REASONING_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::UnknownReasoningProvider(value) => write!(
                f,
                "REASONING_PROVIDER '{value}' is not supported (expected template or openai)"
            ),
            ConfigError::MissingCredential(var) => {
                write!(f, "{var} is required for the configured reasoning provider")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
