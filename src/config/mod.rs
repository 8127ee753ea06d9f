use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub documents: DocumentConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&env_or("APP_ENV", "development"));

        let host = env_or("APP_HOST", "127.0.0.1");
        let port = env_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env_or("APP_LOG_LEVEL", "info");
        let log_format = LogFormat::parse(&env_or("APP_LOG_FORMAT", "compact"))?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            documents: DocumentConfig::from_env()?,
            storage: StorageConfig {
                applications_path: env::var("APP_APPLICATIONS_PATH")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
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

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Global values merged into every generated document plus renderer locations.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub support_email: String,
    pub signature: String,
    /// Multiplier applied to each fund's net amount when totalling a portfolio.
    pub tax_rate: f64,
    pub template_root: String,
    pub templates: TemplatePaths,
    pub converter_binary: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            support_email: "support@example.com".to_string(),
            signature: "Client Services".to_string(),
            tax_rate: 1.0,
            template_root: "templates".to_string(),
            templates: TemplatePaths::default(),
            converter_binary: PathBuf::from("wkhtmltopdf"),
        }
    }
}

impl DocumentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let raw_rate = env::var("APP_TAX_RATE").ok();
        let tax_rate = match raw_rate {
            Some(raw) => parse_tax_rate(&raw)?,
            None => defaults.tax_rate,
        };

        let template_root = env::var("APP_TEMPLATE_ROOT").unwrap_or(defaults.template_root);
        if template_root.trim().is_empty() {
            return Err(ConfigError::MissingTemplateRoot);
        }

        Ok(Self {
            support_email: env::var("APP_SUPPORT_EMAIL").unwrap_or(defaults.support_email),
            signature: env::var("APP_SIGNATURE").unwrap_or(defaults.signature),
            tax_rate,
            template_root,
            templates: TemplatePaths {
                pending: env::var("APP_TEMPLATE_PENDING").unwrap_or(defaults.templates.pending),
                activated: env::var("APP_TEMPLATE_ACTIVATED")
                    .unwrap_or(defaults.templates.activated),
                in_review: env::var("APP_TEMPLATE_IN_REVIEW")
                    .unwrap_or(defaults.templates.in_review),
            },
            converter_binary: env::var("APP_PDF_CONVERTER")
                .map(PathBuf::from)
                .unwrap_or(defaults.converter_binary),
        })
    }
}

fn parse_tax_rate(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(ConfigError::InvalidTaxRate(raw.to_string())),
    }
}

/// Template locations relative to the document base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub pending: String,
    pub activated: String,
    pub in_review: String,
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            pending: "/pending_application.html".to_string(),
            activated: "/activated_application.html".to_string(),
            in_review: "/in_review_application.html".to_string(),
        }
    }
}

/// Where the service reads application records from.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub applications_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTaxRate(String),
    InvalidLogFormat(String),
    MissingTemplateRoot,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTaxRate(value) => write!(
                f,
                "APP_TAX_RATE must be a finite, non-negative number (got '{}')",
                value
            ),
            ConfigError::InvalidLogFormat(value) => write!(
                f,
                "APP_LOG_FORMAT must be 'compact' or 'json' (got '{}')",
                value
            ),
            ConfigError::MissingTemplateRoot => {
                write!(f, "APP_TEMPLATE_ROOT must not be blank")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTaxRate(_)
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::MissingTemplateRoot => None,
        }
    }
}
