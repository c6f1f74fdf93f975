//! Server configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default cap on `num_simulations × (days + 1)` per request.
pub const DEFAULT_MAX_PATH_CELLS: usize = 10_000_000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Invalid path cell quota: {0}. Must be at least 1")]
    InvalidQuota(usize),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Wildcard CORS origin is not allowed in production")]
    WildcardOriginInProduction,

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Environment (development, staging, production)
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: Environment,
    /// Largest `num_simulations × (days + 1)` accepted per request
    pub max_path_cells: usize,
    /// Allowed CORS origins; `*` allows any origin
    pub allowed_origins: Vec<String>,
    /// Whether simulations may use the rayon thread pool
    pub parallel: bool,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Environment::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            max_path_cells: DEFAULT_MAX_PATH_CELLS,
            allowed_origins: vec!["*".to_string()],
            parallel: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay every `RISK_*` variable that is set; unset ones leave fields alone
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("RISK_SERVER_HOST") {
            self.host = host;
        }

        if let Ok(port_str) = std::env::var("RISK_SERVER_PORT") {
            self.port = port_str.parse().map_err(|_| {
                ConfigError::EnvError(format!("RISK_SERVER_PORT is not a port: {}", port_str))
            })?;
        }

        if let Ok(log_level) = std::env::var("RISK_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&log_level)?;
        }

        if let Ok(env) = std::env::var("RISK_ENV") {
            self.environment = Environment::from_str(&env)?;
        }

        if let Ok(cells) = std::env::var("RISK_MAX_PATH_CELLS") {
            self.max_path_cells = cells.parse().map_err(|_| {
                ConfigError::EnvError(format!("RISK_MAX_PATH_CELLS is not a count: {}", cells))
            })?;
        }

        // Comma-separated
        if let Ok(origins) = std::env::var("RISK_ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(parallel) = std::env::var("RISK_PARALLEL") {
            self.parallel = parse_flag("RISK_PARALLEL", &parallel)?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.max_path_cells == 0 {
            return Err(ConfigError::InvalidQuota(self.max_path_cells));
        }

        for origin in &self.allowed_origins {
            if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://"))
            {
                return Err(ConfigError::InvalidOrigin(origin.clone()));
            }
        }

        if self.environment.is_production() && self.allows_any_origin() {
            return Err(ConfigError::WildcardOriginInProduction);
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether any CORS origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        Ok(())
    }
}

/// Parse a boolean switch from the environment
fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvError(format!("{} is not a boolean: {}", name, value))),
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(config_path) => ServerConfig::read_file(config_path)?,
        None => ServerConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.max_path_cells, DEFAULT_MAX_PATH_CELLS);
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert!(config.parallel);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str("dev").unwrap(),
            Environment::Development
        );
        assert_eq!(
            Environment::from_str("stage").unwrap(),
            Environment::Staging
        );
        assert_eq!(
            Environment::from_str("PRODUCTION").unwrap(),
            Environment::Production
        );

        assert!(Environment::from_str("invalid").is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort(0))));

        let mut config = ServerConfig::default();
        config.max_path_cells = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidQuota(0))));

        let mut config = ServerConfig::default();
        config.allowed_origins = vec!["localhost:3000".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOrigin(_))));

        config.allowed_origins = vec!["http://localhost:3000".to_string()];
        assert!(config.validate().is_ok());
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_production_rejects_wildcard_origin() {
        let mut config = ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WildcardOriginInProduction)
        ));

        config.allowed_origins = vec!["https://risk.example.com".to_string()];
        assert!(config.validate().is_ok());

        let staging = ServerConfig {
            environment: Environment::Staging,
            ..Default::default()
        };
        assert!(staging.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            host: Some("192.168.1.1".to_string()),
            port: Some(9000),
            log_level: Some("debug".to_string()),
            config_file: None,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.host, "192.168.1.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_invalid_log_level_is_an_error() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            log_level: Some("verbose".to_string()),
            ..Default::default()
        };

        let err = config.merge_with_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(ref s) if s == "verbose"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_parse_flag() {
        for value in ["true", "TRUE", "1", "yes", "on"] {
            assert!(parse_flag("RISK_PARALLEL", value).unwrap(), "{}", value);
        }
        for value in ["false", "0", "No", "off"] {
            assert!(!parse_flag("RISK_PARALLEL", value).unwrap(), "{}", value);
        }
        assert!(matches!(
            parse_flag("RISK_PARALLEL", "maybe"),
            Err(ConfigError::EnvError(_))
        ));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            host = "127.0.0.1"
            port = 3000
            log_level = "debug"
            environment = "production"
            max_path_cells = 500000
            allowed_origins = ["https://risk.example.com"]
            parallel = false
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.max_path_cells, 500_000);
        assert_eq!(config.allowed_origins, vec!["https://risk.example.com"]);
        assert!(!config.parallel);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: ServerConfig = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_path_cells, DEFAULT_MAX_PATH_CELLS);
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!("risk_server_{}.toml", std::process::id()));
        std::fs::write(&path, "port = 9100\nmax_path_cells = 42\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 9100);
        assert_eq!(config.max_path_cells, 42);
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServerConfig::from_file(&PathBuf::from("/nonexistent/risk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    // Tests below mutate process environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 7] = [
        "RISK_SERVER_HOST",
        "RISK_SERVER_PORT",
        "RISK_LOG_LEVEL",
        "RISK_ENV",
        "RISK_MAX_PATH_CELLS",
        "RISK_ALLOWED_ORIGINS",
        "RISK_PARALLEL",
    ];

    fn lock_clean_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        guard
    }

    fn write_config(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "risk_server_{}_{}.toml",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_build_config_with_defaults() {
        let _env = lock_clean_env();

        let config = build_config(&CliArgs::default()).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_path_cells, DEFAULT_MAX_PATH_CELLS);
        assert!(config.parallel);
    }

    #[test]
    fn test_env_overrides_file_and_unset_vars_keep_file_values() {
        let _env = lock_clean_env();
        let path = write_config(
            "env_over_file",
            r#"
                port = 9100
                max_path_cells = 500
                allowed_origins = ["https://file.example.com"]
                parallel = true
            "#,
        );

        std::env::set_var("RISK_MAX_PATH_CELLS", "42");
        std::env::set_var(
            "RISK_ALLOWED_ORIGINS",
            "https://a.example.com, ,https://b.example.com,",
        );
        std::env::set_var("RISK_PARALLEL", "false");

        let cli = CliArgs {
            config_file: Some(path.clone()),
            ..Default::default()
        };
        let result = build_config(&cli);
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        std::fs::remove_file(&path).ok();
        let config = result.unwrap();

        assert_eq!(config.max_path_cells, 42);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert!(!config.parallel);
        // Not set in the environment
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_cli_overrides_env() {
        let _env = lock_clean_env();
        std::env::set_var("RISK_SERVER_PORT", "7000");
        std::env::set_var("RISK_SERVER_HOST", "10.0.0.1");

        let cli = CliArgs {
            port: Some(7100),
            ..Default::default()
        };
        let result = build_config(&cli);
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        let config = result.unwrap();

        assert_eq!(config.port, 7100);
        assert_eq!(config.host, "10.0.0.1");
    }

    #[test]
    fn test_env_production_with_file_origins() {
        let _env = lock_clean_env();
        let path = write_config(
            "prod_origins",
            r#"allowed_origins = ["https://risk.example.com"]"#,
        );
        std::env::set_var("RISK_ENV", "production");

        let with_file = build_config(&CliArgs {
            config_file: Some(path.clone()),
            ..Default::default()
        });
        let without_file = build_config(&CliArgs::default());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        std::fs::remove_file(&path).ok();

        assert_eq!(with_file.unwrap().environment, Environment::Production);
        assert!(matches!(
            without_file,
            Err(ConfigError::WildcardOriginInProduction)
        ));
    }

    #[test]
    fn test_unparseable_env_values_are_errors() {
        let _env = lock_clean_env();

        let cases = [
            ("RISK_SERVER_PORT", "eighty"),
            ("RISK_SERVER_PORT", "70000"),
            ("RISK_MAX_PATH_CELLS", "-5"),
            ("RISK_PARALLEL", "maybe"),
        ];
        for (var, value) in cases {
            std::env::set_var(var, value);
            let result = build_config(&CliArgs::default());
            std::env::remove_var(var);

            assert!(
                matches!(result, Err(ConfigError::EnvError(ref msg)) if msg.contains(var)),
                "{}={} gave {:?}",
                var,
                value,
                result
            );
        }

        std::env::set_var("RISK_LOG_LEVEL", "loud");
        let result = ServerConfig::from_env();
        std::env::remove_var("RISK_LOG_LEVEL");
        assert!(matches!(result, Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_env_parallel_accepts_numeric_flags() {
        let _env = lock_clean_env();

        std::env::set_var("RISK_PARALLEL", "0");
        let off = ServerConfig::from_env();
        std::env::set_var("RISK_PARALLEL", "1");
        let on = ServerConfig::from_env();
        std::env::remove_var("RISK_PARALLEL");

        assert!(!off.unwrap().parallel);
        assert!(on.unwrap().parallel);
    }

    #[test]
    fn test_config_error_display() {
        assert!(ConfigError::InvalidPort(0)
            .to_string()
            .contains("Invalid port"));
        assert!(ConfigError::InvalidQuota(0)
            .to_string()
            .contains("path cell quota"));
        assert!(ConfigError::InvalidOrigin("x".to_string())
            .to_string()
            .contains("CORS origin"));
        assert!(ConfigError::WildcardOriginInProduction
            .to_string()
            .contains("production"));
    }
}
