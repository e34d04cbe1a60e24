use crate::error::{Result, StudioError};
use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_MAX_SESSIONS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub max_sessions: usize,
    pub log_format: LogFormat,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            log_format: LogFormat::Pretty,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `API_BASE_URL`, `HOST`, `PORT`, `MAX_SESSIONS` and `LOG_FORMAT`.
    ///
    /// Unset variables keep their defaults; malformed numbers are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base) = env::var("API_BASE_URL") {
            config = config.with_api_base_url(base);
        }
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| StudioError::Config(format!("PORT is not a valid port: {}", port)))?;
        }
        if let Ok(max) = env::var("MAX_SESSIONS") {
            config.max_sessions = max.parse().map_err(|_| {
                StudioError::Config(format!("MAX_SESSIONS is not a number: {}", max))
            })?;
        }
        config.log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sessions == 0 {
            return Err(StudioError::Config("MAX_SESSIONS must be at least 1".into()));
        }
        let base = &self.api_base_url;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(StudioError::Config(format!(
                "API base URL must be http(s): {}",
                base
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
