//! Application configuration loaded from the environment.

use anyhow::{Context, Result, bail};

use crate::backend::DEFAULT_ENDPOINT;

/// Environment variable holding the optional API token.
pub const TOKEN_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";

/// Web server bind settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token for the inference API. The models are public, so this
    /// is optional; authenticated calls get higher rate limits.
    pub api_token: Option<String>,
    /// Base URL of the inference API.
    pub endpoint: String,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from a `.env` file (if present) and the
    /// environment, falling back to defaults.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        if let Ok(token) = std::env::var(TOKEN_VAR)
            && !token.is_empty()
        {
            config.api_token = Some(token);
        }

        if let Ok(endpoint) = std::env::var("PHOTOTALE_ENDPOINT")
            && !endpoint.is_empty()
        {
            config.endpoint = endpoint;
        }

        if let Ok(host) = std::env::var("HOST")
            && !host.is_empty()
        {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("PORT")
            && !port.is_empty()
        {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded values.
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            bail!("Endpoint must be an http(s) URL: {}", self.endpoint);
        }

        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        Ok(())
    }
}
