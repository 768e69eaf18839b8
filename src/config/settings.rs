use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::handler::DeclaredParameter;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Handlers registered at startup
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderingConfig {
    /// Fail rendering when a placeholder has no matching parameter
    #[serde(default)]
    pub strict_placeholders: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryConfig {
    /// Maximum messages held by the in-memory queue (unbounded when unset)
    #[serde(default)]
    pub queue_capacity: Option<usize>,
}

/// A handler declared in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    /// Handler name; defaults to `<declaring_type>.<method>`
    #[serde(default)]
    pub name: Option<String>,
    pub declaring_type: String,
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<DeclaredParameter>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("rendering.strict_placeholders", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // MAILGEN_SERVER__PORT, MAILGEN_RENDERING__STRICT_PLACEHOLDERS, etc.
            .add_source(
                Environment::with_prefix("MAILGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::ParameterType;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8082);
        assert!(!settings.rendering.strict_placeholders);
        assert!(settings.delivery.queue_capacity.is_none());
        assert_eq!(settings.server_addr(), "0.0.0.0:8082");
    }

    #[test]
    fn test_handlers_from_toml() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [rendering]
                strict_placeholders = true

                [[handlers]]
                name = "Welcome"
                declaring_type = "AccountMailer"
                method = "welcome"
                parameters = [{ name = "name", type = "string" }]
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.rendering.strict_placeholders);
        assert_eq!(settings.handlers.len(), 1);
        assert_eq!(settings.handlers[0].name.as_deref(), Some("Welcome"));
        assert_eq!(settings.handlers[0].parameters[0].ty, ParameterType::String);
    }
}
