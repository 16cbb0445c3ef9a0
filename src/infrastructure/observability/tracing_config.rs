use crate::config::Settings;

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()),
            json_format: settings.observability.json_logs,
        }
    }
}
