use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    pub scope: Scope,
    pub local_store: LocalStoreSettings,
    pub display: Display,
    pub observability: Observability,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    pub url: String,
    pub max_connections: u32,
}

/// Company/branch scope every job query is restricted to.
#[derive(Debug, Deserialize, Clone)]
pub struct Scope {
    pub id: uuid::Uuid,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalStoreSettings {
    pub dir: String,
    pub vehicle_cache_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Display {
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Observability {
    pub json_logs: bool,
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("GARAGE_DESK").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_toml_when_deserialize_should_fill_every_section() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.local_store.vehicle_cache_key, "technician_vehicles");
        assert_eq!(settings.display.currency_symbol, "Rs");
        assert!(!settings.observability.json_logs);
    }
}
