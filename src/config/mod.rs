//! Builds an `AppConfig` from layered sources:
//! `config/base.toml` -> `config/{environment}.toml` -> `PORT` -> `APP_*` env vars -> `DATABASE_URL`.
//!
//! The database url is mandatory, a missing one is reported as `ConfigError::MissingDatabaseUrl`
//! so the binary can refuse to start.

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, EmailConfig, Environment, NetConfig, SslRequire};

use types::RawConfig;

/// Reads `APP_ENVIRONMENT` (defaults to `local`) and loads the configuration
/// from the `config` directory inside the current working directory.
pub fn get_config() -> ConfigResult<AppConfig> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;
    let config_dir = std::env::current_dir()?.join("config");

    info!(
        "{:<20} - Initializing the configuration for '{}'",
        "get_config",
        environment.as_ref()
    );

    load_config(&config_dir, environment)
}

pub fn load_config(config_dir: &Path, environment: Environment) -> ConfigResult<AppConfig> {
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let raw: RawConfig = Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        // Hosting platforms hand out the listening port as `PORT`
        .merge(
            Env::raw()
                .only(&["port"])
                .map(|_| "net_config.app_port".into()),
        )
        // e.g. APP_NET_CONFIG__APP_PORT=5000 sets `net_config.app_port`
        .merge(Env::prefixed("APP_").split("__"))
        .merge(Env::raw().only(&["database_url"]))
        .extract()?;

    raw.try_into()
}
