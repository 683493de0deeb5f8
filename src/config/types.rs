//! The configuration structs used to build the AppConfig, and their impls.
use lazy_regex::regex_captures;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};
use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

/// The shape of the merged configuration sources before the database url gets checked and parsed.
#[derive(Deserialize, Debug)]
pub(super) struct RawConfig {
    pub net_config: NetConfig,
    pub email_config: EmailConfig,
    pub database_url: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
    pub email_config: EmailConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
    /// Origins allowed by CORS, `"*"` allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    pub require_ssl: SslRequire,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SslRequire {
    #[default]
    Prefer,
    Require,
    Disable,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailConfig {
    pub sender_addr: String,
    pub sender_name: String,
    pub url: String,
    pub auth_token: SecretString,
    pub timeout_millis: u64,
}
// ###################################
// ->   IMPLs
// ###################################
impl EmailConfig {
    pub fn valid_sender(&self) -> ConfigResult<ValidEmail> {
        let addr = ValidEmail::parse(&self.sender_addr)
            .map_err(|er| ConfigError::InvalidEmail(er.to_string()))?;
        Ok(addr)
    }
    /// The display name ends up in the `From` header, so it has to be a single non-empty line.
    pub fn valid_sender_name(&self) -> ConfigResult<&str> {
        let name = self.sender_name.trim();
        if name.is_empty() || name.chars().any(char::is_control) {
            return Err(ConfigError::InvalidSenderName(self.sender_name.clone()));
        }
        Ok(name)
    }
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl DbConfig {
    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        // Create new PgConnectOptions struct but don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Require => PgSslMode::Require,
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Prefer => PgSslMode::Prefer,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let database_url = raw.database_url.ok_or(ConfigError::MissingDatabaseUrl)?;
        let db_config = DbConfig::try_from(database_url.expose_secret())?;
        // An unusable sender address should stop the app before it binds.
        raw.email_config.valid_sender()?;
        raw.email_config.valid_sender_name()?;

        Ok(AppConfig {
            net_config: raw.net_config,
            db_config,
            email_config: raw.email_config,
        })
    }
}

impl TryFrom<&str> for DbConfig {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // postgres://{username}:{password}@{hostname}:{port}/{database}?{options}
        let (_whole, username, password, host, port, db_name, options) = regex_captures!(
            r#"^postgres(?:ql)?:\/\/([^:]+):([^@]+)@([^:\/]+):(\d+)\/([^\s\/?]+)(\?[^\s]*)?$"#,
            value
        )
        .ok_or(Self::Error::StringToDbConfigFail)?;

        let (username, db_name, host) =
            (username.to_string(), db_name.to_string(), host.to_string());
        let password = SecretString::from(password.to_string());
        let port = port
            .parse()
            .map_err(|_| Self::Error::StringToDbConfigFail)?;

        let mut require_ssl = SslRequire::default();
        if let Some(options) = options.strip_prefix('?') {
            for option in options.split(|c: char| c == '&' || c == ',') {
                if let Some((id, val)) = option.split_once('=') {
                    if id == "sslmode" {
                        match val {
                            "disable" => require_ssl = SslRequire::Disable,
                            "require" => require_ssl = SslRequire::Require,
                            _ => {}
                        }
                    }
                }
            }
        }

        Ok(DbConfig {
            username,
            password,
            port,
            host,
            db_name,
            require_ssl,
        })
    }
}

// ###################################
// ->   TESTS
// ###################################
