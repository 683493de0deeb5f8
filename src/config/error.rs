pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to build the 'Environment' from the provided string: {0}")]
    StringToEnvironmentFail(String),
    #[error("failed to parse 'DbConfig' from the provided string.")]
    StringToDbConfigFail,
    #[error("no database url configured: set DATABASE_URL or 'database_url' in the config files")]
    MissingDatabaseUrl,
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("invalid email sender name: {0:?}")]
    InvalidSenderName(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("figment error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}
