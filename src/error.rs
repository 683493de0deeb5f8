use crate::{config, database, email_client, web};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("web error: {0}")]
    Web(#[from] web::Error),
    #[error("email client error: {0}")]
    EmailClient(#[from] email_client::Error),
    #[error("database error: {0}")]
    Database(#[from] database::DbError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
