use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for taskbench_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotConnected => taskbench_core::Error::NotConnected,
            Error::Config(message) => taskbench_core::Error::Config(message),
            other => taskbench_core::Error::Backend(Box::new(other)),
        }
    }
}
