use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Not connected")]
    NotConnected,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for taskbench_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotConnected => taskbench_core::Error::NotConnected,
            other => taskbench_core::Error::Backend(Box::new(other)),
        }
    }
}
