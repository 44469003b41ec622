use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Step not supported by {backend}: {step}")]
    UnsupportedStep { backend: &'static str, step: String },

    #[error("Backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
