use thiserror::Error;

#[derive(Error, Debug)]
pub enum AidLocatorError {
    #[error("Provider error: {0}")]
    Provider(#[from] aidlocator_providers::ProviderError),
    #[error("Search error: {0}")]
    SearchError(#[from] crate::search::SearchError),
    #[error("Locate error: {0}")]
    LocateError(#[from] crate::locate::LocateError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AidLocatorError>;
