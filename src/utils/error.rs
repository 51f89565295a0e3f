use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid domain pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("DNS resolver error: {0}")]
    ResolverError(#[from] hickory_resolver::error::ResolveError),

    #[error("DNS resolution failed: {0}")]
    DnsError(String),

    #[error("Worker task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

pub type Result<T> = std::result::Result<T, CheckError>;
