use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Terminal initialization failed: {0}")]
    Terminal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid server URL: {0}")]
    ServerUrl(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
