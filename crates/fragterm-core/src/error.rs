use thiserror::Error;

#[derive(Error, Debug)]
pub enum FragError {
    #[error("Name already in use: {0}")]
    NamingConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatter error: {0}")]
    Format(String),

    #[error("Refused: {0}")]
    Refused(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FragError {
    pub fn conflict(name: impl Into<String>) -> Self {
        Self::NamingConflict(name.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn refused(why: impl Into<String>) -> Self {
        Self::Refused(why.into())
    }
}

pub type Result<T> = std::result::Result<T, FragError>;
