use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("malformed csv: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
