use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error(
        "insufficient data for '{language}': requested {requested} chars, \
         sources hold {available}"
    )]
    InsufficientData {
        language: String,
        requested: u64,
        available: u64,
    },

    #[error("invalid corpus configuration: {0}")]
    Config(String),
}
