use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Sample,
    Assemble,
    Train,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sample => "sampling",
            Stage::Assemble => "assembly",
            Stage::Train => "training",
            Stage::Evaluate => "evaluation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    ConfigFormat(String),

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{stage} failed for {context}: {message}")]
    Stage {
        stage: Stage,
        context: String,
        message: String,
    },

    #[error("artifact registry error: {0}")]
    Registry(String),
}

impl Error {
    pub fn stage(stage: Stage, context: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Stage {
            stage,
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::ConfigFormat(value.to_string())
    }
}
