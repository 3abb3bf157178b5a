use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object at the top level of {}, but found {found}", .path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// True for the errors a load treats as fatal (the document itself is bad).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Parse { .. } | ConfigError::NotAnObject { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
