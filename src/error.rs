use std::path::PathBuf;
use thiserror::Error;

/// Faults raised while loading chain definitions or writing reports.
///
/// Dispatch never fails: a request nobody accepts comes back as
/// [`Outcome::Unhandled`](crate::handler::Outcome::Unhandled).
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Failed to read chain definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chain definition: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Chain definition declares no handlers")]
    EmptyChain,

    #[error("Handler name '{0}' is used more than once")]
    DuplicateHandler(String),

    #[error("Handler #{position} has a blank name")]
    BlankName { position: usize },

    #[error("Handler '{handler}' has a blank {rule} label")]
    BlankLabel { handler: String, rule: &'static str },

    #[error("Handler '{handler}' has an invalid pattern: {source}")]
    InvalidPattern {
        handler: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

impl PatternError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn blank_label(handler: impl Into<String>, rule: &'static str) -> Self {
        Self::BlankLabel {
            handler: handler.into(),
            rule,
        }
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
