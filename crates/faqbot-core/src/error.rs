//! Error taxonomy for the FAQ bot core.
//!
//! A missing knowledge file is not an error (it loads as an empty base). Everything
//! else that goes wrong while reading resources is fatal at startup; persistence
//! failures are reported to whoever triggered the learning step.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChatbotError {
    /// A resource exists but could not be read (permissions, I/O error).
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The knowledge file is not valid UTF-8 JSON of the expected shape.
    #[error("knowledge file {} is malformed: {source}", path.display())]
    MalformedKnowledge {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A word list is not valid UTF-8 text.
    #[error("word list {} is malformed: {source}", path.display())]
    MalformedWordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The knowledge base could not be written; the pair being learned was discarded.
    #[error("cannot persist knowledge base to {target}: {source}")]
    Persistence {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl ChatbotError {
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Text shown to the user when this error ends a turn.
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence { .. } => {
                "Sorry, I could not save that answer, so I have not learned it. Please try again later.".to_string()
            }
            _ => "Sorry, something went wrong on my side.".to_string(),
        }
    }
}
