use std::fmt;
use std::path::PathBuf;

use crate::types::Collection;

#[derive(Debug)]
pub enum Error {
    ConfigParse(String),
    IoError(std::io::Error),
    InvalidData(String),
    /// The content collection could not be enumerated at all
    CollectionUnavailable {
        collection: Collection,
        reason: String,
    },
    /// An entry exists but its frontmatter is missing or malformed
    Frontmatter { path: PathBuf, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigParse(msg) => write!(f, "Configuration parse error: {}", msg),
            Error::IoError(err) => write!(f, "IO error: {}", err),
            Error::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Error::CollectionUnavailable { collection, reason } => {
                write!(f, "Collection '{}' unavailable: {}", collection, reason)
            }
            Error::Frontmatter { path, message } => {
                write!(f, "Frontmatter error in {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
