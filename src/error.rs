use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Filesystem failure while reading or writing local data
    Io(io::Error),
    /// Malformed JSON in the store, the config or a level catalog
    Json(serde_json::Error),
    /// A level id that the catalog does not know about
    UnknownLevel(String),
    /// Profile creation with a missing name or avatar
    InvalidProfile(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::UnknownLevel(id) => write!(f, "unknown level: {}", id),
            Error::InvalidProfile(why) => write!(f, "invalid profile: {}", why),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
