//! Error types returned by every public operation of this crate

use thiserror::Error;

use crate::event::EventId;

/// The three kinds of failures a caller has to tell apart
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was out of range, or an action is not part of the vocabulary
    Validation,
    /// No event matches the requested id
    NotFound,
    /// Reading or writing the backing file failed
    Persistence,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No event with id {0}")]
    NotFound(EventId),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Persistence(_) | Error::Io(_) | Error::Csv(_) => ErrorKind::Persistence,
        }
    }

    pub fn is_validation(&self) -> bool  { self.kind() == ErrorKind::Validation  }
    pub fn is_not_found(&self) -> bool   { self.kind() == ErrorKind::NotFound    }
    pub fn is_persistence(&self) -> bool { self.kind() == ErrorKind::Persistence }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
