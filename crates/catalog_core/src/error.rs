use std::fmt;

use thiserror::Error;

/// The page session could not be established or stopped responding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("page session closed")]
    Closed,
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Structural field of a tag element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Name,
    Id,
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagField::Name => write!(f, "name"),
            TagField::Id => write!(f, "id"),
        }
    }
}

/// A required field could not be read from the tag element at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tag element {index}: {field} missing or empty")]
pub struct ExtractionError {
    pub index: usize,
    pub field: TagField,
}

/// Why a record ended up without a count. Never escapes the harvest loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountUnavailable {
    TimedOut { last_seen: Option<String> },
    Unparseable(String),
    ActivationRejected(String),
}

impl fmt::Display for CountUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountUnavailable::TimedOut { last_seen: None } => {
                write!(f, "counter did not appear")
            }
            CountUnavailable::TimedOut {
                last_seen: Some(text),
            } => write!(f, "counter did not settle (last seen {text:?})"),
            CountUnavailable::Unparseable(text) => write!(f, "counter text {text:?} not numeric"),
            CountUnavailable::ActivationRejected(reason) => {
                write!(f, "activation rejected: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("harvest cancelled")]
    Cancelled,
}
