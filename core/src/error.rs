//! Error types for the todo resource.
//!
//! # Design
//! `ResourceError` splits into two families. `BadRequest`, `NotFound` and
//! `MethodNotAllowed` are ordinary answers and become bodiless responses with
//! the matching status. `Store` and `Encode` are internal failures: the
//! handler hands them back to the transport, which fails only the current
//! request. `DecodeError` never leaves the query decoder.

use std::error::Error;
use std::fmt;

/// Errors produced while resolving a request against the resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A required form field was missing.
    BadRequest { field: &'static str },

    /// The path did not name an existing todo.
    NotFound,

    /// The verb is not defined for the addressed target.
    MethodNotAllowed,

    /// The data-access layer failed.
    Store(StoreError),

    /// A result could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl ResourceError {
    pub fn status(&self) -> u16 {
        match self {
            ResourceError::BadRequest { .. } => 400,
            ResourceError::NotFound => 404,
            ResourceError::MethodNotAllowed => 405,
            ResourceError::Store(_) | ResourceError::Encode(_) => 500,
        }
    }

    /// Whether this error is a server-side failure rather than an answer.
    pub fn is_internal(&self) -> bool {
        matches!(self, ResourceError::Store(_) | ResourceError::Encode(_))
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::BadRequest { field } => write!(f, "missing required field `{field}`"),
            ResourceError::NotFound => write!(f, "resource not found"),
            ResourceError::MethodNotAllowed => write!(f, "method not allowed"),
            ResourceError::Store(err) => write!(f, "store failure: {err}"),
            ResourceError::Encode(err) => write!(f, "encoding failed: {err}"),
        }
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResourceError::Store(err) => Some(err),
            ResourceError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ResourceError {
    fn from(value: StoreError) -> Self {
        ResourceError::Store(value)
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(value: serde_json::Error) -> Self {
        ResourceError::Encode(value)
    }
}

/// Failure reported by a `TodoStore` implementation.
#[derive(Debug)]
pub enum StoreError {
    /// The backend reported an error (SQL, I/O, ...).
    Backend(Box<dyn Error + Send + Sync>),

    /// A lock guarding the backend was poisoned by a panicking holder.
    Poisoned,
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(err) => write!(f, "backend: {err}"),
            StoreError::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Backend(err) => Some(err.as_ref()),
            StoreError::Poisoned => None,
        }
    }
}

/// A query component that could not be percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `%` not followed by two hex digits.
    MalformedEscape { offset: usize },

    /// The decoded bytes are not UTF-8.
    InvalidUtf8,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedEscape { offset } => {
                write!(f, "malformed percent escape at byte {offset}")
            }
            DecodeError::InvalidUtf8 => write!(f, "decoded bytes are not valid UTF-8"),
        }
    }
}

impl Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_map_to_client_statuses() {
        assert_eq!(ResourceError::BadRequest { field: "title" }.status(), 400);
        assert_eq!(ResourceError::NotFound.status(), 404);
        assert_eq!(ResourceError::MethodNotAllowed.status(), 405);
        assert!(!ResourceError::NotFound.is_internal());
    }

    #[test]
    fn store_failures_are_internal() {
        let err = ResourceError::from(StoreError::backend("disk full"));
        assert_eq!(err.status(), 500);
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "store failure: backend: disk full");
    }
}
