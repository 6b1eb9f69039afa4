//! Error types for profile settings.
//!
//! Every failure in the schema, codec and document layers is reported as a
//! [`ProfileError`]. The variants map one-to-one onto the error taxonomy
//! exposed through [`ErrorKind`], so callers can branch on the kind without
//! destructuring every field.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::DataType;

/// Boxed root cause carried by [`ProfileError::Deserialization`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while reading, validating or writing profile settings.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The referenced profile file does not exist.
    #[error("profile not found: {path}")]
    NotFound { path: PathBuf },

    /// Any other I/O failure while reading or writing a profile.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The buffer is not a profile (bad header or truncated image).
    #[error("invalid profile format: {header}")]
    InvalidFormat { header: String },

    /// The setting name is not part of the active schema.
    #[error("setting not supported: {name}")]
    NotSupported { name: String },

    /// The input shape cannot be encoded/decoded for the setting's data type.
    #[error("wrong type for setting '{name}' (expected: {expected}, received: {received})")]
    Type {
        name: String,
        expected: DataType,
        received: String,
    },

    /// The input has the right shape but is not a legal value.
    #[error("({name}) failed validation with ({value}) ({reason})")]
    Validation {
        name: String,
        value: String,
        reason: String,
    },

    /// A JSON document could not be applied to a profile.
    #[error("failed to deserialize values: {source}")]
    Deserialization {
        #[source]
        source: BoxedCause,
    },
}

/// Result type alias for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Coarse classification of a [`ProfileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Io,
    InvalidFormat,
    NotSupported,
    Type,
    Validation,
    Deserialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::Io => "i/o",
            Self::InvalidFormat => "invalid format",
            Self::NotSupported => "not supported",
            Self::Type => "type",
            Self::Validation => "validation",
            Self::Deserialization => "deserialization",
        };
        f.write_str(name)
    }
}

impl ProfileError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
            Self::Type { .. } => ErrorKind::Type,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Deserialization { .. } => ErrorKind::Deserialization,
        }
    }

    /// Create a NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an Io error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidFormat error carrying the decoded header text.
    pub fn invalid_format(header: impl Into<String>) -> Self {
        Self::InvalidFormat {
            header: header.into(),
        }
    }

    /// Create a NotSupported error.
    pub fn not_supported(name: impl Into<String>) -> Self {
        Self::NotSupported { name: name.into() }
    }

    /// Create a Type error.
    pub fn wrong_type(
        name: impl Into<String>,
        expected: DataType,
        received: impl Into<String>,
    ) -> Self {
        Self::Type {
            name: name.into(),
            expected,
            received: received.into(),
        }
    }

    /// Create a Validation error.
    pub fn validation(
        name: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap any root cause into a Deserialization error.
    pub fn deserialization(source: impl Into<BoxedCause>) -> Self {
        Self::Deserialization {
            source: source.into(),
        }
    }
}
