//! Error types for sq-core
//!
//! Validation and decoding have their own error enums so callers can match on
//! the exact rule that failed. Everything converts into the crate-wide
//! [`Error`], which also maps onto CLI exit codes.

use thiserror::Error;

/// Result type alias for sq-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// A rejected query argument.
///
/// Messages name the field and the received value; they are part of the
/// public contract and must stay stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field that must be a string was missing or had another type
    #[error("{field} `{value}` should be a string")]
    NotAString { field: &'static str, value: String },

    /// `documentType` is not one of JSON, CSV or NDJSON
    #[error("Unknown documentType `{0}`")]
    UnknownDocumentType(String),

    /// The delimiter is not exactly one character
    #[error("Delimiter must have length `1`, found {0}")]
    DelimiterLength(usize),
}

/// A response fragment that could not be turned into a record
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The fragment is not valid JSON
    #[error("Failed to decode record `{fragment}`: {source}")]
    Malformed {
        fragment: String,
        #[source]
        source: serde_json::Error,
    },

    /// The fragment is valid JSON but not an object
    #[error("Record `{0}` is not a JSON object")]
    NotAnObject(String),
}

impl DecodeError {
    /// The raw fragment that failed to decode
    pub fn fragment(&self) -> &str {
        match self {
            DecodeError::Malformed { fragment, .. } => fragment,
            DecodeError::NotAnObject(fragment) => fragment,
        }
    }
}

/// Error types for sq-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Query arguments were rejected before any request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A response record could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// An argument the backend cannot represent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Alias already exists
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket or object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote select call or its event stream failed
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::InvalidPath(_)
            | Error::InvalidArgument(_)
            | Error::Config(_) => 2, // UsageError
            Error::Network(_) => 3,                            // NetworkError
            Error::Auth(_) => 4,                               // AuthError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            Error::AliasExists(_) => 6,                        // Conflict
            _ => 1,                                            // GeneralError
        }
    }
}
