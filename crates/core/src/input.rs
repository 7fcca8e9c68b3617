//! Untrusted query arguments
//!
//! A [`QueryInput`] is what a caller hands to the façade before validation.
//! Fields are dynamically typed so that request documents read from JSON can
//! carry wrong types and still be reported precisely by the validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Byte window of the object to scan
///
/// Both bounds are opaque strings and reach the [`SelectStore`] as-is. A
/// store may still reject bounds it cannot express; the S3 store needs
/// decimal byte offsets (or an empty bound for an open end) and fails with
/// [`Error::InvalidArgument`] before sending anything otherwise.
///
/// [`SelectStore`]: crate::traits::SelectStore
/// [`Error::InvalidArgument`]: crate::error::Error::InvalidArgument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRange {
    pub start: String,
    pub end: String,
}

impl ScanRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Raw query options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputOptions {
    /// Expected to be one of "JSON", "CSV" or "NDJSON"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<Value>,

    /// Expected to be a single-character string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_range: Option<ScanRange>,

    /// Return a live record stream instead of a collected list
    #[serde(default)]
    pub stream: bool,
}

/// Raw query arguments
///
/// ```
/// use sq_core::QueryInput;
///
/// let input = QueryInput::new("foobarbaz", "users.ndjson", "SELECT s.name FROM S3Object s")
///     .document_type("JSON")
///     .delimiter("\n");
/// assert!(sq_core::validate(&input).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Value>,

    #[serde(default)]
    pub options: InputOptions,
}

impl QueryInput {
    /// Create an input with the three required arguments set
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            bucket: Some(Value::String(bucket.into())),
            key: Some(Value::String(key.into())),
            expression: Some(Value::String(expression.into())),
            options: InputOptions::default(),
        }
    }

    pub fn document_type(mut self, document_type: impl Into<String>) -> Self {
        self.options.document_type = Some(Value::String(document_type.into()));
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.delimiter = Some(Value::String(delimiter.into()));
        self
    }

    pub fn scan_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.options.scan_range = Some(ScanRange::new(start, end));
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.options.stream = stream;
        self
    }
}
