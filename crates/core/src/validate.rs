//! Query argument validation
//!
//! [`validate`] turns an untrusted [`QueryInput`] into a typed
//! [`QueryRequest`]. Rules are checked in a fixed order and the first
//! violation wins, so error precedence is stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::input::{QueryInput, ScanRange};

/// Record delimiter used when no options ask for one
pub const DEFAULT_DELIMITER: char = '\n';

/// Format of the object being queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    #[default]
    Json,
    Csv,
    Ndjson,
}

impl DocumentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentType::Json => "JSON",
            DocumentType::Csv => "CSV",
            DocumentType::Ndjson => "NDJSON",
        }
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JSON" => Ok(DocumentType::Json),
            "CSV" => Ok(DocumentType::Csv),
            "NDJSON" => Ok(DocumentType::Ndjson),
            other => Err(ValidationError::UnknownDocumentType(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated query options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub document_type: DocumentType,
    pub delimiter: char,
    pub scan_range: Option<ScanRange>,
    pub stream: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            document_type: DocumentType::default(),
            delimiter: DEFAULT_DELIMITER,
            scan_range: None,
            stream: false,
        }
    }
}

/// Validated query arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub bucket: String,
    pub key: String,
    pub expression: String,
    pub options: QueryOptions,
}

/// Validate raw query arguments
///
/// Order: bucket, key, expression, delimiter type, document type,
/// delimiter length.
pub fn validate(input: &QueryInput) -> Result<QueryRequest, ValidationError> {
    let bucket = require_string("Bucket", input.bucket.as_ref())?;
    let key = require_string("Key", input.key.as_ref())?;
    let expression = require_string("Expression", input.expression.as_ref())?;

    let options = &input.options;
    let delimiter = if options.document_type.is_some() || options.delimiter.is_some() {
        Some(require_string("Delimiter", options.delimiter.as_ref())?)
    } else {
        None
    };

    let document_type = match &options.document_type {
        None => DocumentType::default(),
        Some(Value::String(s)) => s.parse()?,
        Some(other) => return Err(ValidationError::UnknownDocumentType(other.to_string())),
    };

    let delimiter = match delimiter {
        None => DEFAULT_DELIMITER,
        Some(d) => single_char(&d)?,
    };

    Ok(QueryRequest {
        bucket,
        key,
        expression,
        options: QueryOptions {
            document_type,
            delimiter,
            scan_range: options.scan_range.clone(),
            stream: options.stream,
        },
    })
}

fn require_string(field: &'static str, value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::NotAString {
            field,
            value: other.to_string(),
        }),
        None => Err(ValidationError::NotAString {
            field,
            value: "undefined".to_string(),
        }),
    }
}

fn single_char(delimiter: &str) -> Result<char, ValidationError> {
    let mut chars = delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ValidationError::DelimiterLength(delimiter.chars().count())),
    }
}
