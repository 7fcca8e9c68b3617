//! Select request payload
//!
//! [`SelectRequest`] is the provider-shaped description of one
//! `SelectObjectContent` call. It serializes to the same PascalCase layout
//! the S3 API documents, which keeps it easy to inspect and log.

use serde::{Deserialize, Serialize};

use crate::input::ScanRange;
use crate::validate::{DocumentType, QueryRequest};

/// The only expression language S3 Select accepts
pub const EXPRESSION_TYPE_SQL: &str = "SQL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionType {
    None,
    Gzip,
    Bzip2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JsonType {
    Document,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonInput {
    #[serde(rename = "Type")]
    pub json_type: JsonType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileHeaderInfo {
    Use,
    Ignore,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsvInput {
    pub file_header_info: FileHeaderInfo,
    pub record_delimiter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputSerialization {
    #[serde(rename = "JSON", skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonInput>,

    #[serde(rename = "CSV", skip_serializing_if = "Option::is_none")]
    pub csv: Option<CsvInput>,

    pub compression_type: CompressionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonOutput {
    pub record_delimiter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSerialization {
    #[serde(rename = "JSON")]
    pub json: JsonOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectScanRange {
    pub start: String,
    pub end: String,
}

impl From<&ScanRange> for SelectScanRange {
    fn from(range: &ScanRange) -> Self {
        Self {
            start: range.start.clone(),
            end: range.end.clone(),
        }
    }
}

/// Payload handed to the remote select call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectRequest {
    pub bucket: String,
    pub key: String,
    pub expression: String,
    pub expression_type: String,
    pub input_serialization: InputSerialization,
    pub output_serialization: OutputSerialization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_range: Option<SelectScanRange>,
}

impl SelectRequest {
    /// Build the payload for a validated query
    pub fn build(query: &QueryRequest) -> Self {
        let options = &query.options;
        let delimiter = options.delimiter.to_string();

        let input_serialization = match options.document_type {
            DocumentType::Json | DocumentType::Ndjson => InputSerialization {
                json: Some(JsonInput {
                    json_type: JsonType::Lines,
                }),
                csv: None,
                compression_type: CompressionType::None,
            },
            DocumentType::Csv => InputSerialization {
                json: None,
                csv: Some(CsvInput {
                    file_header_info: FileHeaderInfo::Use,
                    record_delimiter: delimiter.clone(),
                }),
                compression_type: CompressionType::None,
            },
        };

        Self {
            bucket: query.bucket.clone(),
            key: query.key.clone(),
            expression: query.expression.clone(),
            expression_type: EXPRESSION_TYPE_SQL.to_string(),
            input_serialization,
            output_serialization: OutputSerialization {
                json: JsonOutput {
                    record_delimiter: delimiter,
                },
            },
            scan_range: options.scan_range.as_ref().map(SelectScanRange::from),
        }
    }

    /// The delimiter records are separated by in the response
    pub fn record_delimiter(&self) -> &str {
        &self.output_serialization.json.record_delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::QueryInput;
    use crate::validate::validate;
    use serde_json::json;

    fn build(input: QueryInput) -> SelectRequest {
        SelectRequest::build(&validate(&input).unwrap())
    }

    #[test]
    fn test_scan_range_payload() {
        let request = build(
            QueryInput::new("foobarbaz", "users.ndjson", "SELECT s.name FROM S3Object s")
                .delimiter("\n")
                .scan_range("0", "50"),
        );

        insta::assert_json_snapshot!(request, @r#"
        {
          "Bucket": "foobarbaz",
          "Key": "users.ndjson",
          "Expression": "SELECT s.name FROM S3Object s",
          "ExpressionType": "SQL",
          "InputSerialization": {
            "JSON": {
              "Type": "LINES"
            },
            "CompressionType": "NONE"
          },
          "OutputSerialization": {
            "JSON": {
              "RecordDelimiter": "\n"
            }
          },
          "ScanRange": {
            "Start": "0",
            "End": "50"
          }
        }
        "#);
    }

    #[test]
    fn test_no_scan_range_omitted() {
        let request = build(QueryInput::new("b", "k", "SELECT * FROM S3Object"));
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("ScanRange").is_none());
        assert_eq!(value["OutputSerialization"], json!({"JSON": {"RecordDelimiter": "\n"}}));
    }

    #[test]
    fn test_ndjson_uses_lines() {
        let request = build(
            QueryInput::new("b", "k", "SELECT * FROM S3Object")
                .document_type("NDJSON")
                .delimiter("\n"),
        );
        assert_eq!(
            request.input_serialization.json,
            Some(JsonInput {
                json_type: JsonType::Lines
            })
        );
        assert!(request.input_serialization.csv.is_none());
    }

    #[test]
    fn test_csv_serialization() {
        let request = build(
            QueryInput::new("b", "data.csv", "SELECT * FROM S3Object")
                .document_type("CSV")
                .delimiter("\r"),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["InputSerialization"],
            json!({
                "CSV": {"FileHeaderInfo": "USE", "RecordDelimiter": "\r"},
                "CompressionType": "NONE"
            })
        );
        assert_eq!(request.record_delimiter(), "\r");
    }

    #[test]
    fn test_expression_forwarded_verbatim() {
        let expression = "select  *  from s3object WHERE x = 'a;b'";
        let request = build(QueryInput::new("b", "k", expression));
        assert_eq!(request.expression, expression);
        assert_eq!(request.expression_type, "SQL");
    }
}
