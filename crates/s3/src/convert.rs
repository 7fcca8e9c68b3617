//! Conversions between sq-core types and aws-sdk-s3 types

use aws_sdk_s3::types::{
    CompressionType as SdkCompressionType, CsvInput as SdkCsvInput,
    FileHeaderInfo as SdkFileHeaderInfo, InputSerialization as SdkInputSerialization,
    JsonInput as SdkJsonInput, JsonOutput as SdkJsonOutput, JsonType as SdkJsonType,
    OutputSerialization as SdkOutputSerialization, ScanRange as SdkScanRange,
    SelectObjectContentEventStream,
};
use aws_smithy_types::Blob;

use sq_core::request::{
    CompressionType, CsvInput, FileHeaderInfo, InputSerialization, JsonType, OutputSerialization,
    SelectScanRange,
};
use sq_core::{Error, Result, SelectEvent, SelectStats};

pub(crate) fn input_serialization(input: &InputSerialization) -> SdkInputSerialization {
    let compression = match input.compression_type {
        CompressionType::None => SdkCompressionType::None,
        CompressionType::Gzip => SdkCompressionType::Gzip,
        CompressionType::Bzip2 => SdkCompressionType::Bzip2,
    };

    let json = input.json.as_ref().map(|json| {
        let json_type = match json.json_type {
            JsonType::Document => SdkJsonType::Document,
            JsonType::Lines => SdkJsonType::Lines,
        };
        SdkJsonInput::builder().r#type(json_type).build()
    });

    SdkInputSerialization::builder()
        .set_json(json)
        .set_csv(input.csv.as_ref().map(csv_input))
        .compression_type(compression)
        .build()
}

fn csv_input(csv: &CsvInput) -> SdkCsvInput {
    let header = match csv.file_header_info {
        FileHeaderInfo::Use => SdkFileHeaderInfo::Use,
        FileHeaderInfo::Ignore => SdkFileHeaderInfo::Ignore,
        FileHeaderInfo::None => SdkFileHeaderInfo::None,
    };
    SdkCsvInput::builder()
        .file_header_info(header)
        .record_delimiter(&csv.record_delimiter)
        .build()
}

pub(crate) fn output_serialization(output: &OutputSerialization) -> SdkOutputSerialization {
    SdkOutputSerialization::builder()
        .json(
            SdkJsonOutput::builder()
                .record_delimiter(&output.json.record_delimiter)
                .build(),
        )
        .build()
}

/// The SDK wants integer offsets; empty bounds are left unset
pub(crate) fn scan_range(range: &SelectScanRange) -> Result<SdkScanRange> {
    Ok(SdkScanRange::builder()
        .set_start(parse_bound("start", &range.start)?)
        .set_end(parse_bound("end", &range.end)?)
        .build())
}

fn parse_bound(name: &str, value: &str) -> Result<Option<i64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<i64>().map(Some).map_err(|_| {
        Error::InvalidArgument(format!(
            "Scan range {name} `{value}` is not a byte offset"
        ))
    })
}

fn blob_bytes(blob: Option<&Blob>) -> Vec<u8> {
    blob.map(|b| b.as_ref().to_vec()).unwrap_or_default()
}

pub(crate) fn select_event(event: SelectObjectContentEventStream) -> SelectEvent {
    match event {
        SelectObjectContentEventStream::Records(records) => {
            SelectEvent::Records(blob_bytes(records.payload()))
        }
        SelectObjectContentEventStream::Stats(stats) => {
            let details = stats.details();
            SelectEvent::Stats(SelectStats {
                bytes_scanned: details.and_then(|d| d.bytes_scanned()).unwrap_or(0),
                bytes_processed: details.and_then(|d| d.bytes_processed()).unwrap_or(0),
                bytes_returned: details.and_then(|d| d.bytes_returned()).unwrap_or(0),
            })
        }
        SelectObjectContentEventStream::Progress(progress) => {
            let details = progress.details();
            SelectEvent::Progress(SelectStats {
                bytes_scanned: details.and_then(|d| d.bytes_scanned()).unwrap_or(0),
                bytes_processed: details.and_then(|d| d.bytes_processed()).unwrap_or(0),
                bytes_returned: details.and_then(|d| d.bytes_returned()).unwrap_or(0),
            })
        }
        SelectObjectContentEventStream::Cont(_) => SelectEvent::Continuation,
        SelectObjectContentEventStream::End(_) => SelectEvent::End,
        other => {
            tracing::warn!("Ignoring unknown select event: {:?}", other);
            SelectEvent::Continuation
        }
    }
}

/// Map an S3 error code onto the sq-core error taxonomy
pub(crate) fn classify_error(code: Option<&str>, message: String, target: &str) -> Error {
    match code {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => Error::NotFound(target.to_string()),
        Some(
            "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken",
        ) => Error::Auth(message),
        Some(
            "InvalidExpressionType" | "InvalidScanRange" | "InvalidTextEncoding"
            | "ParseSelectFailure" | "MissingRequiredParameter",
        ) => Error::InvalidArgument(message),
        _ => Error::Network(message),
    }
}
