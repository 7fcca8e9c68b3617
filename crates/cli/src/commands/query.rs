//! query command - Run an S3 Select expression against an object
//!
//! Prints the selected records as a table or JSON array, or streams them
//! as JSON lines with `--stream`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use futures::StreamExt;
use sq_core::config::QueryDefaults;
use sq_core::{
    AliasManager, ConfigManager, Error, QueryInput, QueryResult, RecordStream, ScanRange,
    parse_object_path,
};
use sq_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Run an S3 Select query
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Object path (alias/bucket/key)
    #[arg(required_unless_present = "request")]
    pub path: Option<String>,

    /// SQL expression, forwarded to the server as-is
    #[arg(required_unless_present = "request")]
    pub expression: Option<String>,

    /// Object format: JSON, CSV or NDJSON
    #[arg(long)]
    pub document_type: Option<String>,

    /// Record delimiter (a single character)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// First byte of the object to scan
    #[arg(long)]
    pub scan_start: Option<String>,

    /// Last byte of the object to scan
    #[arg(long)]
    pub scan_end: Option<String>,

    /// Print records as they arrive instead of collecting them
    #[arg(long)]
    pub stream: bool,

    /// Read bucket, key, expression and options from a JSON request file
    #[arg(long, conflicts_with_all = ["path", "expression"], requires = "alias")]
    pub request: Option<PathBuf>,

    /// Alias to run a request file against
    #[arg(long)]
    pub alias: Option<String>,
}

/// Execute the query command
pub async fn execute(args: QueryArgs, formatter: &Formatter) -> ExitCode {
    let defaults = match ConfigManager::new().and_then(|cm| cm.load()) {
        Ok(config) => config.query,
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let (alias_name, input) = match build_input(&args, &defaults) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::UsageError;
        }
    };

    // Reject bad arguments before touching aliases or the network
    if let Err(e) = sq_core::validate(&input) {
        formatter.error(&e.to_string());
        return ExitCode::UsageError;
    }

    let alias = match AliasManager::new().and_then(|am| am.get(&alias_name)) {
        Ok(a) => a,
        Err(Error::AliasNotFound(_)) => {
            formatter.error(&format!("Alias '{alias_name}' not found"));
            return ExitCode::NotFound;
        }
        Err(e) => {
            formatter.error(&format!("Failed to load aliases: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let client = match S3Client::new(alias).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    match sq_core::query(&client, &input).await {
        Ok(QueryResult::Records(records)) => {
            formatter.records(&records);
            ExitCode::Success
        }
        Ok(QueryResult::Stream(stream)) => print_stream(stream, formatter).await,
        Err(e) => {
            formatter.error(&format!("Query failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

/// Print records until the stream ends, fails or Ctrl+C arrives
///
/// Returning drops the stream, which closes the response.
async fn print_stream(mut stream: RecordStream, formatter: &Formatter) -> ExitCode {
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(record)) => formatter.record_line(&record),
                Some(Err(e)) => {
                    formatter.error(&format!("Query failed: {e}"));
                    return ExitCode::from_error(&e);
                }
                None => {
                    if let Some(stats) = stream.stats() {
                        tracing::debug!(
                            scanned = stats.bytes_scanned,
                            returned = stats.bytes_returned,
                            "query complete"
                        );
                    }
                    return ExitCode::Success;
                }
            },
            _ = &mut interrupt => {
                tracing::debug!("interrupted, closing select stream");
                return ExitCode::Interrupted;
            }
        }
    }
}

/// Resolve the alias and raw query arguments from CLI flags
fn build_input(args: &QueryArgs, defaults: &QueryDefaults) -> anyhow::Result<(String, QueryInput)> {
    if let Some(request) = &args.request {
        let alias = args
            .alias
            .clone()
            .context("--alias is required with --request")?;
        let mut input = read_request(request)?;
        input.options.stream |= args.stream;
        return Ok((alias, input));
    }

    let path = args.path.as_deref().context("Missing object path")?;
    let expression = args.expression.as_deref().context("Missing expression")?;
    let target = parse_object_path(path)?;

    let mut input =
        QueryInput::new(target.bucket, target.key, expression).stream(args.stream || defaults.stream);

    if let Some(document_type) = args.document_type.as_ref().or(defaults.document_type.as_ref()) {
        input = input.document_type(document_type);
    }
    if let Some(delimiter) = args.delimiter.as_ref().or(defaults.delimiter.as_ref()) {
        input = input.delimiter(delimiter);
    }
    if args.scan_start.is_some() || args.scan_end.is_some() {
        input.options.scan_range = Some(ScanRange::new(
            args.scan_start.clone().unwrap_or_default(),
            args.scan_end.clone().unwrap_or_default(),
        ));
    }

    Ok((target.alias, input))
}

fn read_request(path: &Path) -> anyhow::Result<QueryInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid request file {}", path.display()))
}
