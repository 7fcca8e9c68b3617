//! Query façade
//!
//! `validate → build → select → decode → assemble`. Validation runs to
//! completion before the store is touched.

use crate::decode::RecordStream;
use crate::error::Result;
use crate::input::QueryInput;
use crate::request::SelectRequest;
use crate::result::{QueryResult, assemble};
use crate::traits::SelectStore;
use crate::validate::validate;

/// Run a select query against `store`
///
/// Returns collected records, or a live stream when `options.stream` is set.
pub async fn query(store: &dyn SelectStore, input: &QueryInput) -> Result<QueryResult> {
    let request = validate(input)?;
    let payload = SelectRequest::build(&request);

    tracing::debug!(
        bucket = %payload.bucket,
        key = %payload.key,
        document_type = %request.options.document_type,
        stream = request.options.stream,
        "issuing select request"
    );

    let events = store.select_object_content(&payload).await?;
    let records = RecordStream::new(events, payload.record_delimiter());
    assemble(records, request.options.stream).await
}
