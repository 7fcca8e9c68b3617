//! Result assembly
//!
//! Both output modes sit on the same [`RecordStream`]; they differ only in
//! whether it is drained before returning.

use futures::TryStreamExt;

use crate::decode::{Record, RecordStream};
use crate::error::Result;

/// Outcome of a select query
#[derive(Debug)]
pub enum QueryResult {
    /// Every record, in emission order
    Records(Vec<Record>),

    /// Records as they arrive
    Stream(RecordStream),
}

impl QueryResult {
    /// Collected records, if this is a buffered result
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            QueryResult::Records(records) => Some(records),
            QueryResult::Stream(_) => None,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, QueryResult::Stream(_))
    }

    /// Drain into a list regardless of mode
    pub async fn collect(self) -> Result<Vec<Record>> {
        match self {
            QueryResult::Records(records) => Ok(records),
            QueryResult::Stream(stream) => stream.try_collect().await,
        }
    }
}

/// Hand back the stream as-is, or drain it into a list
///
/// A buffered drain that hits an error returns only that error.
pub async fn assemble(stream: RecordStream, stream_mode: bool) -> Result<QueryResult> {
    if stream_mode {
        return Ok(QueryResult::Stream(stream));
    }

    let records: Vec<Record> = stream.try_collect().await?;
    tracing::debug!(count = records.len(), "collected select records");
    Ok(QueryResult::Records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::traits::{EventStream, SelectEvent};
    use futures::{StreamExt, stream};
    use serde_json::json;

    fn stream_of(chunks: &[&str]) -> RecordStream {
        let mut events: Vec<Result<SelectEvent>> = chunks
            .iter()
            .map(|c| Ok(SelectEvent::Records(c.as_bytes().to_vec())))
            .collect();
        events.push(Ok(SelectEvent::End));
        let events: EventStream = Box::pin(stream::iter(events));
        RecordStream::new(events, "\n")
    }

    #[tokio::test]
    async fn test_buffered_preserves_order() {
        let result = assemble(stream_of(&["{\"n\":1}\n{\"n\":2}\n", "{\"n\":3}\n"]), false)
            .await
            .unwrap();
        let records = result.records().unwrap();
        let ns: Vec<_> = records.iter().map(|r| r["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_buffered_decode_error_has_no_partial_result() {
        let result = assemble(stream_of(&["{\"n\":1}\n{\"n\":\n"]), false).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_stream_mode_returns_handle() {
        let result = assemble(stream_of(&["{\"n\":1}\n"]), true).await.unwrap();
        assert!(result.is_stream());
        assert!(result.records().is_none());

        let QueryResult::Stream(mut stream) = result else {
            panic!("expected a stream");
        };
        assert_eq!(stream.next().await.unwrap().unwrap()["n"], json!(1));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_collect_either_mode() {
        let buffered = assemble(stream_of(&["{\"n\":1}\n"]), false).await.unwrap();
        let streamed = assemble(stream_of(&["{\"n\":1}\n"]), true).await.unwrap();
        assert_eq!(buffered.collect().await.unwrap(), streamed.collect().await.unwrap());
    }
}
