//! SelectStore trait definition
//!
//! This trait is the only contract between the query pipeline and the
//! backend that runs the select: a [`SelectRequest`] goes in, an ordered
//! stream of [`SelectEvent`]s comes out. It keeps the core independent of
//! any specific S3 SDK.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::SelectRequest;

/// Byte counters reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectStats {
    /// Bytes of the object that were scanned
    pub bytes_scanned: i64,

    /// Bytes processed after decompression
    pub bytes_processed: i64,

    /// Bytes of records returned
    pub bytes_returned: i64,
}

/// One frame of a select response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// A chunk of record data; may end mid-record
    Records(Vec<u8>),

    /// Final byte counters
    Stats(SelectStats),

    /// Interim byte counters
    Progress(SelectStats),

    /// Keep-alive
    Continuation,

    /// The response is complete
    End,
}

/// Ordered response events; dropping it releases the underlying response
pub type EventStream = BoxStream<'static, Result<SelectEvent>>;

/// Trait for backends that can run S3 Select requests
///
/// Implemented by the S3 adapter and mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectStore: Send + Sync {
    /// Issue the select request and return its response events
    async fn select_object_content(&self, request: &SelectRequest) -> Result<EventStream>;
}
