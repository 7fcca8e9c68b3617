//! Response event decoding
//!
//! Select responses arrive as record chunks that do not line up with record
//! boundaries. [`RecordDecoder`] buffers bytes and reads one JSON value at a
//! time, skipping the record delimiter between values; [`RecordStream`]
//! drives it from an [`EventStream`].

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream, StreamExt};
use serde_json::{Deserializer, Map, Value};

use crate::error::{DecodeError, Error, Result};
use crate::traits::{EventStream, SelectEvent, SelectStats};

/// One decoded result row
pub type Record = Map<String, Value>;

type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Incremental parser for delimited JSON records
///
/// Records end where their JSON value ends, so the delimiter may also occur
/// inside a record (`,` between CSV-derived fields, `|` in a string value).
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    delimiter: Vec<u8>,
    buffer: Vec<u8>,
    after_value: bool,
}

impl RecordDecoder {
    pub fn new(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.as_bytes().to_vec(),
            buffer: Vec::new(),
            after_value: false,
        }
    }

    /// Append a chunk and move every complete record into `out`
    ///
    /// Records decoded before a failure are still pushed to `out`.
    pub fn push(&mut self, chunk: &[u8], out: &mut VecDeque<Record>) -> DecodeResult<()> {
        self.buffer.extend_from_slice(chunk);

        let mut start = 0;
        let mut result = Ok(());
        loop {
            start = self.skip_separators(start);
            let rest = &self.buffer[start..];
            if rest.is_empty() || self.is_partial_delimiter(rest) {
                break;
            }

            let mut values = Deserializer::from_slice(rest).into_iter::<Value>();
            match values.next() {
                None => break,
                Some(Ok(value)) => {
                    let end = values.byte_offset();
                    let record = into_record(value, &rest[..end]);
                    start += end;
                    self.after_value = true;
                    match record {
                        Ok(record) => out.push_back(record),
                        Err(e) => {
                            result = Err(e);
                            break;
                        }
                    }
                }
                // value continues in a later chunk
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(source)) => {
                    let len = find(&rest[1..], &self.delimiter).map_or(rest.len(), |i| i + 1);
                    result = Err(DecodeError::Malformed {
                        fragment: lossy(&rest[..len]),
                        source,
                    });
                    start += len;
                    break;
                }
            }
        }

        self.buffer.drain(..start);
        result
    }

    /// Decode whatever is left once the response has ended
    ///
    /// Anything still buffered at this point is an unterminated value.
    pub fn finish(&mut self) -> DecodeResult<Option<Record>> {
        let start = self.skip_separators(0);
        let rest = std::mem::take(&mut self.buffer).split_off(start);
        let trimmed = rest.trim_ascii();
        if trimmed.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<Value>(trimmed) {
            Ok(value) => into_record(value, trimmed).map(Some),
            Err(source) => Err(DecodeError::Malformed {
                fragment: lossy(trimmed),
                source,
            }),
        }
    }

    /// Number of bytes waiting for a complete record
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Advance past whitespace and delimiters between records
    ///
    /// A `{` delimiter is only skipped directly after a record, since it also
    /// opens the next one.
    fn skip_separators(&mut self, mut pos: usize) -> usize {
        let opens_value = self.delimiter.first() == Some(&b'{');
        while let Some(&byte) = self.buffer.get(pos) {
            if byte.is_ascii_whitespace() {
                pos += 1;
            } else if !self.delimiter.is_empty()
                && self.buffer[pos..].starts_with(&self.delimiter)
                && (self.after_value || !opens_value)
            {
                pos += self.delimiter.len();
                self.after_value = false;
            } else {
                break;
            }
        }
        pos
    }

    fn is_partial_delimiter(&self, rest: &[u8]) -> bool {
        rest.len() < self.delimiter.len() && self.delimiter.starts_with(rest)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn into_record(value: Value, raw: &[u8]) -> DecodeResult<Record> {
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(DecodeError::NotAnObject(lossy(raw.trim_ascii()))),
    }
}

/// Live sequence of records decoded from a select response
///
/// Yields records in emission order. An error is yielded once and ends the
/// stream. The event source is dropped as soon as the stream finishes or is
/// itself dropped, which releases the response body.
pub struct RecordStream {
    events: Option<EventStream>,
    decoder: RecordDecoder,
    pending: VecDeque<Record>,
    error: Option<Error>,
    stats: Option<SelectStats>,
}

impl RecordStream {
    pub fn new(events: EventStream, delimiter: &str) -> Self {
        Self {
            events: Some(events),
            decoder: RecordDecoder::new(delimiter),
            pending: VecDeque::new(),
            error: None,
            stats: None,
        }
    }

    /// Byte counters from the last stats or progress event seen so far
    pub fn stats(&self) -> Option<SelectStats> {
        self.stats
    }

    fn close(&mut self) {
        self.events = None;
    }

    fn fail(&mut self, error: Error) {
        self.close();
        self.error = Some(error);
    }
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("open", &self.events.is_some())
            .field("pending", &self.pending.len())
            .field("buffered", &self.decoder.buffered())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Stream for RecordStream {
    type Item = Result<Record>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(record) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }
            if let Some(error) = this.error.take() {
                return Poll::Ready(Some(Err(error)));
            }
            let Some(events) = this.events.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(events.poll_next_unpin(cx)) {
                Some(Ok(SelectEvent::Records(chunk))) => {
                    tracing::trace!(bytes = chunk.len(), "records event");
                    if let Err(e) = this.decoder.push(&chunk, &mut this.pending) {
                        this.fail(e.into());
                    }
                }
                Some(Ok(SelectEvent::Stats(stats))) => {
                    tracing::debug!(
                        scanned = stats.bytes_scanned,
                        processed = stats.bytes_processed,
                        returned = stats.bytes_returned,
                        "select stats"
                    );
                    this.stats = Some(stats);
                }
                Some(Ok(SelectEvent::Progress(stats))) => {
                    tracing::trace!(scanned = stats.bytes_scanned, "select progress");
                    this.stats = Some(stats);
                }
                Some(Ok(SelectEvent::Continuation)) => {}
                Some(Ok(SelectEvent::End)) | None => {
                    tracing::debug!("select response ended");
                    this.close();
                    match this.decoder.finish() {
                        Ok(Some(record)) => this.pending.push_back(record),
                        Ok(None) => {}
                        Err(e) => this.error = Some(e.into()),
                    }
                }
                Some(Err(e)) => this.fail(e),
            }
        }
    }
}

impl FusedStream for RecordStream {
    fn is_terminated(&self) -> bool {
        self.events.is_none() && self.pending.is_empty() && self.error.is_none()
    }
}
