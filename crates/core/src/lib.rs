//! sq-core: Core library for the sq S3 Select client
//!
//! This crate provides the query pipeline and its supporting pieces:
//! - Argument validation and typed query options
//! - Select request payload construction
//! - Response event decoding into JSON records
//! - Buffered or streaming result assembly
//! - Configuration and alias management
//!
//! The backend that actually runs the select is reached through the
//! [`SelectStore`] trait, so this crate does not depend on any S3 SDK.

pub mod alias;
pub mod config;
pub mod decode;
pub mod error;
pub mod input;
pub mod path;
pub mod query;
pub mod request;
pub mod result;
pub mod traits;
pub mod validate;

pub use alias::{Alias, AliasManager, BucketLookup};
pub use config::{Config, ConfigManager, QueryDefaults};
pub use decode::{Record, RecordDecoder, RecordStream};
pub use error::{DecodeError, Error, Result, ValidationError};
pub use input::{InputOptions, QueryInput, ScanRange};
pub use path::{ObjectPath, parse_object_path};
pub use query::query;
pub use request::SelectRequest;
pub use result::{QueryResult, assemble};
pub use traits::{EventStream, SelectEvent, SelectStats, SelectStore};
pub use validate::{DocumentType, QueryOptions, QueryRequest, validate};
