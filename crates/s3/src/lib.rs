//! sq-s3: S3 SDK adapter for the sq client
//!
//! This crate implements the SelectStore trait using the aws-sdk-s3 crate.
//! It is the only crate that directly depends on the AWS SDK.

pub mod client;
mod convert;

pub use client::S3Client;
