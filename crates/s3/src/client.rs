//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the SelectStore trait from sq-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::types::ExpressionType;
use futures::stream;

use sq_core::{Alias, Error, EventStream, Result, SelectRequest, SelectStore};

use crate::convert;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from an alias configuration
    pub async fn new(alias: Alias) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            alias.access_key.clone(),
            alias.secret_key.clone(),
            None, // session token
            None, // expiry
            "sq-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(alias.region.clone()))
            .endpoint_url(&alias.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(alias.force_path_style())
            .build();

        tracing::debug!(alias = %alias.name, endpoint = %alias.endpoint, "created S3 client");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl SelectStore for S3Client {
    async fn select_object_content(&self, request: &SelectRequest) -> Result<EventStream> {
        let target = format!("{}/{}", request.bucket, request.key);
        let scan_range = request
            .scan_range
            .as_ref()
            .map(convert::scan_range)
            .transpose()?;

        let response = self
            .inner
            .select_object_content()
            .bucket(&request.bucket)
            .key(&request.key)
            .expression(&request.expression)
            .expression_type(ExpressionType::from(request.expression_type.as_str()))
            .input_serialization(convert::input_serialization(&request.input_serialization))
            .output_serialization(convert::output_serialization(&request.output_serialization))
            .set_scan_range(scan_range)
            .send()
            .await
            .map_err(|e| {
                let code = e.as_service_error().and_then(|se| se.code());
                convert::classify_error(
                    code,
                    DisplayErrorContext(&e).to_string(),
                    &target,
                )
            })?;

        tracing::debug!(object = %target, "select response stream opened");

        // The receiver is owned by the stream; dropping the stream closes it.
        let events = stream::unfold(Some(response.payload), |receiver| async move {
            let mut receiver = receiver?;
            match receiver.recv().await {
                Ok(Some(event)) => Some((Ok(convert::select_event(event)), Some(receiver))),
                Ok(None) => None,
                Err(e) => {
                    let err = Error::Network(DisplayErrorContext(&e).to_string());
                    Some((Err(err), None))
                }
            }
        });

        Ok(Box::pin(events))
    }
}
