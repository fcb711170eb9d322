use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_smithy_types::byte_stream::ByteStream;
use tracing::debug;

use crate::config::Buckets;
use crate::error::CaseError;
use crate::routing::Region;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub bucket: String,
    pub key: String,
}

/// Picks the bucket from the reference prefix and instance, and builds the
/// object key as reference plus transition suffix.
pub fn target(
    case_reference: &str,
    live: bool,
    key_suffix: &str,
    buckets: &Buckets,
) -> Result<StorageTarget, CaseError> {
    let region = Region::from_case_prefix(case_reference)
        .ok_or_else(|| CaseError::routing(case_reference, "no reporting bucket for prefix"))?;

    let bucket = match (region, live) {
        (Region::West, true) => &buckets.west_live,
        (Region::West, false) => &buckets.west_test,
        (Region::North, true) => &buckets.north_live,
        (Region::North, false) => &buckets.north_test,
    };

    Ok(StorageTarget {
        bucket: bucket.clone(),
        key: format!("{}{}", case_reference, key_suffix),
    })
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn put_record(&self, target: &StorageTarget, body: String) -> Result<(), CaseError>;
}

pub struct S3Sink {
    client: S3Client,
}

impl S3Sink {
    pub fn new(client: S3Client) -> Self {
        S3Sink { client }
    }
}

#[async_trait]
impl RecordSink for S3Sink {
    async fn put_record(&self, target: &StorageTarget, body: String) -> Result<(), CaseError> {
        debug!("uploading record to s3://{}/{}", target.bucket, target.key);
        self.client
            .put_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .content_type("application/json")
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                CaseError::StorageWrite(format!(
                    "failed uploading record to bucket - {}",
                    e.into_service_error()
                ))
            })?;

        Ok(())
    }
}
