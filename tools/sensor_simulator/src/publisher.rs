use async_trait::async_trait;
use aws_sdk_kinesis::primitives::Blob;
use shared::core::SensorReading;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize reading: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("error publishing record: {0}")]
    Stream(String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadingPublisher {
    async fn publish(&self, reading: &SensorReading, partition_key: &str)
        -> Result<(), PublishError>;
}

pub struct KinesisReadingPublisher {
    kinesis_client: aws_sdk_kinesis::Client,
    stream_name: String,
}

impl KinesisReadingPublisher {
    pub fn new(kinesis_client: aws_sdk_kinesis::Client, stream_name: String) -> Self {
        Self {
            kinesis_client,
            stream_name,
        }
    }
}

#[async_trait]
impl ReadingPublisher for KinesisReadingPublisher {
    async fn publish(
        &self,
        reading: &SensorReading,
        partition_key: &str,
    ) -> Result<(), PublishError> {
        let data = serde_json::to_vec(reading)?;

        let output = self
            .kinesis_client
            .put_record()
            .stream_name(&self.stream_name)
            .partition_key(partition_key)
            .data(Blob::new(data))
            .send()
            .await
            .map_err(|e| PublishError::Stream(format!("{:?}", e)))?;

        tracing::trace!(
            shard_id = output.shard_id(),
            sequence_number = output.sequence_number(),
            "Record published"
        );
        Ok(())
    }
}
