use aws_lambda_events::event::kinesis::KinesisEvent;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;
use shared::core::{Clock, IdGenerator, ReadingSink};
use shared::processor::process_batch;
use shared::transform::ReadingTransformer;

pub(crate) struct HandlerDeps<I: IdGenerator, C: Clock, S: ReadingSink> {
    pub transformer: ReadingTransformer<I, C>,
    pub sink: S,
}

#[derive(Debug, Serialize)]
pub(crate) struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

pub(crate) async fn function_handler<I: IdGenerator, C: Clock, S: ReadingSink>(
    deps: &HandlerDeps<I, C, S>,
    event: LambdaEvent<KinesisEvent>,
) -> Result<HandlerResponse, Error> {
    // the runtime has already base64-decoded each record's data
    let payloads = event
        .payload
        .records
        .iter()
        .map(|record| record.kinesis.data.as_slice());

    match process_batch(&deps.transformer, &deps.sink, payloads).await {
        Ok(summary) => {
            tracing::info!(
                "Successfully processed {} records in {:.3} seconds",
                summary.processed_records,
                summary.processing_time_seconds
            );
            Ok(HandlerResponse {
                status_code: 200,
                body: serde_json::to_string(&summary)?,
            })
        }
        Err(e) => {
            // failing the invocation makes the stream redeliver the whole batch
            tracing::error!("Error processing records: {}", e);
            Err(Error::from(e))
        }
    }
}
