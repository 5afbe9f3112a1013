use crate::core::{BatchSummary, Clock, IdGenerator, ReadingSink};
use crate::decoding::decode_reading;
use crate::error::ProcessingError;
use crate::transform::ReadingTransformer;
use std::time::Instant;

/// Decodes, transforms and stores every payload of a batch, in order.
///
/// The first record that cannot be decoded or stored aborts the batch and
/// its error is returned; records before it have already been written.
/// Redelivery is left to the stream.
pub async fn process_batch<I, C, S, P>(
    transformer: &ReadingTransformer<I, C>,
    sink: &S,
    payloads: impl IntoIterator<Item = P>,
) -> Result<BatchSummary, ProcessingError>
where
    I: IdGenerator,
    C: Clock,
    S: ReadingSink,
    P: AsRef<[u8]>,
{
    let start = Instant::now();
    let mut processed_records = 0;

    for (index, payload) in payloads.into_iter().enumerate() {
        let reading = decode_reading(payload.as_ref())
            .map_err(|source| ProcessingError::Decoding { index, source })?;

        let processed = transformer.transform(reading);
        tracing::debug!(
            id = %processed.id,
            category = %processed.category,
            "Transformed reading"
        );

        sink.put_reading(&processed)
            .await
            .map_err(|source| ProcessingError::Persistence {
                id: processed.id.clone(),
                source,
            })?;
        processed_records += 1;
    }

    Ok(BatchSummary {
        processed_records,
        processing_time_seconds: start.elapsed().as_secs_f64(),
    })
}
