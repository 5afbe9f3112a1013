use crate::event_handler::HandlerDeps;
use event_handler::function_handler;
use lambda_runtime::{run, service_fn, tracing, Error};
use shared::adapters::DynamoDbReadingSink;
use shared::configuration::Configuration;
use shared::core::{SystemClock, UuidGenerator};
use shared::transform::ReadingTransformer;

mod event_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let config = Configuration::load()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);

    let sink = DynamoDbReadingSink::new(config.table_name, dynamodb_client);
    let transformer = ReadingTransformer::new(UuidGenerator, SystemClock);
    let deps = HandlerDeps { transformer, sink };

    run(service_fn(|event| function_handler(&deps, event))).await
}
