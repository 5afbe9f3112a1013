use aws_sdk_cloudformation::types::Output;
use std::env;

#[derive(Debug, Clone)]
pub struct StackOutputs {
    pub stream_name: String,
    pub table_name: String,
}

/// Looks up the deployed pipeline's stream and table through the stack's
/// outputs. `STACK_NAME` selects the stack.
pub async fn retrieve_stack_outputs() -> StackOutputs {
    let config = aws_config::load_from_env().await;
    let cloudformation_client = aws_sdk_cloudformation::Client::new(&config);
    let stack_name = env::var("STACK_NAME").unwrap_or("real-time-pipeline".to_string());

    let get_stacks = cloudformation_client
        .describe_stacks()
        .stack_name(&stack_name)
        .send()
        .await
        .unwrap_or_else(|e| panic!("Failed to get stack outputs for {}: {:?}", stack_name, e));

    let outputs = get_stacks.stacks()[0].outputs().to_vec();

    StackOutputs {
        stream_name: output_value(&outputs, "SensorDataStreamName"),
        table_name: output_value(&outputs, "ProcessedDataTableName"),
    }
}

fn output_value(outputs: &[Output], key: &str) -> String {
    outputs
        .iter()
        .find(|output| output.output_key() == Some(key))
        .and_then(|output| output.output_value())
        .unwrap_or_else(|| panic!("Stack output {} not found", key))
        .to_string()
}
