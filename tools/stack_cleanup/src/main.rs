use anyhow::{bail, Context};
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::types::StackStatus;
use clap::Parser;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stack_cleanup", about = "Delete the pipeline stack and wait until it is gone")]
struct Args {
    /// CloudFormation stack name
    #[arg(long, env = "STACK_NAME", default_value = "real-time-pipeline")]
    stack: String,
    /// Seconds between status checks
    #[arg(long, default_value_t = 10)]
    poll_interval: u64,
    /// Status checks before giving up
    #[arg(long, default_value_t = 30)]
    max_attempts: u32,
}

#[derive(Debug, PartialEq)]
enum DeletionProgress {
    Done,
    InProgress,
    Failed(String),
}

fn deletion_progress(status: Option<&StackStatus>, reason: Option<&str>) -> DeletionProgress {
    match status {
        None | Some(StackStatus::DeleteComplete) => DeletionProgress::Done,
        Some(StackStatus::DeleteFailed) => {
            DeletionProgress::Failed(reason.unwrap_or("no reason given").to_string())
        }
        Some(_) => DeletionProgress::InProgress,
    }
}

async fn stack_status(
    client: &aws_sdk_cloudformation::Client,
    stack_name: &str,
) -> anyhow::Result<DeletionProgress> {
    let result = client.describe_stacks().stack_name(stack_name).send().await;

    match result {
        Ok(output) => {
            let stack = output.stacks().first();
            Ok(deletion_progress(
                stack.and_then(|s| s.stack_status()),
                stack.and_then(|s| s.stack_status_reason()),
            ))
        }
        Err(e) => {
            let service_error = e.into_service_error();
            // DescribeStacks reports a deleted stack as a validation error
            if service_error
                .message()
                .is_some_and(|message| message.contains("does not exist"))
            {
                Ok(DeletionProgress::Done)
            } else {
                Err(anyhow::anyhow!(
                    "Error describing stack {}: {:?}",
                    stack_name,
                    service_error
                ))
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = aws_sdk_cloudformation::Client::new(&config);

    info!(stack = %args.stack, "Deleting stack");
    client
        .delete_stack()
        .stack_name(&args.stack)
        .send()
        .await
        .with_context(|| format!("Error deleting stack {}", args.stack))?;

    info!("Waiting for stack deletion to complete...");
    for attempt in 1..=args.max_attempts {
        match stack_status(&client, &args.stack).await? {
            DeletionProgress::Done => {
                info!(stack = %args.stack, "Stack deleted successfully");
                return Ok(());
            }
            DeletionProgress::Failed(reason) => {
                bail!("Stack {} failed to delete: {}", args.stack, reason);
            }
            DeletionProgress::InProgress => {
                warn!(attempt, max_attempts = args.max_attempts, "Stack still deleting");
                tokio::time::sleep(Duration::from_secs(args.poll_interval)).await;
            }
        }
    }

    bail!(
        "Stack {} was not deleted after {} checks",
        args.stack,
        args.max_attempts
    )
}
