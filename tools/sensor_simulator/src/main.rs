use anyhow::Context;
use aws_config::BehaviorVersion;
use clap::Parser;
use publisher::KinesisReadingPublisher;
use simulation::{run_simulation, SimulationConfig};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod generator;
mod publisher;
mod simulation;

#[derive(Parser, Debug)]
#[command(name = "sensor_simulator", about = "Sensor data simulator for Kinesis")]
struct Args {
    /// Kinesis stream name
    #[arg(long, env = "STREAM_NAME")]
    stream: String,
    /// Number of sensors to simulate
    #[arg(long, default_value_t = 5)]
    sensors: usize,
    /// Interval between data points (seconds)
    #[arg(long, default_value_t = 0.2)]
    interval: f64,
    /// Duration of simulation (seconds)
    #[arg(long, default_value_t = 300)]
    duration: u64,
}

impl Args {
    fn simulation_config(&self) -> anyhow::Result<SimulationConfig> {
        let interval = Duration::try_from_secs_f64(self.interval)
            .context("--interval must be a non-negative number of seconds")?;
        Ok(SimulationConfig {
            sensors: self.sensors,
            interval,
            duration: Duration::from_secs(self.duration),
        })
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
    let config = args.simulation_config()?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let kinesis_client = aws_sdk_kinesis::Client::new(&aws_config);
    let publisher = KinesisReadingPublisher::new(kinesis_client, args.stream.clone());

    let ctx = CancellationToken::new();
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stopping simulation...");
            signal_ctx.cancel();
        }
    });

    info!(stream = %args.stream, "Sending data to Kinesis stream");
    run_simulation(ctx, &config, &publisher).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn when_only_stream_is_given_should_use_defaults() {
        let args = Args::try_parse_from(["sensor_simulator", "--stream", "sensor-data"]).unwrap();
        let config = args.simulation_config().unwrap();

        assert_eq!(args.stream, "sensor-data");
        assert_eq!(config.sensors, 5);
        assert_eq!(config.interval, Duration::from_millis(200));
        assert_eq!(config.duration, Duration::from_secs(300));
    }

    #[test]
    fn when_all_options_are_given_should_override_defaults() {
        let args = Args::try_parse_from([
            "sensor_simulator",
            "--stream",
            "sensor-data",
            "--sensors",
            "2",
            "--interval",
            "0.5",
            "--duration",
            "10",
        ])
        .unwrap();
        let config = args.simulation_config().unwrap();

        assert_eq!(config.sensors, 2);
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.duration, Duration::from_secs(10));
    }

    #[test]
    fn when_interval_is_negative_should_reject_it() {
        let args = Args::try_parse_from([
            "sensor_simulator",
            "--stream",
            "sensor-data",
            "--interval=-1",
        ])
        .unwrap();

        assert!(args.simulation_config().is_err());
    }
}
