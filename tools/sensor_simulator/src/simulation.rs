use crate::generator::{generate_reading, sensor_ids};
use crate::publisher::ReadingPublisher;
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const PROGRESS_EVERY: u64 = 50;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub sensors: usize,
    /// Pause between rounds; each round sends one reading per sensor.
    pub interval: Duration,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationSummary {
    pub records_sent: u64,
    pub elapsed: Duration,
}

impl SimulationSummary {
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.records_sent as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Publishes rounds of readings until `duration` has elapsed, `ctx` is
/// cancelled or a publish fails. A failure is logged, not returned; the
/// summary covers whatever was sent before it.
pub async fn run_simulation<P: ReadingPublisher>(
    ctx: CancellationToken,
    config: &SimulationConfig,
    publisher: &P,
) -> SimulationSummary {
    let sensor_ids = sensor_ids(config.sensors);
    let mut rng = StdRng::from_entropy();
    let start = Instant::now();
    let mut records_sent: u64 = 0;

    info!(
        sensors = config.sensors,
        duration_seconds = config.duration.as_secs_f64(),
        "Starting simulation"
    );

    'simulation: while !ctx.is_cancelled() && start.elapsed() < config.duration {
        for sensor_id in &sensor_ids {
            let reading = generate_reading(sensor_id, &mut rng, Utc::now());
            if let Err(e) = publisher.publish(&reading, sensor_id).await {
                error!(error = %e, sensor_id = %sensor_id, "Error in simulation");
                break 'simulation;
            }
            records_sent += 1;
        }

        if records_sent > 0 && records_sent % PROGRESS_EVERY == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            info!(
                "Sent {} records in {:.2} seconds ({:.2} records/second)",
                records_sent,
                elapsed,
                records_sent as f64 / elapsed.max(f64::EPSILON)
            );
        }

        tokio::select! {
            _ = ctx.cancelled() => {
                info!("Received shutdown signal, stopping simulation");
                break;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    let summary = SimulationSummary {
        records_sent,
        elapsed: start.elapsed(),
    };
    info!(
        "Simulation complete. Sent {} records in {:.2} seconds ({:.2} records/second)",
        summary.records_sent,
        summary.elapsed.as_secs_f64(),
        summary.throughput()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::{run_simulation, SimulationConfig, SimulationSummary};
    use crate::publisher::{MockReadingPublisher, PublishError};
    use mockall::predicate::{always, eq};
    use shared::core::SensorReading;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn config(sensors: usize, interval_ms: u64, duration_ms: u64) -> SimulationConfig {
        SimulationConfig {
            sensors,
            interval: Duration::from_millis(interval_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn when_duration_elapses_should_send_one_reading_per_sensor_per_round() {
        let mut mock_publisher = MockReadingPublisher::new();
        mock_publisher
            .expect_publish()
            .times(10)
            .returning(|_, _| Ok(()));

        let summary = run_simulation(
            CancellationToken::new(),
            &config(2, 200, 1000),
            &mock_publisher,
        )
        .await;

        assert_eq!(summary.records_sent, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn when_publishing_should_partition_by_sensor_id() {
        let mut mock_publisher = MockReadingPublisher::new();
        for sensor_id in ["sensor-1", "sensor-2", "sensor-3"] {
            mock_publisher
                .expect_publish()
                .times(1)
                .withf(move |reading: &SensorReading, partition_key: &str| {
                    partition_key == sensor_id && reading.sensor_id() == Some(sensor_id)
                })
                .returning(|_, _| Ok(()));
        }

        let summary = run_simulation(
            CancellationToken::new(),
            &config(3, 500, 100),
            &mock_publisher,
        )
        .await;

        assert_eq!(summary.records_sent, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn when_token_is_already_cancelled_should_send_nothing() {
        let mut mock_publisher = MockReadingPublisher::new();
        mock_publisher.expect_publish().times(0);
        let ctx = CancellationToken::new();
        ctx.cancel();

        let summary = run_simulation(ctx, &config(5, 200, 60_000), &mock_publisher).await;

        assert_eq!(summary.records_sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn when_token_is_cancelled_mid_run_should_stop_during_wait() {
        let mut mock_publisher = MockReadingPublisher::new();
        mock_publisher
            .expect_publish()
            .times(3)
            .returning(|_, _| Ok(()));
        let ctx = CancellationToken::new();
        let cancel = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            cancel.cancel();
        });

        let summary = run_simulation(ctx, &config(1, 200, 60_000), &mock_publisher).await;

        assert_eq!(summary.records_sent, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn when_publish_fails_should_stop_and_report_what_was_sent() {
        let mut mock_publisher = MockReadingPublisher::new();
        mock_publisher
            .expect_publish()
            .with(always(), eq("sensor-1"))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_publisher
            .expect_publish()
            .with(always(), eq("sensor-2"))
            .times(1)
            .returning(|_, _| Err(PublishError::Stream("throttled".to_string())));

        let summary = run_simulation(
            CancellationToken::new(),
            &config(3, 200, 60_000),
            &mock_publisher,
        )
        .await;

        assert_eq!(summary.records_sent, 1);
    }

    #[test]
    fn when_no_time_has_elapsed_throughput_should_be_zero() {
        let summary = SimulationSummary {
            records_sent: 10,
            elapsed: Duration::ZERO,
        };

        assert_eq!(summary.throughput(), 0.0);
    }
}
