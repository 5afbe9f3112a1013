use chrono::{DateTime, Utc};
use rand::Rng;
use shared::core::{format_timestamp, SensorReading};

pub fn sensor_ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("sensor-{}", i)).collect()
}

/// A plausible but random observation from `sensor_id`, taken at `now`.
pub fn generate_reading<R: Rng>(
    sensor_id: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> SensorReading {
    SensorReading::new(sensor_id)
        .with_field("temperature", round2(rng.gen_range(-5.0..40.0)))
        .with_field("humidity", round2(rng.gen_range(0.0..100.0)))
        .with_field("pressure", round2(rng.gen_range(900.0..1100.0)))
        .with_field("battery", round2(rng.gen_range(0.0..100.0)))
        .with_field("timestamp", format_timestamp(now))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{generate_reading, sensor_ids};
    use chrono::{TimeZone, Utc};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn when_sensor_ids_are_requested_should_number_them_from_one() {
        assert_eq!(sensor_ids(3), vec!["sensor-1", "sensor-2", "sensor-3"]);
        assert!(sensor_ids(0).is_empty());
    }

    #[test]
    fn when_readings_are_generated_should_stay_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        for _ in 0..500 {
            let reading = generate_reading("sensor-1", &mut rng, now);

            let number = |name: &str| reading.get(name).and_then(|value| value.as_f64()).unwrap();
            let temperature = number("temperature");
            let humidity = number("humidity");
            let pressure = number("pressure");
            let battery = number("battery");
            assert!((-5.0..=40.0).contains(&temperature));
            assert!((0.0..=100.0).contains(&humidity));
            assert!((900.0..=1100.0).contains(&pressure));
            assert!((0.0..=100.0).contains(&battery));
            assert_eq!((temperature * 100.0).round() / 100.0, temperature);
        }
    }

    #[test]
    fn when_reading_is_generated_should_carry_sensor_and_timestamp() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        let reading = generate_reading("sensor-9", &mut rng, now);

        assert_eq!(reading.sensor_id(), Some("sensor-9"));
        assert_eq!(reading.timestamp(), Some("2024-03-01T08:00:00.000000Z"));
        assert!(reading.get("id").is_none());
        assert_eq!(reading.into_fields().len(), 6);
    }
}
