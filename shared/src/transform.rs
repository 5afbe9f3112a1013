use crate::core::{format_timestamp, Category, Clock, IdGenerator, ProcessedReading, SensorReading};
use serde_json::Value;

pub struct ReadingTransformer<I: IdGenerator, C: Clock> {
    id_generator: I,
    clock: C,
}

impl<I: IdGenerator, C: Clock> ReadingTransformer<I, C> {
    pub fn new(id_generator: I, clock: C) -> Self {
        Self {
            id_generator,
            clock,
        }
    }

    /// Turns a raw reading into the record that gets persisted.
    ///
    /// The steps run in a fixed order: identifier, timestamp, clamping,
    /// classification, then `processed_at`. Classification sees the clamped
    /// temperature, so a negative input is categorised as `cold`. Every field
    /// the steps do not rewrite keeps its original JSON value.
    pub fn transform(&self, reading: SensorReading) -> ProcessedReading {
        let mut fields = reading.into_fields();

        let id = match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => match fields.get("sensor_id") {
                Some(Value::String(sensor_id)) if !sensor_id.is_empty() => sensor_id.clone(),
                _ => self.id_generator.generate_id(),
            },
        };

        // null counts as absent: the table key needs a value
        if fields.get("timestamp").map_or(true, Value::is_null) {
            fields.insert(
                "timestamp".to_string(),
                Value::String(format_timestamp(self.clock.now())),
            );
        }

        let temperature = fields.get("temperature").and_then(Value::as_f64);
        if temperature.is_some_and(|temperature| temperature < 0.0) {
            fields.insert("temperature".to_string(), Value::from(0));
        }
        let category = Category::from_temperature(temperature.map_or(0.0, clamp_temperature));

        // always recomputed; an inbound copy would be serialized twice
        fields.remove("category");
        fields.remove("processed_at");

        ProcessedReading {
            id,
            category,
            processed_at: format_timestamp(self.clock.now()),
            fields,
        }
    }
}

fn clamp_temperature(temperature: f64) -> f64 {
    if temperature < 0.0 {
        0.0
    } else {
        temperature
    }
}
