use crate::error::PersistenceError;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait ReadingSink: Debug {
    async fn put_reading(&self, reading: &ProcessedReading) -> Result<(), PersistenceError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait IdGenerator {
    fn generate_id(&self) -> String;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 UUIDs, rendered hyphenated and lowercase.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// One sensor observation as it arrives on the stream: any JSON object.
///
/// Fields are kept as the producer sent them. The transformation only reads
/// `id`, `sensor_id`, `timestamp` and `temperature`, and only uses them when
/// they have the expected type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SensorReading {
    fields: Map<String, Value>,
}

impl SensorReading {
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self::default().with_field("sensor_id", Value::String(sensor_id.into()))
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn sensor_id(&self) -> Option<&str> {
        self.get("sensor_id").and_then(Value::as_str)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.get("temperature").and_then(Value::as_f64)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get("timestamp").and_then(Value::as_str)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for SensorReading {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Freezing,
    Cold,
    Normal,
    Warm,
    Hot,
}

impl Category {
    /// Buckets are half-open and checked from coldest to hottest.
    pub fn from_temperature(temperature: f64) -> Self {
        if temperature < 0.0 {
            Category::Freezing
        } else if temperature < 18.0 {
            Category::Cold
        } else if temperature < 24.0 {
            Category::Normal
        } else if temperature < 30.0 {
            Category::Warm
        } else {
            Category::Hot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Freezing => "freezing",
            Category::Cold => "cold",
            Category::Normal => "normal",
            Category::Warm => "warm",
            Category::Hot => "hot",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reading ready to be written to the table, keyed by (`id`, `timestamp`).
///
/// `fields` holds every other attribute, including `timestamp` and
/// `temperature`, in the JSON form they arrived in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcessedReading {
    pub id: String,
    pub category: Category,
    pub processed_at: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ProcessedReading {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn sensor_id(&self) -> Option<&str> {
        self.get("sensor_id").and_then(Value::as_str)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.get("temperature").and_then(Value::as_f64)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get("timestamp").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BatchSummary {
    pub processed_records: usize,
    pub processing_time_seconds: f64,
}
