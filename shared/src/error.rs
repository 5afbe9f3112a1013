use thiserror::Error;

/// A stream record could not be turned into a [`crate::core::SensorReading`].
#[derive(Debug, Error)]
pub enum DecodingError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("payload is not a valid sensor reading: {0}")]
    Json(#[from] serde_json::Error),
}

/// The sink refused, or could not be handed, a processed reading.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to convert reading into a table item: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("reading did not serialize to an object")]
    NotAnObject,

    #[error("sink rejected the write: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("required parameter {0} is empty")]
    Empty(&'static str),
}

impl From<figment::Error> for ConfigurationError {
    fn from(e: figment::Error) -> Self {
        ConfigurationError::Load(Box::new(e))
    }
}

/// Aborts a batch: the first record that failed and why.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to decode record {index}: {source}")]
    Decoding {
        index: usize,
        #[source]
        source: DecodingError,
    },

    #[error("failed to store reading {id}: {source}")]
    Persistence {
        id: String,
        #[source]
        source: PersistenceError,
    },
}
