use crate::core::SensorReading;
use crate::error::DecodingError;
use base64::{engine::general_purpose, Engine as _};

/// Parses the bytes of one stream record, already stripped of its transport
/// encoding, into a reading. The bytes must be UTF-8 JSON holding an object.
pub fn decode_reading(payload: &[u8]) -> Result<SensorReading, DecodingError> {
    let text = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str(text)?)
}

/// Same as [`decode_reading`] but starting from the base64 text a stream
/// record carries on the wire.
pub fn decode_encoded_reading(encoded: &str) -> Result<SensorReading, DecodingError> {
    let payload = general_purpose::STANDARD.decode(encoded.trim())?;
    decode_reading(&payload)
}
