pub mod adapters;
pub mod configuration;
pub mod core;
pub mod decoding;
pub mod error;
pub mod processor;
pub mod transform;
