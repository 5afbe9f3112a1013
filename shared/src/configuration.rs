use crate::error::ConfigurationError;
use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub table_name: String,
}

impl Configuration {
    /// Reads `TABLE_NAME` from the process environment. Missing or blank is fatal.
    pub fn load() -> Result<Self, ConfigurationError> {
        Configuration::from_figment(Figment::new().merge(Env::raw().only(&["TABLE_NAME"])))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigurationError> {
        let config: Configuration = figment.extract()?;
        if config.table_name.trim().is_empty() {
            return Err(ConfigurationError::Empty("TABLE_NAME"));
        }
        Ok(config)
    }
}
