//! JSON configuration format.

use crate::config::error::ConfigError;
use crate::config::formats::load_with;
use crate::config::schema::Config;
use crate::config::source::SourceInput;

/// Load and merge one or more JSON documents.
pub fn load_json(input: SourceInput) -> Result<Config, ConfigError> {
    load_with(input, |bytes| Ok(serde_json::from_slice(bytes)?))
}
