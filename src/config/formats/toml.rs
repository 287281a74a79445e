//! TOML configuration format.

use crate::config::error::ConfigError;
use crate::config::formats::load_with;
use crate::config::schema::Config;
use crate::config::source::SourceInput;

/// Load and merge one or more TOML documents.
pub fn load_toml(input: SourceInput) -> Result<Config, ConfigError> {
    load_with(input, |bytes| {
        let text = std::str::from_utf8(bytes)?;
        Ok(::toml::from_str(text)?)
    })
}
