//! Builtin configuration formats.
//!
//! Every format reads its sources through [`SourceInput::read_documents`],
//! decodes each document into a JSON value, merges them and deserialises the
//! result into [`Config`].
//!
//! # Merge rule
//! Documents are applied in order. Top-level arrays are concatenated; any
//! other top-level key from a later document replaces the earlier one.

pub mod json;
pub mod toml;

use serde_json::{Map, Value};

use crate::config::error::{BoxError, ConfigError};
use crate::config::format::FormatDescriptor;
use crate::config::registry::LoaderRegistry;
use crate::config::schema::Config;
use crate::config::source::SourceInput;
use crate::config::validation::validate_config;

/// Register every builtin format.
pub fn register_builtin(registry: &LoaderRegistry) -> Result<(), ConfigError> {
    registry.register(FormatDescriptor::new("json", ["json"], self::json::load_json))?;
    registry.register(FormatDescriptor::new("toml", ["toml"], self::toml::load_toml))?;
    Ok(())
}

/// Read, decode, merge, deserialise and validate.
pub(crate) fn load_with<D>(input: SourceInput, decode: D) -> Result<Config, ConfigError>
where
    D: Fn(&[u8]) -> Result<Value, BoxError>,
{
    let documents = input.read_documents()?;

    let mut origins = Vec::with_capacity(documents.len());
    let mut merged = Map::new();
    for document in documents {
        let value = decode(&document.bytes).map_err(|source| ConfigError::Decode {
            origin: document.origin.clone(),
            source,
        })?;
        match value {
            Value::Object(object) => merge_into(&mut merged, object),
            _ => {
                return Err(ConfigError::Decode {
                    origin: document.origin,
                    source: "config document must be an object".into(),
                })
            }
        }
        origins.push(document.origin);
    }

    let config: Config =
        serde_json::from_value(Value::Object(merged)).map_err(|e| ConfigError::Decode {
            origin: origins.join(", "),
            source: Box::new(e),
        })?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        documents = origins.len(),
        inbounds = config.inbounds.len(),
        outbounds = config.outbounds.len(),
        "Config decoded"
    );
    Ok(config)
}

fn merge_into(target: &mut Map<String, Value>, document: Map<String, Value>) {
    for (key, value) in document {
        match (target.get_mut(&key), value) {
            (Some(Value::Array(existing)), Value::Array(items)) => existing.extend(items),
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
