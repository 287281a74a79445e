//! Format descriptors and the loader capability.

use std::fmt;
use std::sync::Arc;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::source::SourceInput;

/// Turns a source into a parsed configuration.
///
/// Implemented once per supported format. Closures with the matching
/// signature implement it too, which is what tests register.
pub trait ConfigLoader: Send + Sync {
    fn load(&self, input: SourceInput) -> Result<Config, ConfigError>;
}

impl<F> ConfigLoader for F
where
    F: Fn(SourceInput) -> Result<Config, ConfigError> + Send + Sync,
{
    fn load(&self, input: SourceInput) -> Result<Config, ConfigError> {
        self(input)
    }
}

/// A registered configuration format: its name, the extensions it claims,
/// and the loader that decodes it.
#[derive(Clone)]
pub struct FormatDescriptor {
    pub name: String,
    pub extensions: Vec<String>,
    pub loader: Arc<dyn ConfigLoader>,
}

impl FormatDescriptor {
    pub fn new<I, S>(name: impl Into<String>, extensions: I, loader: impl ConfigLoader + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            loader: Arc::new(loader),
        }
    }
}

impl fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
