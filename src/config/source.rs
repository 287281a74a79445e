//! Configuration sources.
//!
//! A [`SourceInput`] says where configuration bytes come from; it does not
//! say how they are decoded. Formats call [`SourceInput::read_documents`] so
//! that file, stream, stdin and remote handling lives in one place.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::config::error::ConfigError;

/// Upper bound for fetching a remote config document.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A single named configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(Url),
}

impl SourceLocation {
    /// Parse a command-line value. Only `http`/`https` URLs are treated as
    /// remote; anything else is a filesystem path.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SourceLocation::Url(url),
            _ => SourceLocation::Path(PathBuf::from(value)),
        }
    }

    /// The name used for extension sniffing.
    pub fn file_name(&self) -> String {
        match self {
            SourceLocation::Path(path) => path.to_string_lossy().into_owned(),
            SourceLocation::Url(url) => url.path().to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>, ConfigError> {
        match self {
            SourceLocation::Path(path) => {
                std::fs::read(path).map_err(|source| ConfigError::SourceRead {
                    location: path.display().to_string(),
                    source,
                })
            }
            SourceLocation::Url(url) => fetch(url),
        }
    }
}

impl From<PathBuf> for SourceLocation {
    fn from(path: PathBuf) -> Self {
        SourceLocation::Path(path)
    }
}

impl From<&Path> for SourceLocation {
    fn from(path: &Path) -> Self {
        SourceLocation::Path(path.to_path_buf())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Input handed to a format loader.
pub enum SourceInput {
    /// Ordered locations; the loader reads and merges all of them.
    Files(Vec<SourceLocation>),
    /// An already open byte stream.
    Reader(Box<dyn Read + Send>),
    /// The process's standard input.
    Stdin,
}

impl SourceInput {
    /// Build a file list from filesystem paths.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        SourceInput::Files(
            paths
                .into_iter()
                .map(|p| SourceLocation::Path(p.into()))
                .collect(),
        )
    }

    /// The locations of a `Files` input.
    pub fn locations(&self) -> Option<&[SourceLocation]> {
        match self {
            SourceInput::Files(locations) => Some(locations),
            _ => None,
        }
    }

    /// Name used for extension sniffing: the first location, or empty for
    /// streams.
    pub fn representative_name(&self) -> String {
        match self {
            SourceInput::Files(locations) => locations
                .first()
                .map(SourceLocation::file_name)
                .unwrap_or_default(),
            SourceInput::Reader(_) | SourceInput::Stdin => String::new(),
        }
    }

    /// Read every source into memory, preserving order.
    ///
    /// Blocking; `Url` locations are fetched on a dedicated thread, so this
    /// may also be called from inside an async runtime.
    pub fn read_documents(self) -> Result<Vec<Document>, ConfigError> {
        match self {
            SourceInput::Files(locations) => {
                let mut documents = Vec::with_capacity(locations.len());
                for location in &locations {
                    tracing::debug!(source = %location, "Reading config source");
                    documents.push(Document {
                        origin: location.to_string(),
                        bytes: location.read()?,
                    });
                }
                Ok(documents)
            }
            SourceInput::Reader(mut reader) => Ok(vec![read_stream(&mut reader, "reader")?]),
            SourceInput::Stdin => Ok(vec![read_stream(&mut std::io::stdin().lock(), "stdin")?]),
        }
    }
}

impl fmt::Debug for SourceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceInput::Files(locations) => f.debug_tuple("Files").field(locations).finish(),
            SourceInput::Reader(_) => f.write_str("Reader(..)"),
            SourceInput::Stdin => f.write_str("Stdin"),
        }
    }
}

/// Raw bytes of one source, tagged with where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub origin: String,
    pub bytes: Vec<u8>,
}

fn read_stream(reader: &mut dyn Read, origin: &str) -> Result<Document, ConfigError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| ConfigError::SourceRead {
            location: origin.to_string(),
            source,
        })?;
    Ok(Document {
        origin: origin.to_string(),
        bytes,
    })
}

fn fetch(url: &Url) -> Result<Vec<u8>, ConfigError> {
    // The blocking client must not be created or dropped on a runtime thread.
    std::thread::scope(|scope| scope.spawn(|| fetch_blocking(url)).join())
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn fetch_blocking(url: &Url) -> Result<Vec<u8>, ConfigError> {
    let fetch_error = |source: reqwest::Error| ConfigError::Fetch {
        url: url.to_string(),
        source,
    };

    tracing::info!(url = %url, "Fetching remote config");
    let mut builder = reqwest::blocking::Client::builder().timeout(FETCH_TIMEOUT);
    if is_loopback(url) {
        builder = builder.no_proxy();
    }
    let client = builder.build().map_err(fetch_error)?;
    let response = client
        .get(url.clone())
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(fetch_error)?;
    let bytes = response.bytes().map_err(fetch_error)?;
    Ok(bytes.to_vec())
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
