//! Configuration schema definitions.
//!
//! This module defines the configuration handed to the proxy engine.
//! All types derive Serde traits so every format loader can produce them.
//! Protocol-specific settings are kept as raw JSON values; the engine owns
//! their interpretation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration produced by a format loader.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log settings for the engine.
    pub log: LogConfig,

    /// Inbound listeners.
    pub inbounds: Vec<InboundConfig>,

    /// Outbound handlers.
    pub outbounds: Vec<OutboundConfig>,

    /// Routing rules, opaque to the bootstrap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<Value>,

    /// Global transport settings, opaque to the bootstrap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<Value>,
}

/// Engine log settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// One of `debug`, `info`, `warning`, `error`, `none`.
    pub loglevel: String,

    /// Access log path; empty means stdout.
    pub access: String,

    /// Error log path; empty means stderr.
    pub error: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            loglevel: "warning".to_string(),
            access: String::new(),
            error: String::new(),
        }
    }
}

/// An inbound listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct InboundConfig {
    /// Identifier used by routing.
    #[serde(default)]
    pub tag: String,

    /// Listen address (default: all interfaces).
    #[serde(default = "default_listen")]
    pub listen: String,

    pub port: u16,

    /// Protocol name, e.g. "vmess" or "socks".
    pub protocol: String,

    /// Protocol-specific settings.
    #[serde(default)]
    pub settings: Value,
}

/// An outbound handler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OutboundConfig {
    #[serde(default)]
    pub tag: String,

    pub protocol: String,

    #[serde(default)]
    pub settings: Value,
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}
