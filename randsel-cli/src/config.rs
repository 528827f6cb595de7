//! TOML run configuration.
//!
//! ```toml
//! seed = 7
//! trials = 100
//!
//! [weighted]
//! weights = [1.0, 2.0, 0.0, 5.0]
//! n = 2
//!
//! [bytes]
//! start = "10"
//! end = "20"
//! ```
//!
//! Every field is optional; command-line flags take precedence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or interpreting a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid hex '{input}': {reason}")]
    Hex { input: String, reason: &'static str },
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Master seed for the trial seed hierarchy.
    pub seed: u64,
    /// Number of independent trials to run.
    pub trials: u64,
    /// Stream label mixed into each trial's seed. Defaults to the command name.
    pub stream: Option<String>,
    pub weighted: Option<WeightedSection>,
    pub bytes: Option<BytesSection>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            trials: 1,
            stream: None,
            weighted: None,
            bytes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightedSection {
    pub weights: Vec<f64>,
    pub n: usize,
}

/// Byte bounds as hex strings; empty means unbounded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BytesSection {
    pub start: String,
    pub end: String,
}

impl RunConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn stream_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.stream.as_deref().unwrap_or(fallback)
    }
}

/// Decode a hex string such as `"ff00"`. Whitespace and a `0x` prefix are
/// not accepted.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, ConfigError> {
    let err = |reason| ConfigError::Hex {
        input: input.to_string(),
        reason,
    };
    if input.len() % 2 != 0 {
        return Err(err("odd number of digits"));
    }
    input
        .as_bytes()
        .chunks(2)
        .map(|pair| match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(err("non-hex digit")),
        })
        .collect()
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
