//! Core data types for expiration checks.
//!
//! This module defines the result record, the runtime configuration and the
//! output format selector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// IANA's RDAP bootstrap registry for DNS.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Expiration details for one registered domain.
///
/// The field names are part of the JSON output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// The domain name that was checked (e.g., "example.com")
    pub domain_name: String,

    /// Display name of the sponsoring registrar, empty when the record has none
    pub registrar: String,

    /// Expiration timestamp in RFC3339
    pub expiry_date: String,

    /// Fractional days from now until expiry (negative once expired)
    pub days_to_expire: f64,

    /// Always false for records that reach the output
    pub failed: bool,
}

/// Output format for displaying results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Four labelled lines per domain followed by a blank line
    #[default]
    Text,

    /// Indented JSON array of [`DomainInfo`]
    Json,
}

/// Configuration options for a check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Timeout applied to every HTTP request (bootstrap and RDAP)
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Location of the RDAP bootstrap registry
    /// Default: [`DEFAULT_BOOTSTRAP_URL`]
    pub bootstrap_url: String,

    /// Output format used when the CLI does not pick one
    /// Default: text
    pub output: OutputFormat,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl CheckConfig {
    /// Set custom timeout for HTTP requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the service directory at a different bootstrap document.
    pub fn with_bootstrap_url<U: Into<String>>(mut self, url: U) -> Self {
        self.bootstrap_url = url.into();
        self
    }

    /// Set the default output format.
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}', use text or json", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
