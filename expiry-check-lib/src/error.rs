//! Error handling for expiration checks.
//!
//! A single error type covers the whole pipeline, from collecting input
//! through the RDAP query to rendering output. Some variants abort the run,
//! the rest only cost the domain that produced them.

use std::fmt;

/// Main error type for expiration checks.
#[derive(Debug, Clone)]
pub enum ExpiryCheckError {
    /// No domains were supplied, or standard input could not be read
    InputError {
        message: String,
    },

    /// The RDAP bootstrap registry could not be fetched or decoded
    DirectoryError {
        message: String,
    },

    /// The service directory has no RDAP endpoint for the domain's TLD
    ServiceLookupError {
        domain: String,
        tld: String,
    },

    /// The RDAP query itself failed (network, HTTP status, undecodable body)
    QueryError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The expiration timestamp could not be parsed as RFC3339
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// The RDAP record carries no `expiration` event
    MissingExpiry {
        domain: String,
    },

    /// Results could not be serialized
    OutputError {
        message: String,
    },

    /// Configuration errors (invalid settings, unparsable TOML)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration
    FileError {
        path: String,
        message: String,
    },
}

impl ExpiryCheckError {
    /// Create a new input error.
    pub fn input<M: Into<String>>(message: M) -> Self {
        Self::InputError {
            message: message.into(),
        }
    }

    /// Create a new service directory error.
    pub fn directory<M: Into<String>>(message: M) -> Self {
        Self::DirectoryError {
            message: message.into(),
        }
    }

    /// Create a new "no RDAP service" error.
    pub fn no_service<D: Into<String>, T: Into<String>>(domain: D, tld: T) -> Self {
        Self::ServiceLookupError {
            domain: domain.into(),
            tld: tld.into(),
        }
    }

    /// Create a new RDAP query error.
    pub fn query<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::QueryError {
            domain: domain.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new RDAP query error with HTTP status code.
    pub fn query_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::QueryError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new timestamp parse error, keeping the offending text.
    pub fn parse<M: Into<String>, C: Into<String>>(message: M, content: C) -> Self {
        Self::ParseError {
            message: message.into(),
            content: Some(content.into()),
        }
    }

    pub fn missing_expiry<D: Into<String>>(domain: D) -> Self {
        Self::MissingExpiry {
            domain: domain.into(),
        }
    }

    /// Create a new output error.
    pub fn output<M: Into<String>>(message: M) -> Self {
        Self::OutputError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run.
    ///
    /// Everything else is scoped to a single domain: the domain is logged
    /// and dropped, and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InputError { .. }
                | Self::OutputError { .. }
                | Self::ConfigError { .. }
                | Self::FileError { .. }
        )
    }
}

impl fmt::Display for ExpiryCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputError { message } => write!(f, "{}", message),
            Self::DirectoryError { message } => {
                write!(f, "service directory unavailable: {}", message)
            }
            Self::ServiceLookupError { domain, tld } => {
                write!(f, "no RDAP service found for {} (TLD '{}')", domain, tld)
            }
            Self::QueryError {
                domain,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "RDAP query for '{}' failed (HTTP {}): {}", domain, code, message)
                } else {
                    write!(f, "RDAP query for '{}' failed: {}", domain, message)
                }
            }
            Self::ParseError { message, content } => {
                if let Some(content) = content {
                    write!(f, "Parse error: {} ('{}')", message, content)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            Self::MissingExpiry { domain } => {
                write!(f, "no expiration event in RDAP record for {}", domain)
            }
            Self::OutputError { message } => write!(f, "Output error: {}", message),
            Self::ConfigError { message } => write!(f, "Configuration error: {}", message),
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for ExpiryCheckError {}

impl From<serde_json::Error> for ExpiryCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::OutputError {
            message: format!("failed to marshal JSON: {}", err),
        }
    }
}

impl From<std::io::Error> for ExpiryCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::InputError {
            message: format!("failed to read from standard input: {}", err),
        }
    }
}
