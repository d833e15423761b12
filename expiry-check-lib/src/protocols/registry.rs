//! TLD extraction and the RDAP service directory.
//!
//! The directory maps each TLD to the RDAP base URL responsible for it. It is
//! built from the IANA bootstrap registry once per run and handed to the
//! checker, which only ever asks it one question: which endpoint serves
//! this TLD?

use crate::error::ExpiryCheckError;
use serde::Deserialize;
use std::collections::HashMap;

/// Extract the TLD from a domain name.
///
/// Returns everything after the last `.`. A string without a dot is returned
/// unchanged, so `"localhost"` resolves to the "TLD" `"localhost"`.
///
/// # Examples
///
/// ```rust
/// use expiry_check_lib::extract_tld;
///
/// assert_eq!(extract_tld("example.co.uk"), "uk");
/// assert_eq!(extract_tld("localhost"), "localhost");
/// ```
pub fn extract_tld(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}

/// Answers "which RDAP endpoint serves this TLD?".
pub trait ServiceDirectory {
    /// Look up the RDAP base URL for `tld`.
    ///
    /// `domain` is only used to give errors some context.
    fn lookup(&self, domain: &str, tld: &str) -> Result<String, ExpiryCheckError>;
}

/// Wire shape of the bootstrap document: `{"services": [[[tlds], [urls]], ...]}`.
#[derive(Debug, Deserialize)]
struct BootstrapDocument {
    services: Vec<(Vec<String>, Vec<String>)>,
}

/// Service directory backed by the IANA RDAP bootstrap registry.
#[derive(Debug, Clone, Default)]
pub struct BootstrapRegistry {
    endpoints: HashMap<String, String>,
}

impl BootstrapRegistry {
    /// Build a directory from `(tlds, urls)` service entries.
    ///
    /// Every TLD of an entry maps to the entry's first URL. Entries without a
    /// URL are ignored. When a TLD shows up in several entries the later one
    /// wins.
    pub fn from_services<I>(services: I) -> Self
    where
        I: IntoIterator<Item = (Vec<String>, Vec<String>)>,
    {
        let mut endpoints = HashMap::new();

        for (tlds, urls) in services {
            let Some(url) = urls.into_iter().next() else {
                continue;
            };
            for tld in tlds {
                endpoints.insert(tld.to_lowercase(), url.clone());
            }
        }

        Self { endpoints }
    }

    /// Decode a bootstrap document.
    pub fn from_json(json: &str) -> Result<Self, ExpiryCheckError> {
        let document: BootstrapDocument = serde_json::from_str(json).map_err(|e| {
            ExpiryCheckError::directory(format!("failed to decode bootstrap registry: {}", e))
        })?;

        Ok(Self::from_services(document.services))
    }

    /// Download and decode the bootstrap document at `url`.
    ///
    /// Network failures, non-success status codes and malformed documents
    /// are all reported as [`ExpiryCheckError::DirectoryError`].
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, ExpiryCheckError> {
        tracing::debug!(url, "fetching RDAP bootstrap registry");

        let response = client.get(url).send().await.map_err(|e| {
            ExpiryCheckError::directory(format!("failed to fetch bootstrap registry: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(ExpiryCheckError::directory(format!(
                "bootstrap registry returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            ExpiryCheckError::directory(format!("failed to read bootstrap registry: {}", e))
        })?;

        let registry = Self::from_json(&body)?;
        if registry.is_empty() {
            tracing::warn!(url, "bootstrap registry lists no RDAP services");
        }
        tracing::debug!(tlds = registry.len(), "loaded RDAP bootstrap registry");
        Ok(registry)
    }

    /// Number of TLDs with a known endpoint.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl ServiceDirectory for BootstrapRegistry {
    fn lookup(&self, domain: &str, tld: &str) -> Result<String, ExpiryCheckError> {
        self.endpoints
            .get(&tld.to_lowercase())
            .cloned()
            .ok_or_else(|| ExpiryCheckError::no_service(domain, tld))
    }
}

/// Stand-in directory for a run whose bootstrap fetch failed.
///
/// Every lookup fails with the original fetch error, so each domain is
/// reported and skipped instead of silently resolving against an empty map.
#[derive(Debug, Clone)]
pub struct UnavailableDirectory {
    reason: String,
}

impl UnavailableDirectory {
    pub fn new<R: Into<String>>(reason: R) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ExpiryCheckError> for UnavailableDirectory {
    fn from(err: ExpiryCheckError) -> Self {
        match err {
            ExpiryCheckError::DirectoryError { message } => Self::new(message),
            other => Self::new(other.to_string()),
        }
    }
}

impl ServiceDirectory for UnavailableDirectory {
    fn lookup(&self, _domain: &str, _tld: &str) -> Result<String, ExpiryCheckError> {
        Err(ExpiryCheckError::directory(self.reason.clone()))
    }
}

/// Either a loaded registry or the reason it could not be loaded.
#[derive(Debug, Clone)]
pub enum RunDirectory {
    Loaded(BootstrapRegistry),
    Unavailable(UnavailableDirectory),
}

impl RunDirectory {
    /// Fetch the registry, falling back to [`UnavailableDirectory`] on failure.
    pub async fn load(client: &reqwest::Client, url: &str) -> Self {
        match BootstrapRegistry::fetch(client, url).await {
            Ok(registry) => Self::Loaded(registry),
            Err(e) => {
                tracing::error!(url, error = %e, "RDAP bootstrap registry unavailable");
                Self::Unavailable(e.into())
            }
        }
    }
}

impl ServiceDirectory for RunDirectory {
    fn lookup(&self, domain: &str, tld: &str) -> Result<String, ExpiryCheckError> {
        match self {
            Self::Loaded(registry) => registry.lookup(domain, tld),
            Self::Unavailable(unavailable) => unavailable.lookup(domain, tld),
        }
    }
}
