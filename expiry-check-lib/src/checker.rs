//! Main expiry checker implementation.
//!
//! `ExpiryChecker` ties the service directory to the RDAP client and walks
//! the domains of a run one at a time.

use crate::error::ExpiryCheckError;
use crate::protocols::rdap::{build_http_client, extract_expiry_info, RdapClient};
use crate::protocols::registry::{extract_tld, RunDirectory, ServiceDirectory};
use crate::types::{CheckConfig, DomainInfo};
use chrono::Utc;

/// Looks up expiration data for domains.
///
/// The service directory is supplied once and reused for every domain of
/// the run.
///
/// # Example
///
/// ```rust,no_run
/// use expiry_check_lib::{CheckConfig, ExpiryChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = ExpiryChecker::from_config(&CheckConfig::default()).await?;
///     let info = checker.check_domain("example.com").await?;
///     println!("{} expires in {:.2} days", info.domain_name, info.days_to_expire);
///     Ok(())
/// }
/// ```
pub struct ExpiryChecker<D> {
    directory: D,
    rdap_client: RdapClient,
}

impl<D: ServiceDirectory> ExpiryChecker<D> {
    pub fn new(directory: D, rdap_client: RdapClient) -> Self {
        Self {
            directory,
            rdap_client,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Look up a single domain.
    ///
    /// # Errors
    ///
    /// - `ServiceLookupError` / `DirectoryError` when no endpoint serves the TLD
    /// - `QueryError` when the RDAP query fails
    /// - `ParseError` / `MissingExpiry` when the record has no usable expiration
    pub async fn check_domain(&self, domain: &str) -> Result<DomainInfo, ExpiryCheckError> {
        let tld = extract_tld(domain);
        let endpoint = self.directory.lookup(domain, tld)?;
        tracing::debug!(domain, tld, endpoint = %endpoint, "selected RDAP service");

        let record = self.rdap_client.query_domain(&endpoint, domain).await?;
        extract_expiry_info(domain, &record, Utc::now())
    }

    /// Look up every domain in order.
    ///
    /// Domains that fail are logged and left out of the result; the rest of
    /// the batch still runs.
    pub async fn check_domains(&self, domains: &[String]) -> Vec<DomainInfo> {
        let mut results = Vec::with_capacity(domains.len());

        for domain in domains {
            match self.check_domain(domain).await {
                Ok(info) => results.push(info),
                Err(e) => {
                    tracing::warn!("Error checking domain {}: {}", domain, e);
                }
            }
        }

        results
    }
}

impl ExpiryChecker<RunDirectory> {
    /// Build a checker for one run: create the HTTP client and fetch the
    /// bootstrap registry.
    ///
    /// A failed registry fetch does not fail construction. It is logged, and
    /// every later lookup reports the directory as unavailable.
    pub async fn from_config(config: &CheckConfig) -> Result<Self, ExpiryCheckError> {
        let http_client = build_http_client(config.timeout)?;
        let directory = RunDirectory::load(&http_client, &config.bootstrap_url).await;

        Ok(Self::new(directory, RdapClient::with_client(http_client)))
    }
}
