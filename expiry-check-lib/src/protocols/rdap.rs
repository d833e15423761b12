//! RDAP (Registration Data Access Protocol) client.
//!
//! This module queries a domain's RDAP record from the endpoint chosen by the
//! service directory and pulls out the two facts we report: the sponsoring
//! registrar and the expiration date.

use crate::error::ExpiryCheckError;
use crate::types::DomainInfo;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// The subset of an RDAP domain object we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RdapDomain {
    #[serde(rename = "ldhName", default)]
    pub ldh_name: Option<String>,

    #[serde(default)]
    pub entities: Vec<RdapEntity>,

    #[serde(default)]
    pub events: Vec<RdapEvent>,
}

/// An entity (registrar, registrant, abuse contact, ...) attached to a domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RdapEntity {
    #[serde(default)]
    pub roles: Vec<String>,

    /// jCard: `["vcard", [[name, params, type, value], ...]]`
    #[serde(rename = "vcardArray", default)]
    pub vcard_array: Option<serde_json::Value>,
}

/// A dated lifecycle event (`registration`, `expiration`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct RdapEvent {
    #[serde(rename = "eventAction")]
    pub action: String,

    #[serde(rename = "eventDate", default)]
    pub date: String,
}

impl RdapEntity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// The formatted name (`fn`) property of the entity's vCard.
    pub fn vcard_name(&self) -> Option<String> {
        self.vcard_array
            .as_ref()
            .and_then(|v| v.as_array())
            .and_then(|a| a.get(1))
            .and_then(|a| a.as_array())
            .and_then(|items| {
                items.iter().find_map(|item| {
                    let property = item.as_array()?;
                    if property.first()?.as_str()? != "fn" {
                        return None;
                    }
                    property.get(3)?.as_str().map(String::from)
                })
            })
    }
}

/// RDAP client for domain queries.
#[derive(Clone)]
pub struct RdapClient {
    http_client: reqwest::Client,
}

impl RdapClient {
    /// Create a new RDAP client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ExpiryCheckError> {
        let http_client = build_http_client(timeout)?;
        Ok(Self { http_client })
    }

    /// Wrap an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Query the domain object for `domain` from the RDAP service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpiryCheckError::QueryError`] if the request fails, the
    /// server answers with a non-success status (404 means the domain is not
    /// registered there), or the body is not an RDAP domain object.
    pub async fn query_domain(
        &self,
        base_url: &str,
        domain: &str,
    ) -> Result<RdapDomain, ExpiryCheckError> {
        let rdap_url = format!("{}/domain/{}", base_url.trim_end_matches('/'), domain);
        tracing::debug!(domain, url = %rdap_url, "querying RDAP");

        let response = self
            .http_client
            .get(&rdap_url)
            .header(ACCEPT, RDAP_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExpiryCheckError::query(domain, format!("request timed out: {}", e))
                } else {
                    ExpiryCheckError::query(domain, format!("request failed: {}", e))
                }
            })?;

        tracing::debug!(domain, status = %response.status(), "RDAP response");

        match response.status() {
            status if status.is_success() => response.json::<RdapDomain>().await.map_err(|e| {
                ExpiryCheckError::query(domain, format!("failed to decode RDAP response: {}", e))
            }),
            StatusCode::NOT_FOUND => Err(ExpiryCheckError::query_with_status(
                domain,
                "domain not found",
                StatusCode::NOT_FOUND.as_u16(),
            )),
            code => Err(ExpiryCheckError::query_with_status(
                domain,
                format!("RDAP server returned error: {}", code),
                code.as_u16(),
            )),
        }
    }
}

/// Build the HTTP client shared by the bootstrap fetch and RDAP queries.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ExpiryCheckError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("expiry-check/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ExpiryCheckError::config(format!("failed to create HTTP client: {}", e)))
}

/// Display name of the first entity carrying the `registrar` role.
///
/// Only the first registrar entity is considered; if it has no vCard name
/// the result is empty.
pub fn find_registrar(record: &RdapDomain) -> String {
    record
        .entities
        .iter()
        .find(|entity| entity.has_role("registrar"))
        .and_then(RdapEntity::vcard_name)
        .unwrap_or_default()
}

/// Timestamp of the first `expiration` event.
pub fn find_expiry(
    domain: &str,
    record: &RdapDomain,
) -> Result<DateTime<FixedOffset>, ExpiryCheckError> {
    let event = record
        .events
        .iter()
        .find(|event| event.action == "expiration")
        .ok_or_else(|| ExpiryCheckError::missing_expiry(domain))?;

    DateTime::parse_from_rfc3339(&event.date).map_err(|e| {
        ExpiryCheckError::parse(format!("invalid expiration date for {}: {}", domain, e), &event.date)
    })
}

/// Fractional days from `now` until `expiry`.
pub fn days_until(expiry: DateTime<FixedOffset>, now: DateTime<Utc>) -> f64 {
    let remaining = expiry.with_timezone(&Utc) - now;
    remaining.num_milliseconds() as f64 / 86_400_000.0
}

/// Turn an RDAP record into the reported [`DomainInfo`], relative to `now`.
pub fn extract_expiry_info(
    domain: &str,
    record: &RdapDomain,
    now: DateTime<Utc>,
) -> Result<DomainInfo, ExpiryCheckError> {
    let registrar = find_registrar(record);
    let expiry = find_expiry(domain, record)?;

    Ok(DomainInfo {
        domain_name: domain.to_string(),
        registrar,
        expiry_date: expiry.to_rfc3339_opts(SecondsFormat::Secs, true),
        days_to_expire: days_until(expiry, now),
        failed: false,
    })
}
