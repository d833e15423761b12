//! Rendering results as text or JSON.

use crate::error::ExpiryCheckError;
use crate::types::{DomainInfo, OutputFormat};
use std::fmt::Write;

/// Render results in the requested format.
pub fn format_results(
    results: &[DomainInfo],
    format: OutputFormat,
) -> Result<String, ExpiryCheckError> {
    match format {
        OutputFormat::Json => format_json(results),
        OutputFormat::Text => Ok(format_text(results)),
    }
}

/// Indented JSON array. An empty result set renders as `[]`.
pub fn format_json(results: &[DomainInfo]) -> Result<String, ExpiryCheckError> {
    let mut json = serde_json::to_string_pretty(results)?;
    json.push('\n');
    Ok(json)
}

/// Four labelled lines per domain, each block followed by a blank line.
pub fn format_text(results: &[DomainInfo]) -> String {
    let mut out = String::new();

    for result in results {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Domain: {}", result.domain_name);
        let _ = writeln!(out, "Registrar: {}", result.registrar);
        let _ = writeln!(out, "Expiry Date: {}", result.expiry_date);
        let _ = writeln!(out, "Days to Expire: {:.2}", result.days_to_expire);
        out.push('\n');
    }

    out
}
