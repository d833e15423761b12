//! Collecting the domains to check.
//!
//! Domains come from explicit arguments, a named environment variable, or,
//! when neither yields anything, one comma-separated line on standard input.

use crate::error::ExpiryCheckError;
use std::io::{BufRead, Write};

/// Prompt shown before reading domains interactively.
pub const STDIN_PROMPT: &str = "Enter domain names (comma-separated):";

/// Where the domains of a run come from.
#[derive(Debug, Clone, Default)]
pub struct InputSources {
    /// Domains given explicitly, used as-is
    pub domains: Vec<String>,

    /// Name of an environment variable holding comma-separated domains
    pub env_var: Option<String>,
}

impl InputSources {
    pub fn new(domains: Vec<String>, env_var: Option<String>) -> Self {
        Self { domains, env_var }
    }
}

/// Split a comma-separated domain list. Pieces are not trimmed.
pub fn split_domain_list(list: &str) -> Vec<String> {
    list.split(',').map(String::from).collect()
}

/// Gather the domains to check, in order.
///
/// Explicit domains come first, followed by the pieces of the environment
/// variable (if named and non-empty). Only when both yield nothing is
/// `prompt` written and one line read from `input`; that line is trimmed
/// before splitting.
///
/// # Errors
///
/// Returns an `InputError` when reading `input` fails or when no source
/// produced any domain.
pub fn collect_domains<R, W>(
    sources: &InputSources,
    input: &mut R,
    prompt: &mut W,
) -> Result<Vec<String>, ExpiryCheckError>
where
    R: BufRead,
    W: Write,
{
    let mut domains = sources.domains.clone();

    if let Some(name) = &sources.env_var {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => {
                tracing::debug!(env_var = %name, "reading domains from environment");
                domains.extend(split_domain_list(&value));
            }
            _ => tracing::debug!(env_var = %name, "environment variable unset or empty"),
        }
    }

    if domains.is_empty() {
        writeln!(prompt, "{}", STDIN_PROMPT)?;
        prompt.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;

        let line = line.trim();
        if !line.is_empty() {
            domains.extend(split_domain_list(line));
        }
    }

    if domains.is_empty() {
        return Err(ExpiryCheckError::input("no domain names provided"));
    }

    Ok(domains)
}
