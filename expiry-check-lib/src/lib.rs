//! # Expiry Check Library
//!
//! Looks up domain expiration dates over RDAP.
//!
//! The RDAP service for each TLD is taken from the IANA bootstrap registry,
//! fetched once per run. Each domain is then queried in turn and reduced to
//! its registrar and the number of days left until expiry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use expiry_check_lib::{format_results, CheckConfig, ExpiryChecker, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = ExpiryChecker::from_config(&CheckConfig::default()).await?;
//!     let domains = vec!["example.com".to_string(), "example.org".to_string()];
//!     let results = checker.check_domains(&domains).await;
//!
//!     print!("{}", format_results(&results, OutputFormat::Text)?);
//!     Ok(())
//! }
//! ```

pub use checker::ExpiryChecker;
pub use config::{load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig};
pub use error::ExpiryCheckError;
pub use input::{collect_domains, split_domain_list, InputSources, STDIN_PROMPT};
pub use output::{format_json, format_results, format_text};
pub use protocols::rdap::{build_http_client, extract_expiry_info, RdapClient, RdapDomain};
pub use protocols::registry::{
    extract_tld, BootstrapRegistry, RunDirectory, ServiceDirectory, UnavailableDirectory,
};
pub use types::{CheckConfig, DomainInfo, OutputFormat, DEFAULT_BOOTSTRAP_URL};

mod checker;
mod config;
mod error;
mod input;
mod output;
mod protocols;
mod types;

pub type Result<T> = std::result::Result<T, ExpiryCheckError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
