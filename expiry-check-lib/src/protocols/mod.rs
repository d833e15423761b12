//! Protocol implementations for expiration checks.
//!
//! RDAP querying and the bootstrap-backed service directory.

/// RDAP (Registration Data Access Protocol) implementation
pub mod rdap;

/// Service directory and TLD extraction
pub mod registry;
