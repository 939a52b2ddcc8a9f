//! Cloudflare DNS provider for Harbormaster
//!
//! Reconciles DNS records inside one Cloudflare zone. Records are addressed
//! by subdomain; the zone's own name is appended when matching.
//!
//! # Requirements
//!
//! - Account email, global API key and zone id (see `harbormaster-config`)
//!
//! # Example
//!
//! ```ignore
//! use harbormaster_cloud::{DnsProvider, DnsRecordSpec};
//! use harbormaster_cloud_cloudflare::{CloudflareDns, DnsConfig};
//!
//! let dns = CloudflareDns::new(DnsConfig { api_key, email, zone_id })?;
//!
//! // Point www at the new address; an identical record is left alone
//! let outcome = dns
//!     .ensure_record(&DnsRecordSpec::new("", "A", "www", "203.0.113.1"))
//!     .await?;
//!
//! // Remove a DNS record
//! dns.delete_record("", "www").await?;
//! ```

pub mod dns;
pub mod error;

pub use dns::{CloudflareDns, DnsConfig};
pub use error::{CloudflareError, Result};
