//! DNS provider trait definition

use crate::decision::Outcome;
use crate::error::Result;
use crate::resource::{DnsRecord, DnsRecordSpec};
use async_trait::async_trait;

/// DNS record reconciliation shared by every provider
///
/// Implementations locate records by subdomain, case-insensitively, and never
/// issue a mutating request when the remote record already matches.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Returns the provider name (e.g., "digitalocean", "cloudflare")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Locate a record by subdomain
    ///
    /// `domain` is ignored by providers whose records are scoped by zone.
    async fn find_record(&self, domain: &str, subdomain: &str) -> Result<Option<DnsRecord>>;

    /// Make the remote record match `spec`
    async fn ensure_record(&self, spec: &DnsRecordSpec) -> Result<Outcome>;

    /// Remove the record if it exists
    async fn delete_record(&self, domain: &str, subdomain: &str) -> Result<Outcome>;
}
