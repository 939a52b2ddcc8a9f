//! Cloudflare DNS API client
//!
//! Zone-scoped DNS record management authenticated with the account email
//! and global API key.

use crate::error::{CloudflareError, Result};
use async_trait::async_trait;
use harbormaster_cloud::{
    ApiRequest, Collection, Credentials, DnsProvider, DnsRecord, DnsRecordSpec, Event,
    HttpTransport, Locator, Observer, Outcome, Page, PageCursor, PageEnvelope, ReconcileDecision,
    ResourceKind, TracingObserver, Transport, names_match,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4/zones";

/// Credentials and zone for the DNS manager
#[derive(Clone)]
pub struct DnsConfig {
    pub api_key: String,
    pub email: String,
    pub zone_id: String,
}

impl std::fmt::Debug for DnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsConfig")
            .field("email", &self.email)
            .field("zone_id", &self.zone_id)
            .finish_non_exhaustive()
    }
}

/// Cloudflare DNS manager
#[derive(Clone)]
pub struct CloudflareDns {
    transport: Arc<dyn Transport>,
    locator: Locator,
    observer: Arc<dyn Observer>,
    zone_id: String,
}

impl CloudflareDns {
    /// Create a new DNS manager
    pub fn new(config: DnsConfig) -> Result<Self> {
        if config.zone_id.trim().is_empty() {
            return Err(CloudflareError::InvalidConfig(
                "zone id must not be empty".to_string(),
            ));
        }

        let transport = HttpTransport::new(
            format!("{}/{}/", CLOUDFLARE_API_BASE, config.zone_id),
            Credentials::EmailKey {
                email: config.email,
                key: config.api_key,
            },
        );
        Ok(Self::with_transport(Arc::new(transport), config.zone_id))
    }

    /// DNS manager on top of a transport already scoped to the zone
    pub fn with_transport(transport: Arc<dyn Transport>, zone_id: impl Into<String>) -> Self {
        Self {
            locator: Locator::new(transport.clone()),
            transport,
            observer: Arc::new(TracingObserver),
            zone_id: zone_id.into(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// Find a record whose name is `<subdomain>.<zone name>`, case-insensitively
    pub async fn find(&self, subdomain: &str) -> Result<Option<DnsRecord>> {
        let subdomain = subdomain.to_lowercase();
        let record = self
            .locator
            .find::<DnsRecordsPage, _>(Collection::new("dns_records"), |r| {
                names_match(&r.name, &format!("{}.{}", subdomain, r.zone_name))
            })
            .await?;

        self.observer.on_event(&Event::Located {
            kind: ResourceKind::DnsRecord,
            name: &subdomain,
            found: record.is_some(),
        });
        Ok(record.map(DnsRecord::from))
    }

    /// Create, replace or leave alone the record for `spec.name`
    ///
    /// A record is left alone only when both its type and content match.
    pub async fn ensure(&self, spec: &DnsRecordSpec) -> Result<Outcome> {
        let subdomain = spec.name.to_lowercase();
        let existing = self.find(&subdomain).await?;
        let decision = ReconcileDecision::ensure(existing.as_ref(), spec, |current, spec| {
            current.record_type == spec.record_type && current.content == spec.value
        });
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::DnsRecord,
            name: &subdomain,
            decision: decision.label(),
        });

        let body = RecordRequest {
            record_type: &spec.record_type,
            name: &subdomain,
            content: &spec.value,
        };
        let request = match decision {
            ReconcileDecision::Create(_) => ApiRequest::post("dns_records", &body)?,
            ReconcileDecision::UpdateNeeded(id, _) => {
                ApiRequest::put(format!("dns_records/{}", id), &body)?
            }
            _ => return Ok(Outcome::Unchanged),
        };

        self.execute(&request).await?;
        Ok(Outcome::Changed)
    }

    /// Remove the record for `subdomain` if it exists
    pub async fn remove(&self, subdomain: &str) -> Result<Outcome> {
        let subdomain = subdomain.to_lowercase();
        let existing = self.find(&subdomain).await?;
        let decision = ReconcileDecision::<()>::remove(existing.as_ref());
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::DnsRecord,
            name: &subdomain,
            decision: decision.label(),
        });

        let ReconcileDecision::Delete(id) = decision else {
            return Ok(Outcome::Unchanged);
        };

        self.execute(&ApiRequest::delete(format!("dns_records/{}", id)))
            .await?;
        Ok(Outcome::Changed)
    }

    /// Send a mutating request; both a 2xx status and `success: true` are required
    async fn execute(&self, request: &ApiRequest) -> Result<()> {
        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status(request)?;
        let envelope: ApiResponse<serde_json::Value> = response.json()?;
        envelope.check()
    }
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    fn name(&self) -> &str {
        "cloudflare"
    }

    fn display_name(&self) -> &str {
        "Cloudflare"
    }

    async fn find_record(
        &self,
        _domain: &str,
        subdomain: &str,
    ) -> harbormaster_cloud::Result<Option<DnsRecord>> {
        Ok(self.find(subdomain).await?)
    }

    async fn ensure_record(&self, spec: &DnsRecordSpec) -> harbormaster_cloud::Result<Outcome> {
        Ok(self.ensure(spec).await?)
    }

    async fn delete_record(
        &self,
        _domain: &str,
        subdomain: &str,
    ) -> harbormaster_cloud::Result<Outcome> {
        Ok(self.remove(subdomain).await?)
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[allow(dead_code)]
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl<T> ApiResponse<T> {
    fn check(self) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let (code, message) = self
            .errors
            .into_iter()
            .next()
            .map(|e| (e.code, e.message))
            .unwrap_or_else(|| (0, "Unknown error".to_string()));
        Err(CloudflareError::Api { code, message })
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiDnsRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    zone_name: String,
}

impl From<ApiDnsRecord> for DnsRecord {
    fn from(r: ApiDnsRecord) -> Self {
        Self {
            id: r.id,
            record_type: r.record_type,
            name: r.name,
            content: r.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: u32,
}

/// `GET dns_records` page; the listing reports its own page count
#[derive(Debug, Deserialize)]
struct DnsRecordsPage {
    #[serde(default)]
    result: Vec<ApiDnsRecord>,
    #[serde(default)]
    result_info: ResultInfo,
}

impl PageEnvelope for DnsRecordsPage {
    type Item = ApiDnsRecord;

    fn into_page(self, cursor: &PageCursor) -> Page<ApiDnsRecord> {
        Page {
            items: self.result,
            has_more: self.result_info.total_pages > cursor.page,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecordRequest<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
}
