//! DigitalOcean API v2 wire types
//!
//! Request bodies and response envelopes, plus their conversion into the
//! provider-agnostic resource model.

use harbormaster_cloud::{
    CapacityGb, DnsRecord, NetworkAddress, NodeSnapshot, NodeSpec, NodeStatus, Page, PageCursor,
    PageEnvelope,
};
use serde::{Deserialize, Serialize};

/// Droplet as returned by `GET droplets` and `GET droplets/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDroplet {
    pub id: u64,
    pub name: String,
    /// Memory in MiB
    pub memory: u64,
    pub status: NodeStatus,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub networks: ApiNetworks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiNetworks {
    #[serde(default)]
    pub v4: Vec<NetworkAddress>,
}

impl From<ApiDroplet> for NodeSnapshot {
    fn from(droplet: ApiDroplet) -> Self {
        Self {
            id: droplet.id,
            name: droplet.name,
            status: droplet.status,
            capacity: CapacityGb::from_memory_mb(droplet.memory),
            locked: droplet.locked,
            networks: droplet.networks.v4,
        }
    }
}

/// `GET droplets` page
///
/// The droplet listing is walked with a fixed page size, so a short page is
/// the last one.
#[derive(Debug, Deserialize)]
pub struct DropletsPage {
    #[serde(default)]
    pub droplets: Vec<ApiDroplet>,
}

impl PageEnvelope for DropletsPage {
    type Item = NodeSnapshot;

    fn into_page(self, cursor: &PageCursor) -> Page<NodeSnapshot> {
        let items = self.droplets.into_iter().map(NodeSnapshot::from).collect();
        Page::sized(items, cursor)
    }
}

/// `GET droplets/{id}`
#[derive(Debug, Deserialize)]
pub struct DropletEnvelope {
    pub droplet: ApiDroplet,
}

/// `POST droplets` body
#[derive(Debug, Serialize)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&NodeSpec> for CreateDropletRequest {
    fn from(spec: &NodeSpec) -> Self {
        Self {
            name: spec.name.clone(),
            region: spec.region.clone(),
            size: spec.capacity.slug(),
            image: spec.image.clone(),
            ssh_keys: spec.ssh_key.iter().cloned().collect(),
            tags: spec.tag.iter().cloned().collect(),
        }
    }
}

/// `POST droplets/{id}/actions` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropletAction {
    Shutdown,
    PowerOff,
    PowerOn,
    Resize { size: String },
}

impl DropletAction {
    pub fn resize(capacity: CapacityGb) -> Self {
        DropletAction::Resize {
            size: capacity.slug(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DropletAction::Shutdown => "shutdown",
            DropletAction::PowerOff => "power_off",
            DropletAction::PowerOn => "power_on",
            DropletAction::Resize { .. } => "resize",
        }
    }
}

/// Domain record as returned by `GET domains/{d}/records`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDomainRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(default)]
    pub data: String,
}

impl From<ApiDomainRecord> for DnsRecord {
    fn from(record: ApiDomainRecord) -> Self {
        Self {
            id: record.id.to_string(),
            record_type: record.record_type,
            name: record.name,
            content: record.data,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// `GET domains/{d}/records` page; more pages follow while `links.pages.next` is set
#[derive(Debug, Deserialize)]
pub struct DomainRecordsPage {
    #[serde(default)]
    pub domain_records: Vec<ApiDomainRecord>,
    #[serde(default)]
    pub links: Links,
}

impl PageEnvelope for DomainRecordsPage {
    type Item = DnsRecord;

    fn into_page(self, _cursor: &PageCursor) -> Page<DnsRecord> {
        let has_more = self
            .links
            .pages
            .next
            .as_deref()
            .is_some_and(|next| !next.is_empty());
        Page {
            items: self.domain_records.into_iter().map(DnsRecord::from).collect(),
            has_more,
        }
    }
}

/// `POST domains/{d}/records` body
#[derive(Debug, Serialize)]
pub struct CreateDomainRecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub data: &'a str,
}

/// `GET floating_ips/{ip}`
#[derive(Debug, Deserialize)]
pub struct FloatingIpEnvelope {
    pub floating_ip: ApiFloatingIp,
}

#[derive(Debug, Deserialize)]
pub struct ApiFloatingIp {
    pub ip: String,
    /// `null` while unassigned
    #[serde(default)]
    pub droplet: Option<DropletRef>,
}

#[derive(Debug, Deserialize)]
pub struct DropletRef {
    pub id: u64,
}

/// `POST floating_ips/{ip}/actions` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FloatingIpAction {
    Assign { droplet_id: u64 },
}
