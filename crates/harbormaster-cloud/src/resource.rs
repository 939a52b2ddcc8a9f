//! Desired specs and provider snapshots

use serde::{Deserialize, Serialize};

/// Node capacity in whole gigabytes of memory
///
/// Providers express capacity as a size slug; conversion happens only when a
/// request body is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityGb(pub u32);

impl CapacityGb {
    /// Derive capacity from a memory figure in MiB
    pub fn from_memory_mb(memory_mb: u64) -> Self {
        Self((memory_mb / 1024) as u32)
    }

    /// Size slug used in provider request bodies, e.g. `"4gb"`
    pub fn slug(self) -> String {
        format!("{}gb", self.0)
    }
}

impl std::fmt::Display for CapacityGb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}GB", self.0)
    }
}

/// Kind of resource being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Node,
    DnsRecord,
    FloatingIp,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Node => write!(f, "node"),
            ResourceKind::DnsRecord => write!(f, "dns-record"),
            ResourceKind::FloatingIp => write!(f, "floating-ip"),
        }
    }
}

/// Anything the provider identifies by an id
pub trait RemoteResource {
    fn remote_id(&self) -> String;
}

/// Power status reported for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::New => write!(f, "new"),
            NodeStatus::Active => write!(f, "active"),
            NodeStatus::Off => write!(f, "off"),
            NodeStatus::Archive => write!(f, "archive"),
            NodeStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One address attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub ip_address: String,
    #[serde(default)]
    pub netmask: String,
    #[serde(default)]
    pub gateway: String,
    /// "public" or "private"
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Provider view of a compute node at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: u64,
    pub name: String,
    pub status: NodeStatus,
    pub capacity: CapacityGb,
    pub locked: bool,
    pub networks: Vec<NetworkAddress>,
}

impl NodeSnapshot {
    /// First public address, if the provider has assigned one yet
    pub fn public_ip(&self) -> Option<&str> {
        self.networks
            .iter()
            .find(|n| n.kind == "public")
            .map(|n| n.ip_address.as_str())
    }
}

impl RemoteResource for NodeSnapshot {
    fn remote_id(&self) -> String {
        self.id.to_string()
    }
}

/// Desired compute node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: String,
    pub region: String,
    pub capacity: CapacityGb,
    pub image: String,
    pub ssh_key: Option<String>,
    pub tag: Option<String>,
}

/// Provider view of a DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub record_type: String,
    pub name: String,
    pub content: String,
}

impl RemoteResource for DnsRecord {
    fn remote_id(&self) -> String {
        self.id.clone()
    }
}

/// Desired DNS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordSpec {
    /// Parent domain, e.g. "example.com"
    pub domain: String,
    /// Record type, e.g. "A" or "AAAA"
    pub record_type: String,
    /// Subdomain label, e.g. "www"
    pub name: String,
    pub value: String,
}

impl DnsRecordSpec {
    /// The record type is stored upper-cased, e.g. `"aaaa"` becomes `"AAAA"`
    pub fn new(
        domain: impl Into<String>,
        record_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_type: record_type.into().to_uppercase(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Current binding of a floating IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIpBinding {
    pub ip: String,
    pub node_id: Option<u64>,
}

impl RemoteResource for FloatingIpBinding {
    fn remote_id(&self) -> String {
        self.ip.clone()
    }
}

/// Desired floating IP binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingIpSpec {
    pub ip: String,
    pub node_id: u64,
}

/// Case-insensitive name comparison used by every locator predicate
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_from_memory_and_slug() {
        assert_eq!(CapacityGb::from_memory_mb(4096), CapacityGb(4));
        assert_eq!(CapacityGb::from_memory_mb(512), CapacityGb(0));
        assert_eq!(CapacityGb(8).slug(), "8gb");
        assert_eq!(CapacityGb(2).to_string(), "2GB");
    }

    #[test]
    fn test_node_status_unknown_values() {
        let status: NodeStatus = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(status, NodeStatus::Off);

        let status: NodeStatus = serde_json::from_str("\"rebooting\"").unwrap();
        assert_eq!(status, NodeStatus::Unknown);
    }

    #[test]
    fn test_public_ip() {
        let node = NodeSnapshot {
            id: 1,
            name: "web-1".to_string(),
            status: NodeStatus::Active,
            capacity: CapacityGb(1),
            locked: false,
            networks: vec![
                NetworkAddress {
                    ip_address: "10.0.0.2".to_string(),
                    netmask: String::new(),
                    gateway: String::new(),
                    kind: "private".to_string(),
                },
                NetworkAddress {
                    ip_address: "203.0.113.4".to_string(),
                    netmask: String::new(),
                    gateway: String::new(),
                    kind: "public".to_string(),
                },
            ],
        };
        assert_eq!(node.public_ip(), Some("203.0.113.4"));
    }

    #[test]
    fn test_names_match_ignores_case() {
        assert!(names_match("WWW", "www"));
        assert!(!names_match("www", "api"));
    }

    #[test]
    fn test_dns_spec_uppercases_record_type() {
        let spec = DnsRecordSpec::new("Example.com", "aaaa", "WWW", "2001:db8::7");
        assert_eq!(spec.record_type, "AAAA");
        // everything else is kept as given
        assert_eq!(spec.domain, "Example.com");
        assert_eq!(spec.name, "WWW");
    }
}
