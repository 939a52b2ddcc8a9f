//! Canned API payloads and a provider wired to in-memory doubles

use crate::provider::DigitalOceanProvider;
use harbormaster_cloud::testing::{RecordingObserver, RecordingSleeper, ScriptedTransport};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub sleeper: Arc<RecordingSleeper>,
    pub observer: Arc<RecordingObserver>,
    pub provider: DigitalOceanProvider,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::default());
        let observer = Arc::new(RecordingObserver::default());
        let provider = DigitalOceanProvider::with_transport(transport.clone())
            .with_sleeper(sleeper.clone())
            .with_observer(observer.clone());

        Self {
            transport,
            sleeper,
            observer,
            provider,
        }
    }

    /// `type` of every action body posted to droplet `id`, in order
    pub fn action_types(&self, id: u64) -> Vec<String> {
        let path = format!("droplets/{}/actions", id);
        self.transport
            .requests()
            .into_iter()
            .filter(|r| r.path == path)
            .filter_map(|r| r.body)
            .filter_map(|b| b["type"].as_str().map(str::to_string))
            .collect()
    }
}

pub fn droplet(id: u64, name: &str, memory_mb: u64, status: &str, locked: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "memory": memory_mb,
        "status": status,
        "locked": locked,
        "networks": {
            "v4": [
                {"ip_address": "10.132.0.2", "netmask": "255.255.0.0", "gateway": "", "type": "private"},
                {"ip_address": "203.0.113.10", "netmask": "255.255.240.0", "gateway": "203.0.113.1", "type": "public"}
            ]
        }
    })
}

pub fn droplet_list(droplets: Vec<Value>) -> Value {
    json!({ "droplets": droplets, "links": {}, "meta": {"total": 0} })
}

pub fn droplet_by_id(id: u64, memory_mb: u64, status: &str, locked: bool) -> Value {
    json!({ "droplet": droplet(id, "web-1", memory_mb, status, locked) })
}
