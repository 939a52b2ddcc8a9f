//! Floating IP bindings

use crate::api::{FloatingIpAction, FloatingIpEnvelope};
use crate::error::Result;
use crate::provider::DigitalOceanProvider;
use harbormaster_cloud::{
    ApiRequest, Event, FloatingIpBinding, FloatingIpSpec, Outcome, ReconcileDecision, ResourceKind,
    fetch_json,
};

impl DigitalOceanProvider {
    /// Current binding of a floating IP
    pub async fn get_binding(&self, ip: &str) -> Result<FloatingIpBinding> {
        let request = ApiRequest::get(format!("floating_ips/{}", ip));
        let envelope: FloatingIpEnvelope = fetch_json(self.transport.as_ref(), &request).await?;

        Ok(FloatingIpBinding {
            ip: envelope.floating_ip.ip,
            node_id: envelope.floating_ip.droplet.map(|d| d.id),
        })
    }

    /// Bind the IP to `spec.node_id` unless it is already bound there
    ///
    /// Assignment moves the IP atomically, whichever droplet held it before.
    pub async fn ensure_binding(&self, spec: &FloatingIpSpec) -> Result<Outcome> {
        let binding = self.get_binding(&spec.ip).await?;
        let decision = ReconcileDecision::ensure(Some(&binding), spec, |current, spec| {
            current.node_id == Some(spec.node_id)
        });
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::FloatingIp,
            name: &spec.ip,
            decision: decision.label(),
        });

        if !decision.is_mutating() {
            return Ok(Outcome::Unchanged);
        }

        let action = FloatingIpAction::Assign {
            droplet_id: spec.node_id,
        };
        let request = ApiRequest::post(format!("floating_ips/{}/actions", spec.ip), &action)?;
        self.transport
            .send(&request)
            .await?
            .error_for_status(&request)?;
        Ok(Outcome::Changed)
    }
}
