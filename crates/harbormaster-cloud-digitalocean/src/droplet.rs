//! Droplet lifecycle: locate, create-if-absent, delete-if-present

use crate::api::{CreateDropletRequest, DropletsPage};
use crate::error::{DigitalOceanError, Result};
use crate::provider::{DigitalOceanProvider, NODE_PAGE_SIZE};
use harbormaster_cloud::{
    ApiRequest, Collection, Event, NodeSnapshot, NodeSpec, Outcome, ReconcileDecision,
    ResourceKind, names_match,
};

impl DigitalOceanProvider {
    /// Find a droplet by name, case-insensitively
    ///
    /// Walks the droplet listing page by page and stops at the first match.
    pub async fn find_node(&self, name: &str) -> Result<Option<NodeSnapshot>> {
        let collection = Collection::new("droplets").per_page(NODE_PAGE_SIZE);
        let node = self
            .locator
            .find::<DropletsPage, _>(collection, |node| names_match(&node.name, name))
            .await?;

        self.observer.on_event(&Event::Located {
            kind: ResourceKind::Node,
            name,
            found: node.is_some(),
        });
        Ok(node)
    }

    /// Create the droplet unless one with the same name already exists
    ///
    /// Returns the droplet and whether it was created. An existing droplet
    /// is returned as-is, even if its region, size or image differ.
    pub async fn ensure_node_exists(&self, spec: &NodeSpec) -> Result<(NodeSnapshot, bool)> {
        let existing = self.find_node(&spec.name).await?;
        let decision = ReconcileDecision::ensure(existing.as_ref(), spec, |_, _| true);
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::Node,
            name: &spec.name,
            decision: decision.label(),
        });

        if let Some(node) = existing {
            return Ok((node, false));
        }

        let request = ApiRequest::post("droplets", &CreateDropletRequest::from(spec))?;
        self.transport
            .send(&request)
            .await?
            .error_for_status(&request)?;

        // Addresses are assigned shortly after creation
        self.sleeper.sleep(self.timings.create_propagation).await;

        let node = self
            .find_node(&spec.name)
            .await?
            .ok_or_else(|| DigitalOceanError::NodeNotFound(spec.name.clone()))?;
        Ok((node, true))
    }

    /// Delete the droplet if it exists
    ///
    /// The API answers a successful delete with 204; anything else is an error.
    pub async fn delete_node(&self, name: &str) -> Result<Outcome> {
        let existing = self.find_node(name).await?;
        let decision = ReconcileDecision::<()>::remove(existing.as_ref());
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::Node,
            name,
            decision: decision.label(),
        });

        let ReconcileDecision::Delete(id) = decision else {
            return Ok(Outcome::Unchanged);
        };

        let request = ApiRequest::delete(format!("droplets/{}", id));
        self.transport
            .send(&request)
            .await?
            .expect_status(&request, 204)?;
        Ok(Outcome::Changed)
    }
}
