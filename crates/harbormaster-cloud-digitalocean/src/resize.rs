//! Droplet resize state machine
//!
//! ```text
//! Running ─shutdown─▶ ShuttingDown ─off / power_off─▶ PoweredOff
//!    ─resize─▶ Resizing ─unlocked, power_on─▶ StartingUp ─active─▶ Active
//! ```
//!
//! A droplet must be off before it can be resized. A graceful shutdown that
//! does not reach `off` within the status budget is escalated to a forced
//! power-off. The resize itself is tracked through the `locked` flag, which
//! the provider clears once the new size is applied; that wait has no budget.

use crate::api::DropletAction;
use crate::error::{DigitalOceanError, Result};
use crate::provider::DigitalOceanProvider;
use harbormaster_cloud::{
    CapacityGb, CloudError, Event, NodeSnapshot, NodeStatus, Outcome, PollOutcome, PollPolicy,
    Poller, ResourceKind,
};

/// Stage of an in-flight resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    Running,
    ShuttingDown,
    PoweredOff,
    Resizing,
    StartingUp,
    Active,
}

impl std::fmt::Display for ResizePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizePhase::Running => write!(f, "running"),
            ResizePhase::ShuttingDown => write!(f, "shutting down"),
            ResizePhase::PoweredOff => write!(f, "powered off"),
            ResizePhase::Resizing => write!(f, "resizing"),
            ResizePhase::StartingUp => write!(f, "starting up"),
            ResizePhase::Active => write!(f, "active"),
        }
    }
}

impl DigitalOceanProvider {
    /// Resize the named droplet to `target`
    ///
    /// Fails with [`DigitalOceanError::NodeNotFound`] when no droplet has that
    /// name. A droplet already at the target size is left untouched.
    pub async fn resize_node(&self, name: &str, target: CapacityGb) -> Result<Outcome> {
        let node = self
            .find_node(name)
            .await?
            .ok_or_else(|| DigitalOceanError::NodeNotFound(name.to_string()))?;
        self.resize_snapshot(&node, target).await
    }

    /// Resize a droplet that has already been located
    pub async fn resize_snapshot(&self, node: &NodeSnapshot, target: CapacityGb) -> Result<Outcome> {
        if target.0 == 0 {
            return Err(DigitalOceanError::InvalidSize(format!(
                "cannot resize '{}' to {}",
                node.name, target
            )));
        }

        if node.capacity == target {
            self.observer.on_event(&Event::Decided {
                kind: ResourceKind::Node,
                name: &node.name,
                decision: "no-op",
            });
            return Ok(Outcome::Unchanged);
        }

        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::Node,
            name: &node.name,
            decision: "update",
        });
        tracing::info!("Resizing {} from {} to {}", node.name, node.capacity, target);

        let mut phase = ResizePhase::Running;
        while phase != ResizePhase::Active {
            let next = self.advance(node.id, phase, target).await?;
            tracing::debug!("droplet {}: {} -> {}", node.id, phase, next);
            phase = next;
        }

        Ok(Outcome::Changed)
    }

    async fn advance(&self, id: u64, phase: ResizePhase, target: CapacityGb) -> Result<ResizePhase> {
        let next = match phase {
            ResizePhase::Running => {
                self.issue_action(id, &DropletAction::Shutdown).await?;
                ResizePhase::ShuttingDown
            }
            ResizePhase::ShuttingDown => {
                let outcome = self
                    .wait_for_status(id, NodeStatus::Off, self.timings.status_poll)
                    .await?;
                if !outcome.is_reached() {
                    self.observer.on_event(&Event::Escalated {
                        node_id: id,
                        from: DropletAction::Shutdown.name(),
                        to: DropletAction::PowerOff.name(),
                    });
                    self.issue_action(id, &DropletAction::PowerOff).await?;
                    self.sleeper.sleep(self.timings.power_off_settle).await;
                }
                ResizePhase::PoweredOff
            }
            ResizePhase::PoweredOff => {
                self.issue_action(id, &DropletAction::resize(target)).await?;
                ResizePhase::Resizing
            }
            ResizePhase::Resizing => {
                self.wait_for_unlock(id).await?;
                self.issue_action(id, &DropletAction::PowerOn).await?;
                ResizePhase::StartingUp
            }
            ResizePhase::StartingUp => {
                let outcome = self
                    .wait_for_status(id, NodeStatus::Active, self.timings.status_poll)
                    .await?;
                if let PollOutcome::Exhausted { attempts } = outcome {
                    return Err(CloudError::Timeout {
                        target: format!("droplet {} to become active", id),
                        attempts,
                    }
                    .into());
                }
                ResizePhase::Active
            }
            ResizePhase::Active => ResizePhase::Active,
        };
        Ok(next)
    }

    /// Poll the droplet until it reports `status`
    pub async fn wait_for_status(
        &self,
        id: u64,
        status: NodeStatus,
        policy: PollPolicy,
    ) -> Result<PollOutcome> {
        let target = format!("droplet {} status {}", id, status);
        let outcome = Poller::new(self.sleeper.as_ref(), self.observer.as_ref())
            .until(&target, policy, move || async move {
                let node = self.fetch_node(id).await?;
                Ok::<_, CloudError>(node.status == status)
            })
            .await?;
        Ok(outcome)
    }

    async fn wait_for_unlock(&self, id: u64) -> Result<()> {
        let target = format!("droplet {} unlock", id);
        Poller::new(self.sleeper.as_ref(), self.observer.as_ref())
            .until(&target, self.timings.lock_poll, move || async move {
                let node = self.fetch_node(id).await?;
                Ok::<_, CloudError>(!node.locked)
            })
            .await?;
        Ok(())
    }
}
