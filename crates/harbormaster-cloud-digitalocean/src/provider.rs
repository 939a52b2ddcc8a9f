//! DigitalOcean provider implementation

use crate::api::{DropletAction, DropletEnvelope};
use crate::error::Result;
use harbormaster_cloud::{
    ApiRequest, Credentials, Event, HttpTransport, Locator, NodeSnapshot, Observer, PollPolicy,
    Sleeper, TokioSleeper, TracingObserver, Transport, fetch_json,
};
use std::sync::Arc;
use std::time::Duration;

const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2/";

/// Page size used when walking the droplet listing
pub const NODE_PAGE_SIZE: u32 = 10;

/// Waits used while driving asynchronous droplet operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Status checks while waiting for `off` and `active`
    pub status_poll: PollPolicy,
    /// Pause after a forced power-off
    pub power_off_settle: Duration,
    /// `locked` checks while a resize is in progress
    pub lock_poll: PollPolicy,
    /// Pause before re-reading a freshly created droplet
    pub create_propagation: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            // first check plus ten retries
            status_poll: PollPolicy::bounded(Duration::from_secs(3), 11),
            power_off_settle: Duration::from_secs(5),
            lock_poll: PollPolicy::unbounded(Duration::from_secs(20)),
            create_propagation: Duration::from_secs(5),
        }
    }
}

/// DigitalOcean provider
///
/// Every lookup goes to the API; nothing is cached between calls.
#[derive(Clone)]
pub struct DigitalOceanProvider {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) locator: Locator,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) observer: Arc<dyn Observer>,
    pub(crate) timings: Timings,
}

impl DigitalOceanProvider {
    /// Provider talking to the public API with a personal access token
    pub fn new(api_key: impl Into<String>) -> Self {
        let transport = HttpTransport::new(DIGITALOCEAN_API_BASE, Credentials::Bearer(api_key.into()));
        Self::with_transport(Arc::new(transport))
    }

    /// Provider on top of an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            locator: Locator::new(transport.clone()),
            transport,
            sleeper: Arc::new(TokioSleeper),
            observer: Arc::new(TracingObserver),
            timings: Timings::default(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Current state of a droplet by id
    pub async fn fetch_node(&self, id: u64) -> Result<NodeSnapshot> {
        let request = ApiRequest::get(format!("droplets/{}", id));
        let envelope: DropletEnvelope = fetch_json(self.transport.as_ref(), &request).await?;
        Ok(envelope.droplet.into())
    }

    /// Issue a droplet action without waiting for it to complete
    pub async fn issue_action(&self, id: u64, action: &DropletAction) -> Result<()> {
        let request = ApiRequest::post(format!("droplets/{}/actions", id), action)?;
        self.transport
            .send(&request)
            .await?
            .error_for_status(&request)?;

        self.observer.on_event(&Event::ActionIssued {
            node_id: id,
            action: action.name(),
        });
        Ok(())
    }
}
