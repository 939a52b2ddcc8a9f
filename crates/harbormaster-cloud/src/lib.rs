//! Harbormaster Cloud Core
//!
//! This crate holds the provider-agnostic half of Harbormaster: the HTTP
//! transport seam, paginated lookup, the polling driver and the reconcile
//! decision model. Provider crates build their reconcilers on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                Harbormaster CLI                  │
//! │        (node / dns / floating-ip commands)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               harbormaster-cloud                 │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   ReconcileDecision / Outcome / Observer  │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Locator    │  │    Poller    │            │
//! │  │ (pagination) │  │  (Sleeper)   │            │
//! │  └──────┬───────┘  └──────────────┘            │
//! │  ┌──────▼───────────────────────────────────┐   │
//! │  │        trait Transport (HttpTransport)    │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ digitalocean  │ │  cloudflare   │
//! │   provider    │ │   provider    │
//! └───────────────┘ └───────────────┘
//! ```

pub mod decision;
pub mod error;
pub mod http;
pub mod locator;
pub mod observer;
pub mod pagination;
pub mod poll;
pub mod provider;
pub mod resource;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports
pub use decision::{Outcome, ReconcileDecision};
pub use error::{CloudError, Result};
pub use http::{ApiRequest, ApiResponse, Credentials, HttpTransport, Method, Transport, fetch_json};
pub use locator::{Locator, find_first};
pub use observer::{Event, Observer, TracingObserver};
pub use pagination::{Collection, Page, PageCursor, PageEnvelope, paginate};
pub use poll::{PollOutcome, PollPolicy, PollState, Poller, Sleeper, TokioSleeper};
pub use provider::DnsProvider;
pub use resource::{
    CapacityGb, DnsRecord, DnsRecordSpec, FloatingIpBinding, FloatingIpSpec, NetworkAddress,
    NodeSnapshot, NodeSpec, NodeStatus, RemoteResource, ResourceKind, names_match,
};
