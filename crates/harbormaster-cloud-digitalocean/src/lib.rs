//! DigitalOcean provider for Harbormaster
//!
//! Reconciles droplets, domain records and floating IPs against the
//! DigitalOcean API v2.
//!
//! # Features
//!
//! - Droplet create-if-absent and delete-if-present
//! - Droplet resize through shutdown, resize and power-on
//! - Domain records (implements [`harbormaster_cloud::DnsProvider`])
//! - Floating IP assignment
//!
//! # Example
//!
//! ```ignore
//! use harbormaster_cloud::CapacityGb;
//! use harbormaster_cloud_digitalocean::DigitalOceanProvider;
//!
//! let provider = DigitalOceanProvider::new(api_key);
//!
//! // Grow the droplet to 4GB; a droplet already at 4GB is left alone
//! let outcome = provider.resize_node("web-1", CapacityGb(4)).await?;
//! ```

pub mod api;
pub mod dns;
pub mod droplet;
pub mod error;
pub mod floating_ip;
pub mod provider;
pub mod resize;

#[cfg(test)]
mod fixtures;

pub use api::DropletAction;
pub use error::{DigitalOceanError, Result};
pub use provider::{DigitalOceanProvider, NODE_PAGE_SIZE, Timings};
pub use resize::ResizePhase;
