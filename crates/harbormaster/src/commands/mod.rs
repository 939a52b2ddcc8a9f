pub mod dns;
pub mod floating_ip;
pub mod node;

use colored::Colorize;
use harbormaster_cloud::Outcome;
use harbormaster_cloud_cloudflare::{CloudflareDns, DnsConfig};
use harbormaster_cloud_digitalocean::DigitalOceanProvider;
use harbormaster_config::Config;

pub(crate) fn digital_ocean(config: &Config) -> anyhow::Result<DigitalOceanProvider> {
    let section = config.digital_ocean()?;
    Ok(DigitalOceanProvider::new(section.api_key.clone()))
}

pub(crate) fn cloudflare(config: &Config) -> anyhow::Result<CloudflareDns> {
    let section = config.cloudflare()?;
    Ok(CloudflareDns::new(DnsConfig {
        api_key: section.api_key.clone(),
        email: section.email.clone(),
        zone_id: section.zone.clone(),
    })?)
}

pub(crate) fn report(outcome: Outcome, subject: &str) {
    println!();
    match outcome {
        Outcome::Changed => {
            println!("{}", format!("✓ {} applied", subject).green().bold());
        }
        Outcome::Unchanged => {
            println!("{}", format!("ℹ {} already correct", subject).dimmed());
        }
    }
}
