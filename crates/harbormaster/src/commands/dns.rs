use crate::{DnsCommands, DnsProviderKind};
use colored::Colorize;
use harbormaster_cloud::{DnsProvider, DnsRecordSpec};
use harbormaster_config::Config;

fn provider_for(config: &Config, kind: DnsProviderKind) -> anyhow::Result<Box<dyn DnsProvider>> {
    let provider: Box<dyn DnsProvider> = match kind {
        DnsProviderKind::Digitalocean => Box::new(super::digital_ocean(config)?),
        DnsProviderKind::Cloudflare => Box::new(super::cloudflare(config)?),
    };
    Ok(provider)
}

/// Human-readable record name, e.g. `www.example.com` or just `www`
fn qualified(name: &str, domain: &str) -> String {
    if domain.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, domain)
    }
}

pub async fn handle(config: &Config, command: DnsCommands) -> anyhow::Result<()> {
    match command {
        DnsCommands::Assign {
            provider,
            domain,
            name,
            record_type,
            value,
        } => {
            let dns = provider_for(config, provider)?;
            let domain = domain.unwrap_or_default();
            let fqdn = qualified(&name, &domain);
            println!(
                "{}",
                format!(
                    "Ensuring {} record {} -> {} on {}...",
                    record_type,
                    fqdn,
                    value,
                    dns.display_name()
                )
                .yellow()
            );

            let spec = DnsRecordSpec::new(domain, record_type, name, value);
            let outcome = dns.ensure_record(&spec).await?;
            super::report(outcome, &format!("DNS record {}", fqdn));
        }
        DnsCommands::Delete {
            provider,
            domain,
            name,
        } => {
            let dns = provider_for(config, provider)?;
            let domain = domain.unwrap_or_default();
            let fqdn = qualified(&name, &domain);
            println!(
                "{}",
                format!("Deleting DNS record {} on {}...", fqdn, dns.display_name()).yellow()
            );

            let outcome = dns.delete_record(&domain, &name).await?;
            super::report(outcome, &format!("DNS record {} removal", fqdn));
        }
    }

    Ok(())
}
