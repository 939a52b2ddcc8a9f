use crate::FloatingIpCommands;
use colored::Colorize;
use harbormaster_cloud::FloatingIpSpec;
use harbormaster_config::Config;

pub async fn handle(config: &Config, command: FloatingIpCommands) -> anyhow::Result<()> {
    let provider = super::digital_ocean(config)?;

    match command {
        FloatingIpCommands::Assign { ip, node } => {
            println!(
                "{}",
                format!("Binding floating IP {} to droplet {}...", ip, node).yellow()
            );
            let outcome = provider
                .ensure_binding(&FloatingIpSpec { ip: ip.clone(), node_id: node })
                .await?;
            super::report(outcome, &format!("floating IP {} -> {}", ip, node));
        }
    }

    Ok(())
}
