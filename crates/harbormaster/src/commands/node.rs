use crate::NodeCommands;
use crate::output::write_node;
use colored::Colorize;
use harbormaster_cloud::{CapacityGb, NodeSpec, Outcome};
use harbormaster_config::Config;

pub async fn handle(config: &Config, command: NodeCommands) -> anyhow::Result<()> {
    let provider = super::digital_ocean(config)?;

    match command {
        NodeCommands::Create {
            name,
            region,
            size,
            image,
            ssh_key,
            tag,
            output,
        } => {
            println!(
                "{}",
                format!("Ensuring droplet '{}' ({}GB, {})...", name, size, region).yellow()
            );
            let spec = NodeSpec {
                name,
                region,
                capacity: CapacityGb(size),
                image,
                ssh_key,
                tag,
            };
            let (node, created) = provider.ensure_node_exists(&spec).await?;

            let outcome = if created {
                Outcome::Changed
            } else {
                Outcome::Unchanged
            };
            super::report(outcome, &format!("droplet '{}' (id {})", node.name, node.id));
            if let Some(ip) = node.public_ip() {
                println!("  public IP: {}", ip.cyan());
            }

            if let Some(path) = output {
                write_node(&path, &node)?;
                println!("  written to {}", path.display());
            }
        }
        NodeCommands::Delete { name } => {
            println!("{}", format!("Deleting droplet '{}'...", name).yellow());
            let outcome = provider.delete_node(&name).await?;
            super::report(outcome, &format!("droplet '{}' removal", name));
        }
        NodeCommands::Resize { name, size, output } => {
            let target = CapacityGb(size);
            println!(
                "{}",
                format!("Resizing droplet '{}' to {}...", name, target).yellow()
            );
            let outcome = provider.resize_node(&name, target).await?;
            super::report(outcome, &format!("droplet '{}' at {}", name, target));

            if let Some(path) = output {
                let node = provider
                    .find_node(&name)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("droplet '{}' disappeared after resize", name))?;
                write_node(&path, &node)?;
                println!("  written to {}", path.display());
            }
        }
    }

    Ok(())
}
