mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use harbormaster_config::{Config, ConfigError};
use std::path::PathBuf;

/// Invalid invocation or configuration
const EXIT_INVALID: i32 = 1;
/// The provider operation failed
const EXIT_FAILED: i32 = 2;

#[derive(Parser)]
#[command(name = "harbormaster")]
#[command(about = "Idempotent droplet, floating IP and DNS reconciliation", long_about = None)]
struct Cli {
    /// Config file (default: ./harbormaster.json, then ~/.config/harbormaster/harbormaster.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Floating IP bindings
    #[command(subcommand)]
    FloatingIp(FloatingIpCommands),
    /// DNS records
    #[command(subcommand)]
    Dns(DnsCommands),
    /// Droplets
    #[command(subcommand)]
    Node(NodeCommands),
    /// Show version
    Version,
}

#[derive(Subcommand)]
pub(crate) enum FloatingIpCommands {
    /// Bind a floating IP to a droplet, moving it if bound elsewhere
    Assign {
        /// Floating IP address
        #[arg(long)]
        ip: String,
        /// Droplet id
        #[arg(long)]
        node: u64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DnsProviderKind {
    Digitalocean,
    Cloudflare,
}

#[derive(Subcommand)]
pub(crate) enum DnsCommands {
    /// Create a record, or leave it alone when it already matches
    Assign {
        #[arg(long, value_enum)]
        provider: DnsProviderKind,
        /// Parent domain (required for digitalocean)
        #[arg(long, required_if_eq("provider", "digitalocean"))]
        domain: Option<String>,
        /// Subdomain, e.g. www
        #[arg(long)]
        name: String,
        /// Record type
        #[arg(long = "type", default_value = "A")]
        record_type: String,
        /// Record value, e.g. an IP address
        #[arg(long)]
        value: String,
    },
    /// Delete a record if it exists
    Delete {
        #[arg(long, value_enum)]
        provider: DnsProviderKind,
        /// Parent domain (required for digitalocean)
        #[arg(long, required_if_eq("provider", "digitalocean"))]
        domain: Option<String>,
        /// Subdomain, e.g. www
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum NodeCommands {
    /// Create a droplet unless one with the same name exists
    Create {
        #[arg(long)]
        name: String,
        /// Region slug, e.g. nyc3
        #[arg(long)]
        region: String,
        /// Memory in GB
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: u32,
        /// Image slug, e.g. ubuntu-24-04-x64
        #[arg(long)]
        image: String,
        /// SSH key fingerprint or id
        #[arg(long)]
        ssh_key: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Write the droplet as JSON to this file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete a droplet if it exists
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Resize a droplet (powers it off and back on)
    Resize {
        #[arg(long)]
        name: String,
        /// Target memory in GB
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: u32,
        /// Write the resized droplet as JSON to this file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the error path too
            let code = if e.use_stderr() { EXIT_INVALID } else { 0 };
            e.print().ok();
            std::process::exit(code);
        }
    };

    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // version needs no config
    if matches!(cli.command, Commands::Version) {
        println!("harbormaster {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!("loaded configuration: {:?}", config);

    match cli.command {
        Commands::FloatingIp(command) => commands::floating_ip::handle(&config, command).await,
        Commands::Dns(command) => commands::dns::handle(&config, command).await,
        Commands::Node(command) => commands::node::handle(&config, command).await,
        Commands::Version => Ok(()),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<ConfigError>()) {
        EXIT_INVALID
    } else {
        EXIT_FAILED
    }
}
