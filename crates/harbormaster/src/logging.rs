use tracing_subscriber::EnvFilter;

const CRATES: [&str; 5] = [
    "harbormaster",
    "harbormaster_cloud",
    "harbormaster_cloud_digitalocean",
    "harbormaster_cloud_cloudflare",
    "harbormaster_config",
];

/// Filter directives for a `-v` count. Only our own crates get louder.
pub fn directives(verbose: u8) -> String {
    let level = match verbose {
        0 => return "warn".to_string(),
        1 => "debug",
        _ => "trace",
    };
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    directives.join(",")
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
