use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arborfs_lib::{AppConfig, Mount, Species};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the configured species (birch, spruce)
    #[arg(short, long)]
    species: Option<String>,

    /// Number of independent mounts to grow
    #[arg(short, long, default_value_t = 1)]
    mounts: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "arborfs=info,arborfs_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.mounts >= 1, "at least one mount is required");

    let mut config = match std::fs::read_to_string(&args.config) {
        Ok(content) => AppConfig::from_toml(&content)
            .with_context(|| format!("invalid config file {}", args.config))?,
        Err(_) => {
            tracing::warn!(path = %args.config, "config file not found, using defaults");
            AppConfig::default()
        }
    };
    if let Some(species) = &args.species {
        config.mount.species = species
            .parse::<Species>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    let mounts = (0..args.mounts)
        .map(|_| Mount::new(&config))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(
        mounts = mounts.len(),
        species = %config.mount.species,
        "arborfs growing; press ctrl-c to unmount"
    );

    let lifespan = config.mount.lifespan_years;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("ctrl-c received");
                break;
            }
            _ = tokio::time::sleep(tokio::time::Duration::from_millis(500)) => {
                if mounts.iter().all(|m| m.tree().year() >= lifespan) {
                    tracing::info!("all mounts reached their lifespan");
                    break;
                }
            }
        }
    }

    for (index, mount) in mounts.iter().enumerate() {
        mount.shutdown().await;
        let census = mount.tree().census();
        let root = mount.root();
        tracing::info!(
            mount = index,
            year = mount.tree().year(),
            branches = census.branches,
            leaves = census.leaves,
            depth = census.max_depth,
            root_entries = mount.read_dir(root).count(),
            cycles = mount.metrics().cycle_count(),
            "final census"
        );
    }

    Ok(())
}
