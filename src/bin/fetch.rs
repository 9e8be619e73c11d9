use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use wikiwrapper::{Config, GameParams, WikiService};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Resource {
    Locations,
    Connections,
    Authors,
    Maps,
    Vms,
    Images,
}

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Run one resource query against the configured wiki and print the JSON")]
struct Args {
    /// Resource to fetch
    #[arg(value_enum)]
    resource: Resource,

    /// Game code, e.g. 2kki
    #[arg(short, long)]
    game: String,

    /// Protagonist code for games with several
    #[arg(short, long)]
    protag: Option<String>,

    /// Location title (maps only)
    #[arg(short, long)]
    location: Option<String>,

    /// Continuation token from a previous page
    #[arg(short = 'k', long)]
    continue_key: Option<String>,

    /// Single-line output
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let service = WikiService::from_config(&config).context("Failed to set up wiki access")?;

    let mut params = GameParams::new(args.game.as_str());
    if let Some(protag) = &args.protag {
        params = params.with_protagonist(protag.as_str());
    }
    if let Some(key) = &args.continue_key {
        params = params.with_continue_key(key.as_str());
    }

    match args.resource {
        Resource::Locations => print(&service.locations(&params).await?, args.compact),
        Resource::Connections => print(&service.connections(&params).await?, args.compact),
        Resource::Authors => print(&service.authors(&params.game).await?, args.compact),
        Resource::Maps => {
            let location = args
                .location
                .as_deref()
                .context("--location is required for maps")?;
            print(&service.maps(&params.game, location).await?, args.compact)
        }
        Resource::Vms => print(&service.vending_machines(&params.game).await?, args.compact),
        Resource::Images => print(&service.images(&params).await?, args.compact),
    }
}

fn print<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}
