use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wikiwrapper::server::HttpServer;
use wikiwrapper::{Config, GameRegistry, WikiService};

#[derive(Parser, Debug)]
#[command(name = "wikiwrapper", version)]
#[command(about = "Read-only JSON API over the dream game wiki")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Print the configured games
    Games,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.server.log_level.as_str()),
    )
    .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Games => print_games(&config),
    }
}

async fn run_server(config: Config) -> Result<()> {
    log::info!("Starting wikiwrapper v{}", env!("CARGO_PKG_VERSION"));

    let service = WikiService::from_config(&config).context("Failed to set up wiki access")?;
    let server = HttpServer::new(service, config.cors.clone());
    server.run(&config.bind_addr()).await?;

    Ok(())
}

fn print_games(config: &Config) -> Result<()> {
    let registry = GameRegistry::load(config.games.file.as_deref())?;

    for game in registry.iter() {
        let protagonists = if game.has_multiple_protagonists() {
            game.protagonist_codes().join(", ")
        } else {
            "-".to_string()
        };
        println!(
            "{:<12} {:<24} ns={:<5} authors={:<5} protags={}",
            game.code, game.name, game.namespace, game.authors, protagonists
        );
    }
    println!("\n{} games", registry.len());

    Ok(())
}
