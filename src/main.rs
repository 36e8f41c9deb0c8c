use clap::Parser;
use hedge_desk::cli::{Cli, Commands};
use hedge_desk::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    // Initialize telemetry
    let _telemetry = hedge_desk::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Greeks(args) => args.execute().await?,
        Commands::Risk(args) => args.execute(&config.risk).await?,
        Commands::Hedge(args) => args.execute(&config.hedging).await?,
        Commands::Route(args) => args.execute(&config).await?,
        Commands::Backtest(args) => {
            tracing::info!("Starting backtest");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
