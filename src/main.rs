use clap::Parser;
use codao::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codao=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Serve { host, port }) => {
            let config = cli.load_config()?;
            codao::cli::serve::run(config, host.clone(), *port).await?;
        }
        Some(Commands::Slugify { text }) => {
            let stdout = std::io::stdout();
            codao::cli::slugify::run(text, &mut stdout.lock())?;
        }
        Some(Commands::CheckDb) => {
            let config = cli.load_config()?;
            codao::cli::check_db::run(&config).await?;
        }
        None => {
            // No subcommand provided, print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
