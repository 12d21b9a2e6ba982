use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chatbridge::connector::api::http;
use chatbridge::connector::parse_temperature;
use chatbridge::{Commands, CompletionConfig, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "chatbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Chat-completions endpoint URL (overrides API_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Sampling temperature (overrides TEMPERATURE)
    #[arg(long, global = true, value_parser = parse_temperature_arg)]
    temperature: Option<f32>,

    /// Model to start the session with
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Answer locally instead of calling the completion endpoint
    #[arg(long, global = true)]
    mock_completions: bool,

    #[command(subcommand)]
    command: Commands,
}

fn parse_temperature_arg(raw: &str) -> Result<f32, String> {
    parse_temperature(raw).ok_or_else(|| format!("must be a non-negative number, got '{raw}'"))
}

impl Cli {
    fn completion_config(&self) -> CompletionConfig {
        let mut config = CompletionConfig::from_env();

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }

        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }

        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        completion: cli.completion_config(),
        mock_completions: cli.mock_completions,
        initial_model: cli.model.clone(),
    })
    .await?;

    match cli.command {
        Commands::Serve { port, public } => {
            let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
            let addr = SocketAddr::from((host, port));
            http::serve(container.session().clone(), container.renderer(), addr).await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
