mod cli;
mod render;
mod run;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use playground_taxonomy::Taxonomy;
use playground_trace::TraceCoordinator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::render::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    Taxonomy::init().context("failed to build opcode taxonomy")?;

    // Logs on stderr, snapshots on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let link = cli.link()?;
    let stdout = std::io::stdout();
    let renderer = Renderer::new(!cli.no_color && stdout.is_terminal());
    let coordinator = TraceCoordinator::from_config(cli.config());

    run::trace(&coordinator, &link, cli.to_end, &renderer, &mut stdout.lock()).await
}
