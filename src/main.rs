use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use sqp::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    // stdout carries the JSON output, logs go to stderr
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            EnvFilter::try_from_env("SQP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    cli.run(&mut std::io::stdout().lock()).await?;

    Ok(())
}
