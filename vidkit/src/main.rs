use anyhow::Result;
use clap::Parser;

mod cli;
mod media;

fn main() -> Result<()> {
    init_tracing();
    cli::Args::parse().run()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
