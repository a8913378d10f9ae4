use clap::Parser;
use studyhelper_core::{Config, StudyHelper};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod render;

/// Launches the interactive reminder console. Type `help` once it is running.
#[derive(Parser)]
#[command(name = "studyhelper", version, about = "Study Helper reminders")]
struct Cli {}

#[tokio::main]
async fn main() {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default configuration");
        Config::default()
    });
    let app = StudyHelper::from_config(&config);

    console::run(&app, &config).await;
}
