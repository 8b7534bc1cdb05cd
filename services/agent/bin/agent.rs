//! Main Entrypoint for the Ellie Agent Worker
//!
//! 1. Parse the mode, injecting `dev` when none is given.
//! 2. Load configuration; a missing GROQ_API_KEY stops the process here.
//! 3. Initialize logging.
//! 4. Hand over to the worker for the selected mode.

use anyhow::Context;
use ellie_agent::{cli::Cli, config::Config, worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_with_default_mode();

    let config = Config::from_env().context("Failed to load configuration")?;
    worker::init_logging(cli.mode, &config);

    worker::run(cli.mode, config).await
}
