use anyhow::Result;
use clap::Parser;

use mentor::{cli::Cli, runtime::Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let orchestrator = Orchestrator::new(cli)?;
    orchestrator.run().await
}
