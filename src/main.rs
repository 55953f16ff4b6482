use chat_lifecycle::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay(args) => cli::replay::run(args).await,
        Command::Inspect(args) => cli::inspect::run(args).await,
    }
}
