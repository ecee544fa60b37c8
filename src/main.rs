use clap::Parser;
use stordiff::config::{Aliases, Cli, Command, OutputConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = OutputConfig::from(&cli);
    let aliases = Aliases::load(cli.aliases.as_deref())?;

    match cli.command {
        Command::Diff {
            first,
            second,
            recursive,
        } => stordiff::commands::diff::run(&first, &second, recursive, &aliases, &output).await,
        Command::Mb { targets } => stordiff::commands::mb::run(&targets, &aliases, &output).await,
    }
}
