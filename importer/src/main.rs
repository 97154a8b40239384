mod cpe_dict;
mod cve;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "nvdsync", about = "NVD feed importer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import one or more vulnerability feed files.
    Cve(cve::ImportCveCommand),
    /// Import a platform match-dictionary feed file.
    CpeDictionary(cpe_dict::ImportCpeDictionaryCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    match Cli::parse().command {
        Command::Cve(command) => command.run().await,
        Command::CpeDictionary(command) => command.run().await,
    }
}
