use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    coursebook::logging::init().context("init logging")?;

    let cli = coursebook::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        coursebook::cli::Command::Export(args) => {
            coursebook::export::run(args).context("export")?;
        }
        coursebook::cli::Command::Check(args) => {
            coursebook::check::run(args).context("check")?;
        }
        coursebook::cli::Command::Search(args) => {
            coursebook::search::run(args).context("search")?;
        }
    }

    Ok(())
}
