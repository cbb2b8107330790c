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
    comictrack::logging::init().context("init logging")?;

    let cli = comictrack::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        comictrack::cli::Command::Import(args) => {
            comictrack::import::run(args).context("import")?;
        }
        comictrack::cli::Command::List(args) => {
            comictrack::view::list(args).context("list")?;
        }
        comictrack::cli::Command::Show(args) => {
            comictrack::view::show(args).context("show")?;
        }
    }

    Ok(())
}
