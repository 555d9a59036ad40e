// src/bin/cli.rs
use color_eyre::eyre::{self, eyre};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use ac_track::cli;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let params = cli::parse(std::env::args().skip(1)).map_err(|e| eyre!("{e}"))?;

    let level = if params.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    cli::run(&params).map_err(|e| eyre!("{e}"))
}
