use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::Path;
use anyhow::Result;

mod cli;
mod io;
mod planning;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    match args.verbosity {
        cli::LogLevel::Silent => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        cli::LogLevel::Normal => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
        }
        cli::LogLevel::Verbose => {
            env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();
        }
    }

    info!("Running sample size planning");
    let reports = planning::sample_size(&args)?;
    io::write_reports_to(args.out.as_deref().map(Path::new), &reports)?;
    if let Some(out) = &args.out {
        info!("Wrote planning results to {}", out);
    }
    Ok(())
}
