use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::Path;
use anyhow::Result;

mod cli;
mod io;
mod learning;

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

    info!("Running Bayesian learning cycle");
    let trajectories = learning::bayesian_learning(&args)?;

    match &args.out {
        Some(out) => {
            let mut writer = io::TrajectoryWriter::from_path(Path::new(out))
                .map_err(|e| anyhow::anyhow!("Could not create output file: {} ({})", out, e))?;
            writer.write_header()?;
            for (prior, steps) in trajectories.iter() {
                writer.write_trajectory(prior, steps)?;
            }
            writer.flush()?;
            info!("Wrote trajectories to {}", out);
        }
        None => {
            let mut writer = io::TrajectoryWriter::new(std::io::stdout().lock());
            writer.write_header()?;
            for (prior, steps) in trajectories.iter() {
                writer.write_trajectory(prior, steps)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
