use log::{LevelFilter, error, info};
use std::{path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use htmlpub_lib::{
    PublishError, Publisher,
    config::Configuration,
    legacy::{publish_html_files, publish_html_folder},
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Html Publisher - Command Line Interface",
    long_about = "Publish a tree of rendered html pages as a deployable website"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// "TRACE", "DEBUG", "INFO", "WARN", "ERROR"
    #[clap(long, short, global = true)]
    log: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the pages described by a toml configuration file
    Publish {
        /// relative paths inside the configuration are resolved against its folder
        config: PathBuf,
    },
    /// Publish every html file of a folder keeping the folder layout
    Folder { input: PathBuf, output: PathBuf },
    /// Publish a list of html files of a folder
    Files {
        input: PathBuf,
        output: PathBuf,
        /// path relative to both folders, or `<input path>:<output path>`
        #[clap(required = true)]
        specs: Vec<String>,
    },
}

fn run(command: Command) -> Result<(), PublishError> {
    match command {
        Command::Publish { config } => {
            let config = Configuration::from_file(&config)?;
            let report = Publisher::new(config).publish()?;
            for catalog in report.catalogs {
                info!("Catalog written to {catalog:?}");
            }
        }
        Command::Folder { input, output } => {
            publish_html_folder(&input, &output)?;
        }
        Command::Files {
            input,
            output,
            specs,
        } => {
            publish_html_files(&input, &output, &specs)?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log.unwrap_or(LevelFilter::Info))
        .parse_default_env()
        .init();

    if let Err(e) = run(args.command) {
        error!("{e}");
        exit(1)
    }
}
