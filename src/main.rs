use anyhow::{Context, Result};
use clap::Parser;
use kiwi::build::build_site;
use kiwi::config::{Config, SortMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Simple static web-site generator.
///
/// Converts the .txt files of SOURCE into HTML pages in TARGET, wrapping each
/// one in a template. The template must contain a line holding only
/// @@CONTENTS where the page is inserted. @@TITLE, @@DATE and @@PAGE-NAV are
/// replaced with the page title, the date and links to the neighbouring
/// pages; @@NAME:"value" declares a tag that replaces every @@NAME.
#[derive(Parser)]
#[command(name = "kiwi", version, about, long_about)]
struct Cli {
    /// Source folder or file, defaults to the current directory
    source: Option<PathBuf>,

    /// Target folder, defaults to SOURCE/html
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// HTML file to use as template
    #[arg(short = 'm', long)]
    template: Option<PathBuf>,

    /// Displays processing details
    #[arg(short, long)]
    verbose: bool,

    /// Generates a contents (index.html) page
    #[arg(short, long)]
    contents: bool,

    /// Page order for the contents page and navigation
    #[arg(long, value_enum, default_value_t = SortMode::Unsorted)]
    sort: SortMode,

    /// Saves the options of this run to a JSON file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Replays the options saved in a JSON file; other options are ignored
    #[arg(long, value_name = "FILE", conflicts_with_all = ["source", "target", "template", "save"])]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                let mut config = Config::load(path)
                    .with_context(|| format!("Replaying configuration '{}'", path.display()))?;
                config.verbose |= self.verbose;
                Ok(config)
            }
            None => Ok(Config {
                source: self.source,
                target: self.target,
                template: self.template,
                verbose: self.verbose,
                contents: self.contents,
                sort: self.sort,
                save: self.save,
            }),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => exit(err),
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if config.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(err) = build_site(&config) {
        exit(err.into());
    }
}

fn exit(err: anyhow::Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(1);
}
