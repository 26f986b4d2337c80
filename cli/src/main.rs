#[macro_use]
extern crate log;

use abstutil::Timer;
use anyhow::Result;
use structopt::StructOpt;

use blocks::{Config, Progress, Quiet};

#[derive(StructOpt)]
#[structopt(about = "Builds a CSV of vehicle blocks from GTFS")]
struct Args {
    /// The path to a JSON config file
    #[structopt(long, default_value = "config.json")]
    config_path: String,
    /// The day to report on, as YYYYMMDD. Overrides the config.
    #[structopt(long)]
    date: Option<String>,
    /// Leave deadheads out of the report
    #[structopt(long)]
    skip_deadheads: bool,
    /// Where to write blocks.csv. Overrides the config.
    #[structopt(long)]
    output_path: Option<String>,
}

impl Args {
    fn config(self) -> Result<Config> {
        let mut config = Config::load(&self.config_path)?;
        if self.date.is_some() {
            config.date = self.date;
        }
        if self.skip_deadheads {
            config.include_deadheads = false;
        }
        if self.output_path.is_some() {
            config.output_path = self.output_path;
        }
        Ok(config)
    }
}

fn main() {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    let mut timer;
    let mut quiet = Quiet;
    let progress: &mut dyn Progress = if config.verbose {
        timer = Timer::new("export blocks");
        &mut timer
    } else {
        log::set_max_level(log::LevelFilter::Warn);
        &mut quiet
    };
    blocks::gtfs_to_blocks(&config, progress)?;
    Ok(())
}
