//! Turns one or more GTFS feeds into a report of vehicle blocks: every trip (and optionally every
//! deadhead) running on a date, broken into stop-to-stop segments and grouped by block.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod assemble;
mod config;
mod days;
#[cfg(test)]
mod fixtures;
mod output;
mod progress;
mod report;
mod segment;
mod source;
mod time;

use std::path::PathBuf;
use std::time::Instant;

use abstutil::prettyprint_usize;
use anyhow::{Context, Result};
use gtfs::GTFS;

pub use self::assemble::{assemble, build_report, BlockReport, BlockRow, ReportOptions, Stats};
pub use self::config::{AgencyConfig, Config, ServiceMatch};
pub use self::days::{describe_days, describe_pattern};
pub use self::output::{prep_directory, write_report};
pub use self::progress::{Progress, Quiet};
pub use self::report::{check_time_format, format_time, write_csv, HEADER};
pub use self::segment::{collect_segments, LocationID, Movement, Segment, SegmentKind};
pub use self::source::ScheduleSource;
pub use self::time::GtfsTime;

/// Loads every configured feed, builds the report, and writes blocks.csv. Returns the path
/// written.
///
/// Nothing touches the output directory until the CSV has been rendered, so a bad config or a
/// date with no service leaves the disk alone.
pub fn gtfs_to_blocks(config: &Config, progress: &mut dyn Progress) -> Result<(PathBuf, Stats)> {
    let started = Instant::now();
    config.validate()?;
    let date = config.report_date()?;
    let agency_key = config.agency_key();

    let mut gtfs = GTFS::empty();
    for agency in &config.agencies {
        info!("{}: Loading GTFS from {}", agency.agency_key, agency.path);
        let feed = GTFS::load(&output::expand_home(&agency.path))
            .with_context(|| format!("{}: loading GTFS from {}", agency.agency_key, agency.path))?;
        gtfs.merge(feed);
    }

    info!("{agency_key}: Generating block export");
    let report = build_report(
        &gtfs,
        &ReportOptions {
            date,
            service_match: config.service_match,
            include_deadheads: config.include_deadheads,
        },
        progress,
    )?;

    let mut csv = Vec::new();
    write_csv(&report.rows, &config.time_format, &mut csv)?;

    let dir = config.output_dir()?;
    prep_directory(&dir, config.overwrite_existing_files)?;
    let path = write_report(&dir, &csv)?;

    log_stats(&report.stats);
    info!(
        "{agency_key}: block export for {} created at {}",
        date.format("%b %-d, %Y"),
        path.display()
    );
    info!(
        "{agency_key}: block export created in {:.1} seconds",
        started.elapsed().as_secs_f64()
    );
    Ok((path, report.stats))
}

fn log_stats(stats: &Stats) {
    info!("{} trips", prettyprint_usize(stats.trips));
    info!("{} deadheads", prettyprint_usize(stats.deadheads));
    info!("{} segments", prettyprint_usize(stats.segments));
    info!("{} blocks", prettyprint_usize(stats.blocks));
    if !stats.warnings.is_empty() {
        warn!(
            "{} trips or deadheads skipped",
            prettyprint_usize(stats.warnings.len())
        );
        for warning in &stats.warnings {
            warn!("  {warning}");
        }
    }
}
