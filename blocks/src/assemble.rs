use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

use gtfs::{BlockID, OpsLocationID, StopID};

use crate::segment::{collect_segments, LocationID, Movement, Segment};
use crate::{describe_days, Progress, ScheduleSource, ServiceMatch};

/// Bookkeeping for the operator. Nothing downstream depends on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    /// Trips that made it into the report
    pub trips: usize,
    pub deadheads: usize,
    pub segments: usize,
    pub blocks: usize,
    /// One entry per skipped trip or deadhead
    pub warnings: Vec<String>,
}

impl Stats {
    pub(crate) fn warn(&mut self, progress: &mut dyn Progress, warning: String) {
        progress.interrupt(&warning);
        self.warnings.push(warning);
    }
}

/// A segment, ready for display
#[derive(Clone, Debug, PartialEq)]
pub struct BlockRow {
    pub segment: Segment,
    pub days: String,
    pub departure_location: String,
    pub arrival_location: String,
}

pub struct ReportOptions {
    pub date: NaiveDate,
    pub service_match: ServiceMatch,
    pub include_deadheads: bool,
}

pub struct BlockReport {
    pub rows: Vec<BlockRow>,
    pub stats: Stats,
}

/// Finds everything running on the date and lays it out block by block. Only fails when no
/// service runs at all; problems with individual trips and deadheads wind up in the warnings.
pub fn build_report<S: ScheduleSource + ?Sized>(
    source: &S,
    opts: &ReportOptions,
    progress: &mut dyn Progress,
) -> Result<BlockReport> {
    let services = source.active_services(&opts.service_match.filter(opts.date));
    if services.is_empty() {
        bail!("No calendars found for {}", opts.date.format("%b %-d, %Y"));
    }
    debug!("{} services active on {}", services.len(), opts.date);

    let mut stats = Stats::default();
    let segments = collect_segments(
        source,
        &services,
        opts.include_deadheads,
        progress,
        &mut stats,
    );
    let rows = assemble(source, segments, &mut stats, progress);
    Ok(BlockReport { rows, stats })
}

/// Attaches location names and days to every segment, then sorts by block and departure time.
///
/// If any endpoint of a trip or deadhead can't be resolved, the whole trip or deadhead is dropped
/// with a warning.
pub fn assemble<S: ScheduleSource + ?Sized>(
    source: &S,
    segments: Vec<Segment>,
    stats: &mut Stats,
    progress: &mut dyn Progress,
) -> Vec<BlockRow> {
    let mut rows = Vec::new();
    let mut unresolved: BTreeSet<Movement> = BTreeSet::new();
    for segment in segments {
        let movement = segment.movement();
        if unresolved.contains(&movement) {
            continue;
        }
        match (
            location_name(source, &segment.departure_location),
            location_name(source, &segment.arrival_location),
        ) {
            (Ok(departure_location), Ok(arrival_location)) => {
                rows.push(BlockRow {
                    days: describe_days(source.days_of_week(&segment.service_id)),
                    departure_location,
                    arrival_location,
                    segment,
                });
            }
            (Err(err), _) | (_, Err(err)) => {
                stats.warn(progress, format!("{movement}: {err}"));
                match movement {
                    Movement::Trip(_) => stats.trips = stats.trips.saturating_sub(1),
                    Movement::Deadhead(_) => stats.deadheads = stats.deadheads.saturating_sub(1),
                }
                unresolved.insert(movement);
            }
        }
    }
    if !unresolved.is_empty() {
        rows.retain(|row| !unresolved.contains(&row.segment.movement()));
    }

    // sort_by is stable, and the key is total anyway
    rows.sort_by(|a, b| sort_key(&a.segment).cmp(&sort_key(&b.segment)));

    stats.segments = rows.len();
    stats.blocks = rows
        .iter()
        .map(|row| &row.segment.block_id)
        .collect::<BTreeSet<_>>()
        .len();
    rows
}

/// Stops first, then operations locations. A stop without a name is displayed blank.
pub fn location_name<S: ScheduleSource + ?Sized>(source: &S, id: &LocationID) -> Result<String> {
    if let Some(stop) = source.stop(&StopID::new(id.0.as_str())) {
        return Ok(stop.name.clone().unwrap_or_default());
    }
    if let Some(location) = source.ops_location(&OpsLocationID::new(id.0.as_str())) {
        return Ok(location.name.clone().unwrap_or_default());
    }
    bail!("Unresolved location {id}")
}

/// Numeric block IDs sort numerically and before every other block ID, which sort as text.
/// Segments without a block go last.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum BlockKey<'a> {
    Numeric(i64),
    Text(&'a str),
    Missing,
}

fn block_key(id: Option<&BlockID>) -> BlockKey<'_> {
    match id {
        Some(id) => match id.as_str().parse::<i64>() {
            Ok(n) => BlockKey::Numeric(n),
            Err(_) => BlockKey::Text(id.as_str()),
        },
        None => BlockKey::Missing,
    }
}

// Ties after the departure time are broken by trips before deadheads, then the parent ID, then
// the position within the parent.
fn sort_key(segment: &Segment) -> (BlockKey<'_>, NaiveTime, bool, &str, usize) {
    (
        block_key(segment.block_id.as_ref()),
        segment.departure_time.time_of_day(),
        segment.is_deadhead(),
        segment.parent_id(),
        segment.hop,
    )
}
