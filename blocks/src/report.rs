use std::fmt::Write;

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveTime;

use crate::segment::SegmentKind;
use crate::{BlockRow, GtfsTime};

pub const HEADER: [&str; 12] = [
    "Block ID",
    "Route ID",
    "Trip ID",
    "Direction ID",
    "Days",
    "Departure Location",
    "Arrival Location",
    "Departure Time",
    "Arrival Time",
    "Trip Headsign",
    "Stop Headsign",
    "Is Deadhead",
];

/// Writes one line per row, after a header
pub fn write_csv<W: std::io::Write>(rows: &[BlockRow], time_format: &str, writer: W) -> Result<()> {
    check_time_format(time_format)?;
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.write_record(&record(row, time_format)?)?;
    }
    csv.flush()?;
    Ok(())
}

fn record(row: &BlockRow, time_format: &str) -> Result<[String; 12]> {
    let segment = &row.segment;
    let (route_id, direction_id, trip_headsign, stop_headsign) = match segment.kind {
        SegmentKind::Revenue {
            ref route_id,
            direction_id,
            ref trip_headsign,
            ref stop_headsign,
            ..
        } => (
            route_id.to_string(),
            direction_id.map(|x| x.to_string()).unwrap_or_default(),
            trip_headsign.clone().unwrap_or_default(),
            stop_headsign.clone().unwrap_or_default(),
        ),
        SegmentKind::Deadhead { .. } => Default::default(),
    };
    Ok([
        segment
            .block_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        route_id,
        segment.parent_id().to_string(),
        direction_id,
        row.days.clone(),
        row.departure_location.clone(),
        row.arrival_location.clone(),
        format_time(&segment.departure_time, time_format)?,
        format_time(&segment.arrival_time, time_format)?,
        trip_headsign,
        stop_headsign,
        segment.is_deadhead().to_string(),
    ])
}

/// Renders the wall-clock time of day with a chrono strftime pattern, like "%H:%M:%S" or
/// "%-I:%M %p".
pub fn format_time(time: &GtfsTime, pattern: &str) -> Result<String> {
    let mut result = String::new();
    write!(result, "{}", time.time_of_day().format(pattern))
        .map_err(|_| anyhow!("Bad time format {pattern:?}"))?;
    Ok(result)
}

/// Fails for unknown specifiers, and for ones that need a date, like "%Y" or "%a"
pub fn check_time_format(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        bail!("Bad time format {pattern:?}");
    }
    let mut sample = String::new();
    write!(sample, "{}", NaiveTime::MIN.format(pattern))
        .map_err(|_| anyhow!("Bad time format {pattern:?}, only times of day can be shown"))?;
    Ok(())
}
