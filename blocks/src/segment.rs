use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Context, Result};

use gtfs::{
    BlockID, Deadhead, DeadheadID, DeadheadTime, RouteID, ServiceID, StopTime, Trip, TripID,
};

use crate::{GtfsTime, Progress, ScheduleSource, Stats};

/// Either a stop or an operations location. Deadheads may visit yards that riders never see, so
/// the ID is resolved against stops first, then operations locations.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationID(pub String);

impl fmt::Display for LocationID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One directed hop between two consecutive stops of a trip, or two consecutive locations of a
/// deadhead.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub block_id: Option<BlockID>,
    pub service_id: ServiceID,
    pub kind: SegmentKind,
    pub departure_location: LocationID,
    pub arrival_location: LocationID,
    pub departure_time: GtfsTime,
    pub arrival_time: GtfsTime,
    /// Position within the parent trip or deadhead, starting at 0
    pub hop: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SegmentKind {
    Revenue {
        trip_id: TripID,
        route_id: RouteID,
        direction_id: Option<u8>,
        trip_headsign: Option<String>,
        /// From the stop this hop departs
        stop_headsign: Option<String>,
    },
    Deadhead {
        deadhead_id: DeadheadID,
    },
}

/// What a segment belongs to. Trips order before deadheads.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Movement {
    Trip(TripID),
    Deadhead(DeadheadID),
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Movement::Trip(id) => write!(f, "Trip {id}"),
            Movement::Deadhead(id) => write!(f, "Deadhead {id}"),
        }
    }
}

impl Segment {
    pub fn is_deadhead(&self) -> bool {
        matches!(self.kind, SegmentKind::Deadhead { .. })
    }

    /// The trip or deadhead ID
    pub fn parent_id(&self) -> &str {
        match self.kind {
            SegmentKind::Revenue { ref trip_id, .. } => trip_id.as_str(),
            SegmentKind::Deadhead { ref deadhead_id } => deadhead_id.as_str(),
        }
    }

    pub fn movement(&self) -> Movement {
        match self.kind {
            SegmentKind::Revenue { ref trip_id, .. } => Movement::Trip(trip_id.clone()),
            SegmentKind::Deadhead { ref deadhead_id } => {
                Movement::Deadhead(deadhead_id.clone())
            }
        }
    }
}

/// One segment per pair of adjacent stop times. A trip with fewer than two stop times has no
/// segments. Fails if any time involved is malformed.
pub fn trip_segments(trip: &Trip, stop_times: &[StopTime]) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for (hop, pair) in stop_times.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let (departure_time, arrival_time) = hop_times(&from.departure_time, &to.arrival_time)
            .with_context(|| {
                format!(
                    "stop_sequence {} to {}",
                    from.stop_sequence, to.stop_sequence
                )
            })?;
        segments.push(Segment {
            block_id: trip.block_id.clone(),
            service_id: trip.service_id.clone(),
            kind: SegmentKind::Revenue {
                trip_id: trip.trip_id.clone(),
                route_id: trip.route_id.clone(),
                direction_id: trip.direction_id,
                trip_headsign: trip.headsign.clone(),
                stop_headsign: from.stop_headsign.clone(),
            },
            departure_location: LocationID(from.stop_id.0.clone()),
            arrival_location: LocationID(to.stop_id.0.clone()),
            departure_time,
            arrival_time,
            hop,
        });
    }
    Ok(segments)
}

/// Like trip_segments. Each endpoint is the ops location when there is one, otherwise the stop.
pub fn deadhead_segments(deadhead: &Deadhead, times: &[DeadheadTime]) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for (hop, pair) in times.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let (departure_time, arrival_time) = hop_times(&from.departure_time, &to.arrival_time)
            .with_context(|| {
                format!(
                    "location_sequence {} to {}",
                    from.location_sequence, to.location_sequence
                )
            })?;
        segments.push(Segment {
            block_id: deadhead.block_id.clone(),
            service_id: deadhead.service_id.clone(),
            kind: SegmentKind::Deadhead {
                deadhead_id: deadhead.deadhead_id.clone(),
            },
            departure_location: deadhead_location(from)?,
            arrival_location: deadhead_location(to)?,
            departure_time,
            arrival_time,
            hop,
        });
    }
    Ok(segments)
}

fn deadhead_location(time: &DeadheadTime) -> Result<LocationID> {
    if let Some(ref id) = time.ops_location_id {
        return Ok(LocationID(id.0.clone()));
    }
    if let Some(ref id) = time.stop_id {
        return Ok(LocationID(id.0.clone()));
    }
    bail!(
        "location_sequence {} has neither an ops_location_id nor a stop_id",
        time.location_sequence
    )
}

fn hop_times(departure: &str, arrival: &str) -> Result<(GtfsTime, GtfsTime)> {
    let departure = GtfsTime::parse(departure)?;
    let arrival = GtfsTime::parse(arrival)?;
    if arrival.service_day_seconds() < departure.service_day_seconds() {
        bail!("Arrives at {arrival}, before departing at {departure}");
    }
    Ok((departure, arrival))
}

/// Segments every trip, and optionally every deadhead, running on one of the services. A trip or
/// deadhead that can't be fetched or has bad data is skipped with a warning; it never stops the
/// others.
pub fn collect_segments<S: ScheduleSource + ?Sized>(
    source: &S,
    services: &BTreeSet<ServiceID>,
    include_deadheads: bool,
    progress: &mut dyn Progress,
    stats: &mut Stats,
) -> Vec<Segment> {
    let trips = source.trips(services);
    let deadheads = if include_deadheads {
        source.deadheads(services)
    } else {
        Vec::new()
    };

    progress.begin("generate trip segments", trips.len() + deadheads.len());
    let mut segments = Vec::new();
    for trip in trips {
        let movement = Movement::Trip(trip.trip_id.clone());
        let result = source
            .stop_times(&trip.trip_id)
            .and_then(|stop_times| trip_segments(trip, stop_times));
        keep_segments(movement, result, &mut segments, stats, progress);
        progress.increment();
    }
    for deadhead in deadheads {
        let movement = Movement::Deadhead(deadhead.deadhead_id.clone());
        let result = source
            .deadhead_times(&deadhead.deadhead_id)
            .and_then(|times| deadhead_segments(deadhead, times));
        keep_segments(movement, result, &mut segments, stats, progress);
        progress.increment();
    }
    segments
}

fn keep_segments(
    movement: Movement,
    result: Result<Vec<Segment>>,
    segments: &mut Vec<Segment>,
    stats: &mut Stats,
    progress: &mut dyn Progress,
) {
    match result {
        Ok(list) if list.is_empty() => {
            stats.warn(
                progress,
                format!("{movement} has fewer than two stops; skipping it"),
            );
        }
        Ok(list) => {
            match movement {
                Movement::Trip(_) => stats.trips += 1,
                Movement::Deadhead(_) => stats.deadheads += 1,
            }
            segments.extend(list);
        }
        Err(err) => {
            stats.warn(progress, format!("{movement}: {err:#}"));
        }
    }
}
