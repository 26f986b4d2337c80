//! An in-memory GTFS feed, restricted to what's needed to describe vehicle blocks: stops and
//! operations locations, trips and their stop times, deadheads and their location events, and the
//! service calendar.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod calendar;
mod deadheads;
mod feed;
mod ids;
mod stop_times;
mod stops;
mod trips;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zip::ZipArchive;

pub use calendar::{Calendar, DateFilter, DaysOfWeek, Service};
pub use deadheads::{Deadhead, DeadheadTime};
pub use feed::{Directory, FeedFiles};
pub use ids::{BlockID, DeadheadID, OpsLocationID, RouteID, ServiceID, StopID, TripID};
pub use stop_times::StopTime;
pub use stops::{OpsLocation, Stop};
pub use trips::Trip;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GTFS {
    pub stops: BTreeMap<StopID, Stop>,
    pub ops_locations: BTreeMap<OpsLocationID, OpsLocation>,
    pub trips: BTreeMap<TripID, Trip>,
    // Sorted by stop_sequence
    pub stop_times: BTreeMap<TripID, Vec<StopTime>>,
    pub deadheads: BTreeMap<DeadheadID, Deadhead>,
    // Sorted by location_sequence
    pub deadhead_times: BTreeMap<DeadheadID, Vec<DeadheadTime>>,
    pub calendar: Calendar,
}

impl GTFS {
    /// Loads a feed from a directory or a .zip file
    pub fn load(path: &str) -> Result<Self> {
        if path.to_lowercase().ends_with(".zip") {
            let file = fs_err::File::open(path)?;
            let mut archive = ZipArchive::new(file).map_err(|err| anyhow!("{path}: {err}"))?;
            Self::load_from_files(&mut archive)
        } else {
            Self::load_from_files(&mut Directory(PathBuf::from(path)))
        }
    }

    pub fn load_from_files<F: FeedFiles>(files: &mut F) -> Result<Self> {
        let mut gtfs = Self::empty();
        gtfs.stops = stops::load(&required(files, "stops.txt")?[..]).context("stops.txt")?;
        if let Some(bytes) = files.read("ops_locations.txt")? {
            gtfs.ops_locations =
                stops::load_ops_locations(&bytes[..]).context("ops_locations.txt")?;
        }

        gtfs.trips = trips::load(&required(files, "trips.txt")?[..]).context("trips.txt")?;
        let trip_ids: BTreeSet<&TripID> = gtfs.trips.keys().collect();
        gtfs.stop_times = stop_times::load(&required(files, "stop_times.txt")?[..], &trip_ids)
            .context("stop_times.txt")?;

        if let Some(bytes) = files.read("deadheads.txt")? {
            gtfs.deadheads = deadheads::load(&bytes[..]).context("deadheads.txt")?;
        }
        if let Some(bytes) = files.read("deadhead_times.txt")? {
            let deadhead_ids: BTreeSet<&DeadheadID> = gtfs.deadheads.keys().collect();
            gtfs.deadhead_times =
                deadheads::load_times(&bytes[..], &deadhead_ids).context("deadhead_times.txt")?;
        }

        let calendar_txt = files.read("calendar.txt")?;
        let calendar_dates_txt = files.read("calendar_dates.txt")?;
        if calendar_txt.is_none() && calendar_dates_txt.is_none() {
            bail!("Neither calendar.txt nor calendar_dates.txt exists");
        }
        if let Some(bytes) = calendar_txt {
            gtfs.calendar = calendar::load(&bytes[..]).context("calendar.txt")?;
        }
        if let Some(bytes) = calendar_dates_txt {
            calendar::load_exceptions(&mut gtfs.calendar, &bytes[..])
                .context("calendar_dates.txt")?;
        }

        info!(
            "Loaded {} stops, {} trips, {} deadheads, {} services",
            gtfs.stops.len(),
            gtfs.trips.len(),
            gtfs.deadheads.len(),
            gtfs.calendar.services.len()
        );
        Ok(gtfs)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Combines feeds from several agencies. If an ID appears in both, the existing one wins.
    pub fn merge(&mut self, other: GTFS) {
        merge_map(&mut self.stops, other.stops);
        merge_map(&mut self.ops_locations, other.ops_locations);
        merge_map(&mut self.trips, other.trips);
        merge_map(&mut self.stop_times, other.stop_times);
        merge_map(&mut self.deadheads, other.deadheads);
        merge_map(&mut self.deadhead_times, other.deadhead_times);
        merge_map(&mut self.calendar.services, other.calendar.services);
    }
}

fn merge_map<K: Ord + std::fmt::Debug, V>(into: &mut BTreeMap<K, V>, from: BTreeMap<K, V>) {
    for (key, value) in from {
        if into.contains_key(&key) {
            warn!("{:?} defined by more than one feed; keeping the first", key);
            continue;
        }
        into.insert(key, value);
    }
}

fn required<F: FeedFiles>(files: &mut F, name: &str) -> Result<Vec<u8>> {
    match files.read(name)? {
        Some(bytes) => Ok(bytes),
        None => bail!("The feed is missing {name}"),
    }
}
