use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{StopID, TripID};

/// Times are kept exactly as written in the feed. They may exceed 24 hours, and a malformed one
/// should only affect its own trip, so parsing happens later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StopTime {
    pub stop_id: StopID,
    pub stop_sequence: usize,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_headsign: Option<String>,
}

/// Returns stop times per trip, sorted by stop_sequence
pub fn load<R: std::io::Read>(
    reader: R,
    trip_ids: &BTreeSet<&TripID>,
) -> Result<BTreeMap<TripID, Vec<StopTime>>> {
    let mut stop_times: BTreeMap<TripID, Vec<StopTime>> = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        stop_times
            .entry(rec.trip_id)
            .or_insert_with(Vec::new)
            .push(StopTime {
                stop_id: rec.stop_id,
                stop_sequence: rec.stop_sequence,
                arrival_time: rec.arrival_time,
                departure_time: rec.departure_time,
                stop_headsign: rec.stop_headsign,
            });
    }

    let unknown: Vec<&TripID> = stop_times
        .keys()
        .filter(|id| !trip_ids.contains(id))
        .collect();
    if !unknown.is_empty() {
        warn!("Stop times defined for unknown trips: {:?}", unknown);
    }

    // Sort by stop_sequence, in case the file isn't in order
    for list in stop_times.values_mut() {
        list.sort_by_key(|st| st.stop_sequence);
    }
    Ok(stop_times)
}

#[derive(Deserialize)]
struct Record {
    trip_id: TripID,
    arrival_time: String,
    departure_time: String,
    stop_id: StopID,
    stop_sequence: usize,
    #[serde(default)]
    stop_headsign: Option<String>,
}
