use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{BlockID, DeadheadID, OpsLocationID, ServiceID, StopID};

/// A non-revenue move, from the GTFS-ops deadheads.txt extension
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deadhead {
    pub deadhead_id: DeadheadID,
    pub service_id: ServiceID,
    pub block_id: Option<BlockID>,
}

/// Each event touches an ops location, a passenger stop, or (in sloppy feeds) neither.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeadheadTime {
    pub ops_location_id: Option<OpsLocationID>,
    pub stop_id: Option<StopID>,
    pub location_sequence: usize,
    pub arrival_time: String,
    pub departure_time: String,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<DeadheadID, Deadhead>> {
    let mut deadheads = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if deadheads.contains_key(&rec.deadhead_id) {
            bail!("Duplicate {:?}", rec.deadhead_id);
        }
        deadheads.insert(
            rec.deadhead_id.clone(),
            Deadhead {
                deadhead_id: rec.deadhead_id,
                service_id: rec.service_id,
                block_id: BlockID::cleanup(rec.block_id),
            },
        );
    }
    Ok(deadheads)
}

/// Returns events per deadhead, sorted by location_sequence
pub fn load_times<R: std::io::Read>(
    reader: R,
    deadhead_ids: &BTreeSet<&DeadheadID>,
) -> Result<BTreeMap<DeadheadID, Vec<DeadheadTime>>> {
    let mut times: BTreeMap<DeadheadID, Vec<DeadheadTime>> = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: TimeRecord = rec?;
        times
            .entry(rec.deadhead_id)
            .or_insert_with(Vec::new)
            .push(DeadheadTime {
                ops_location_id: rec.ops_location_id,
                stop_id: rec.stop_id,
                location_sequence: rec.location_sequence,
                arrival_time: rec.arrival_time,
                departure_time: rec.departure_time,
            });
    }

    let unknown: Vec<&DeadheadID> = times
        .keys()
        .filter(|id| !deadhead_ids.contains(id))
        .collect();
    if !unknown.is_empty() {
        warn!("Deadhead times defined for unknown deadheads: {:?}", unknown);
    }

    for list in times.values_mut() {
        list.sort_by_key(|t| t.location_sequence);
    }
    Ok(times)
}

#[derive(Deserialize)]
struct Record {
    deadhead_id: DeadheadID,
    service_id: ServiceID,
    #[serde(default)]
    block_id: Option<BlockID>,
}

#[derive(Deserialize)]
struct TimeRecord {
    deadhead_id: DeadheadID,
    arrival_time: String,
    departure_time: String,
    #[serde(default)]
    ops_location_id: Option<OpsLocationID>,
    #[serde(default)]
    stop_id: Option<StopID>,
    location_sequence: usize,
}
