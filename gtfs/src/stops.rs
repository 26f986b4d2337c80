use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{OpsLocationID, StopID};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: StopID,
    pub name: Option<String>,
}

/// A location only used for operations, like a yard or a garage. Defined by ops_locations.txt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpsLocation {
    pub ops_location_id: OpsLocationID,
    pub name: Option<String>,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<StopID, Stop>> {
    let mut stops = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if stops.contains_key(&rec.stop_id) {
            bail!("Duplicate {:?}", rec.stop_id);
        }
        stops.insert(
            rec.stop_id.clone(),
            Stop {
                stop_id: rec.stop_id,
                name: rec.stop_name,
            },
        );
    }
    Ok(stops)
}

pub fn load_ops_locations<R: std::io::Read>(
    reader: R,
) -> Result<BTreeMap<OpsLocationID, OpsLocation>> {
    let mut locations = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: OpsRecord = rec?;
        if locations.contains_key(&rec.ops_location_id) {
            bail!("Duplicate {:?}", rec.ops_location_id);
        }
        locations.insert(
            rec.ops_location_id.clone(),
            OpsLocation {
                ops_location_id: rec.ops_location_id,
                name: rec.ops_location_name,
            },
        );
    }
    Ok(locations)
}

#[derive(Deserialize)]
struct Record {
    stop_id: StopID,
    #[serde(default)]
    stop_name: Option<String>,
}

#[derive(Deserialize)]
struct OpsRecord {
    ops_location_id: OpsLocationID,
    #[serde(default)]
    ops_location_name: Option<String>,
}
