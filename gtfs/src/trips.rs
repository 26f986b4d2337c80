use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{BlockID, RouteID, ServiceID, TripID};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripID,
    pub route_id: RouteID,
    pub service_id: ServiceID,
    pub block_id: Option<BlockID>,
    pub headsign: Option<String>,
    /// 0 or 1 in GTFS. Inbound/outbound are arbitrary.
    pub direction_id: Option<u8>,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<TripID, Trip>> {
    let mut trips = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if trips.contains_key(&rec.trip_id) {
            bail!("Duplicate {:?}", rec.trip_id);
        }
        if let Some(x) = rec.direction_id {
            if x > 1 {
                bail!("Unknown direction_id {x} for {:?}", rec.trip_id);
            }
        }
        trips.insert(
            rec.trip_id.clone(),
            Trip {
                trip_id: rec.trip_id,
                route_id: rec.route_id,
                service_id: rec.service_id,
                block_id: BlockID::cleanup(rec.block_id),
                headsign: rec.trip_headsign,
                direction_id: rec.direction_id,
            },
        );
    }
    Ok(trips)
}

#[derive(Deserialize)]
struct Record {
    trip_id: TripID,
    route_id: RouteID,
    service_id: ServiceID,
    #[serde(default)]
    block_id: Option<BlockID>,
    #[serde(default)]
    trip_headsign: Option<String>,
    #[serde(default)]
    direction_id: Option<u8>,
}
