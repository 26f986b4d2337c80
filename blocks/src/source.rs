use std::collections::BTreeSet;

use anyhow::Result;

use gtfs::{
    DateFilter, DaysOfWeek, Deadhead, DeadheadID, DeadheadTime, OpsLocation, OpsLocationID,
    ServiceID, Stop, StopID, StopTime, Trip, TripID, GTFS,
};

/// The read-only queries needed to build a block report
pub trait ScheduleSource {
    fn active_services(&self, filter: &DateFilter) -> BTreeSet<ServiceID>;
    fn trips(&self, services: &BTreeSet<ServiceID>) -> Vec<&Trip>;
    fn deadheads(&self, services: &BTreeSet<ServiceID>) -> Vec<&Deadhead>;
    /// Sorted by stop_sequence
    fn stop_times(&self, trip: &TripID) -> Result<&[StopTime]>;
    /// Sorted by location_sequence
    fn deadhead_times(&self, deadhead: &DeadheadID) -> Result<&[DeadheadTime]>;
    fn stop(&self, id: &StopID) -> Option<&Stop>;
    fn ops_location(&self, id: &OpsLocationID) -> Option<&OpsLocation>;
    fn days_of_week(&self, service: &ServiceID) -> Option<&DaysOfWeek>;
}

impl ScheduleSource for GTFS {
    fn active_services(&self, filter: &DateFilter) -> BTreeSet<ServiceID> {
        self.calendar
            .services_matching_dates(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    fn trips(&self, services: &BTreeSet<ServiceID>) -> Vec<&Trip> {
        self.trips
            .values()
            .filter(|trip| services.contains(&trip.service_id))
            .collect()
    }

    fn deadheads(&self, services: &BTreeSet<ServiceID>) -> Vec<&Deadhead> {
        self.deadheads
            .values()
            .filter(|deadhead| services.contains(&deadhead.service_id))
            .collect()
    }

    fn stop_times(&self, trip: &TripID) -> Result<&[StopTime]> {
        if !self.trips.contains_key(trip) {
            bail!("Unknown trip {trip}");
        }
        Ok(self
            .stop_times
            .get(trip)
            .map(|list| list.as_slice())
            .unwrap_or(&[]))
    }

    fn deadhead_times(&self, deadhead: &DeadheadID) -> Result<&[DeadheadTime]> {
        if !self.deadheads.contains_key(deadhead) {
            bail!("Unknown deadhead {deadhead}");
        }
        Ok(self
            .deadhead_times
            .get(deadhead)
            .map(|list| list.as_slice())
            .unwrap_or(&[]))
    }

    fn stop(&self, id: &StopID) -> Option<&Stop> {
        self.stops.get(id)
    }

    fn ops_location(&self, id: &OpsLocationID) -> Option<&OpsLocation> {
        self.ops_locations.get(id)
    }

    fn days_of_week(&self, service: &ServiceID) -> Option<&DaysOfWeek> {
        self.calendar
            .services
            .get(service)
            .map(|service| &service.days_of_week)
    }
}
