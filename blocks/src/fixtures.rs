//! Tiny feeds for tests

use std::collections::BTreeMap;

use gtfs::GTFS;

use crate::Progress;

pub const STOPS: &str = "stop_id,stop_name
A,Alpha
B,Beta
C,Gamma
";

pub const CALENDAR: &str =
    "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
MWF,1,0,1,0,1,0,0,20240101,20241231
DAILY,1,1,1,1,1,1,1,20240101,20241231
";

/// Stops A, B, C and services MWF and DAILY for all of 2024, plus whatever's passed in
pub fn gtfs(trips: &str, stop_times: &str, extra: &[(&str, &str)]) -> GTFS {
    let mut files = BTreeMap::new();
    files.insert("stops.txt".to_string(), STOPS.to_string());
    files.insert("calendar.txt".to_string(), CALENDAR.to_string());
    files.insert("trips.txt".to_string(), trips.to_string());
    files.insert("stop_times.txt".to_string(), stop_times.to_string());
    for (name, contents) in extra {
        files.insert(name.to_string(), contents.to_string());
    }
    GTFS::load_from_files(&mut files).unwrap()
}

#[derive(Default)]
pub struct Recorder {
    pub total: usize,
    pub increments: usize,
    pub interrupts: Vec<String>,
}

impl Progress for Recorder {
    fn begin(&mut self, _: &str, total: usize) {
        self.total = total;
    }

    fn increment(&mut self) {
        self.increments += 1;
    }

    fn interrupt(&mut self, warning: &str) {
        self.interrupts.push(warning.to_string());
    }
}
