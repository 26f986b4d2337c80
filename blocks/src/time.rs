use std::fmt;

use anyhow::Result;
use chrono::NaiveTime;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A GTFS time of day, like "08:15:00". The hours may be 24 or more for service continuing past
/// midnight.
///
/// Within one report, times are compared by wall-clock time only: "25:30:00" sorts as 01:30,
/// ahead of the evening. Existing reports depend on this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GtfsTime {
    /// Seconds since the start of the service day. Can exceed one day.
    seconds: u32,
    time_of_day: NaiveTime,
}

impl GtfsTime {
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split(':').collect();
        if parts.len() != 3 {
            bail!("Bad time {raw:?}, expected HH:MM:SS");
        }
        let hours = parse_field(raw, parts[0], None)?;
        let minutes = parse_field(raw, parts[1], Some(60))?;
        let seconds = parse_field(raw, parts[2], Some(60))?;

        let total = hours
            .checked_mul(3600)
            .and_then(|x| x.checked_add(minutes * 60 + seconds))
            .ok_or_else(|| anyhow!("Bad time {raw:?}, hours out of range"))?;
        let time_of_day = NaiveTime::from_num_seconds_from_midnight_opt(total % SECONDS_PER_DAY, 0)
            .ok_or_else(|| anyhow!("Bad time {raw:?}"))?;
        Ok(Self {
            seconds: total,
            time_of_day,
        })
    }

    /// The wall-clock time, discarding which day the hours actually land on
    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }

    /// Seconds since the start of the service day, without wrapping at midnight
    pub fn service_day_seconds(&self) -> u32 {
        self.seconds
    }
}

fn parse_field(raw: &str, field: &str, limit: Option<u32>) -> Result<u32> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        bail!("Bad time {raw:?}, {field:?} isn't a number");
    }
    let value: u32 = field
        .parse()
        .map_err(|err| anyhow!("Bad time {raw:?}: {err}"))?;
    if let Some(limit) = limit {
        if value >= limit || field.len() > 2 {
            bail!("Bad time {raw:?}, {field:?} is out of range");
        }
    }
    Ok(value)
}

// Keeps the hour count as written, so "25:30:00" stays "25:30:00"
impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 3600,
            (self.seconds / 60) % 60,
            self.seconds % 60
        )
    }
}
