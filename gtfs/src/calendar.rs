use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use super::ServiceID;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Calendar {
    pub services: BTreeMap<ServiceID, Service>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceID,
    pub days_of_week: DaysOfWeek,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub extra_days: BTreeSet<NaiveDate>,
    pub removed_days: BTreeSet<NaiveDate>,
    /// Defined only by calendar_dates. The start/end range just spans the exceptions.
    #[serde(default)]
    pub exceptions_only: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysOfWeek {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

pub enum DateFilter {
    /// Any calendar.txt service whose start/end range contains the day, regardless of weekday or
    /// exceptions. A service only in calendar_dates matches on the days it adds.
    ValidOn(NaiveDate),
    /// Services that actually run on the day, honoring weekdays and calendar_dates
    SingleDay(NaiveDate),
}

impl Calendar {
    pub fn services_matching_dates(&self, filter: &DateFilter) -> BTreeSet<&ServiceID> {
        let mut result = BTreeSet::new();
        for service in self.services.values() {
            if service.matches_date(filter) {
                result.insert(&service.service_id);
            }
        }
        result
    }
}

impl Service {
    pub fn matches_date(&self, filter: &DateFilter) -> bool {
        match filter {
            DateFilter::ValidOn(day) => {
                if self.exceptions_only {
                    return self.extra_days.contains(day);
                }
                &self.start_date <= day && day <= &self.end_date
            }
            DateFilter::SingleDay(day) => {
                if self.extra_days.contains(day) {
                    return true;
                }
                if self.removed_days.contains(day) {
                    return false;
                }
                if day < &self.start_date || day > &self.end_date {
                    return false;
                }
                self.days_of_week.includes(day)
            }
        }
    }
}

impl DaysOfWeek {
    pub fn all() -> Self {
        Self::from_array([true; 7])
    }

    /// Monday first
    pub fn from_array(days: [bool; 7]) -> Self {
        Self {
            monday: days[0],
            tuesday: days[1],
            wednesday: days[2],
            thursday: days[3],
            friday: days[4],
            saturday: days[5],
            sunday: days[6],
        }
    }

    /// Monday first
    pub fn to_array(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }

    pub fn includes(&self, day: &NaiveDate) -> bool {
        match day.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

pub fn load<R: std::io::Read>(reader: R) -> Result<Calendar> {
    let mut calendar = Calendar::default();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if calendar.services.contains_key(&rec.service_id) {
            bail!("Duplicate {:?}", rec.service_id);
        }
        calendar.services.insert(
            rec.service_id.clone(),
            Service {
                service_id: rec.service_id,
                days_of_week: DaysOfWeek {
                    monday: rec.monday,
                    tuesday: rec.tuesday,
                    wednesday: rec.wednesday,
                    thursday: rec.thursday,
                    friday: rec.friday,
                    saturday: rec.saturday,
                    sunday: rec.sunday,
                },
                start_date: parse_date(&rec.start_date)?,
                end_date: parse_date(&rec.end_date)?,

                extra_days: BTreeSet::new(),
                removed_days: BTreeSet::new(),
                exceptions_only: false,
            },
        );
    }
    Ok(calendar)
}

pub fn load_exceptions<R: std::io::Read>(calendar: &mut Calendar, reader: R) -> Result<()> {
    // Some feeds define a service only through calendar_dates. It has no regular weekdays, and
    // its range covers every listed exception.
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: DateRecord = rec?;
        let date = parse_date(&rec.date)?;
        if !calendar.services.contains_key(&rec.service_id) {
            debug!("{:?} only defined by calendar_dates", rec.service_id);
            calendar.services.insert(
                rec.service_id.clone(),
                Service {
                    service_id: rec.service_id.clone(),
                    days_of_week: DaysOfWeek::default(),
                    start_date: date,
                    end_date: date,
                    extra_days: BTreeSet::new(),
                    removed_days: BTreeSet::new(),
                    exceptions_only: true,
                },
            );
        }
        let service = match calendar.services.get_mut(&rec.service_id) {
            Some(x) => x,
            None => bail!("{:?} vanished from the calendar", rec.service_id),
        };
        if service.exceptions_only {
            service.start_date = service.start_date.min(date);
            service.end_date = service.end_date.max(date);
        }
        if rec.exception_type == 1 {
            service.extra_days.insert(date);
        } else if rec.exception_type == 2 {
            service.removed_days.insert(date);
        } else {
            bail!("Unknown exception_type {}", rec.exception_type);
        }
    }
    Ok(())
}

fn parse_date(x: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(x.trim(), "%Y%m%d").map_err(|err| anyhow!("Bad date {x:?}: {err}"))
}

#[derive(Deserialize)]
struct Record {
    service_id: ServiceID,
    #[serde(deserialize_with = "parse_bool")]
    monday: bool,
    #[serde(deserialize_with = "parse_bool")]
    tuesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    wednesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    thursday: bool,
    #[serde(deserialize_with = "parse_bool")]
    friday: bool,
    #[serde(deserialize_with = "parse_bool")]
    saturday: bool,
    #[serde(deserialize_with = "parse_bool")]
    sunday: bool,
    start_date: String,
    end_date: String,
}

fn parse_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let n = <u8>::deserialize(d)?;
    if n == 1 {
        return Ok(true);
    }
    if n == 0 {
        return Ok(false);
    }
    Err(serde::de::Error::custom(format!("Unknown bool value {n}")))
}

#[derive(Deserialize)]
struct DateRecord {
    service_id: ServiceID,
    date: String,
    exception_type: u8,
}
