use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use gtfs::DateFilter;
use serde::{Deserialize, Serialize};

use crate::output::{expand_home, sanitize_filename};
use crate::report::check_time_format;

/// Read from a JSON file like config-sample.json
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub agencies: Vec<AgencyConfig>,
    /// YYYYMMDD. Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// A chrono strftime pattern
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "yes")]
    pub include_deadheads: bool,
    #[serde(default)]
    pub service_match: ServiceMatch,
    /// Defaults to output/<agency keys>
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default = "yes")]
    pub overwrite_existing_files: bool,
    #[serde(default = "yes")]
    pub verbose: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgencyConfig {
    pub agency_key: String,
    /// A GTFS directory or .zip file
    pub path: String,
}

/// How to decide which services are in the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceMatch {
    /// Any service whose date range covers the day, even if it doesn't run on that weekday
    #[default]
    ValidOnDate,
    /// Only services actually running that day, counting calendar_dates exceptions
    OperatingOnDate,
}

impl ServiceMatch {
    pub fn filter(self, date: NaiveDate) -> DateFilter {
        match self {
            ServiceMatch::ValidOnDate => DateFilter::ValidOn(date),
            ServiceMatch::OperatingOnDate => DateFilter::SingleDay(date),
        }
    }
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

fn yes() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs_err::read_to_string(expand_home(path)).with_context(|| {
            format!(
                "Cannot find configuration file at `{path}`. Use config-sample.json as a \
                 starting point, pass --config-path option"
            )
        })?;
        serde_json::from_str(&raw).with_context(|| {
            format!(
                "Cannot parse configuration file at `{path}`. Check to ensure that it is valid \
                 JSON."
            )
        })
    }

    /// Catches every configuration problem before anything is loaded or written
    pub fn validate(&self) -> Result<()> {
        if self.agencies.is_empty() {
            bail!("No agencies defined in `config.json`");
        }
        self.report_date()?;
        check_time_format(&self.time_format)?;
        Ok(())
    }

    pub fn report_date(&self) -> Result<NaiveDate> {
        match self.date {
            Some(ref date) => NaiveDate::parse_from_str(date.trim(), "%Y%m%d")
                .map_err(|err| anyhow!("Bad date {date:?}, expected YYYYMMDD: {err}")),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    /// All agency keys, joined by '-'
    pub fn agency_key(&self) -> String {
        self.agencies
            .iter()
            .map(|agency| agency.agency_key.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.output_path {
            return Ok(PathBuf::from(expand_home(path)));
        }
        Ok(std::env::current_dir()?
            .join("output")
            .join(sanitize_filename(&self.agency_key())))
    }
}
