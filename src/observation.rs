//! Experiment observations and their wire representation.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// One experiment reading.
///
/// `datetime` keeps the offset it was reported with; weekday and week
/// assignment use that offset's calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub datetime: DateTime<FixedOffset>,
    pub experiment_id: String,
    #[serde(rename = "fuel_mass__g")]
    pub fuel_mass_g: f64,
    #[serde(rename = "water_mass__g")]
    pub water_mass_g: f64,
}

/// A record exactly as it appears in the upstream JSON array.
#[derive(Debug, Deserialize)]
pub struct RawObservation {
    pub datetime: String,
    pub experiment_id: String,
    #[serde(rename = "fuel_mass__g")]
    pub fuel_mass_g: f64,
    #[serde(rename = "water_mass__g")]
    pub water_mass_g: f64,
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl RawObservation {
    /// Validates the record and converts it into an [`Observation`].
    ///
    /// `index` is the record's position in the payload and is only used for
    /// error reporting.
    pub fn validate(self, index: usize) -> Result<Observation, DashboardError> {
        let malformed = |reason: String| DashboardError::MalformedObservation { index, reason };

        let datetime = parse_datetime(&self.datetime)
            .ok_or_else(|| malformed(format!("unparseable datetime '{}'", self.datetime)))?;
        if !YEAR_RANGE.contains(&datetime.year()) {
            return Err(malformed(format!(
                "datetime '{}' is outside years 0000-9999",
                self.datetime
            )));
        }

        check_mass("fuel_mass__g", self.fuel_mass_g).map_err(malformed)?;
        check_mass("water_mass__g", self.water_mass_g).map_err(malformed)?;

        Ok(Observation {
            datetime,
            experiment_id: self.experiment_id,
            fuel_mass_g: self.fuel_mass_g,
            water_mass_g: self.water_mass_g,
        })
    }
}

/// Years an RFC 3339 timestamp can express. Week arithmetic near chrono's
/// own limits would overflow.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

fn check_mass(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{field} is not a finite number"));
    }
    if value < 0.0 {
        return Err(format!("{field} is negative ({value})"));
    }
    Ok(())
}

/// Parses an ISO-8601 timestamp.
///
/// Strings without an offset are read as UTC; a bare date is midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
