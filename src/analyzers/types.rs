//! Data types produced by the aggregation pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::observation::Observation;

/// Weekday names in chart order. Weeks start on Sunday.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Fuel and water sums for one weekday of one week. Not rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub day: &'static str,
    #[serde(rename = "fuel_mass__g")]
    pub fuel_mass_g: f64,
    #[serde(rename = "water_mass__g")]
    pub water_mass_g: f64,
}

impl DailyAggregate {
    pub fn zero(day: &'static str) -> Self {
        Self {
            day,
            fuel_mass_g: 0.0,
            water_mass_g: 0.0,
        }
    }
}

/// The finished report for one Sunday-start calendar week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    /// `"Jan-07 - Jan-13"` style range covering the week.
    #[serde(rename = "date_range")]
    pub label: String,
    #[serde(rename = "total_fuel_mass__g")]
    pub fuel_total_g: f64,
    #[serde(rename = "total_water_mass__g")]
    pub water_total_g: f64,
    /// Always seven entries, Sunday through Saturday.
    pub daily_aggregates: Vec<DailyAggregate>,
    #[serde(rename = "data_points")]
    pub source_observations: Vec<Observation>,
}

impl WeeklySummary {
    pub fn day(&self, name: &str) -> Option<&DailyAggregate> {
        self.daily_aggregates.iter().find(|d| d.day == name)
    }
}
