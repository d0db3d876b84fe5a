use crate::analyzers::types::{DailyAggregate, WEEKDAYS, WeeklySummary};
use crate::analyzers::utility::{month_day, round2};
use crate::error::DashboardError;
use crate::observation::Observation;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate};
use std::collections::BTreeMap;

/// Returns the Sunday that starts the calendar week containing `datetime`,
/// in the timestamp's own offset.
pub fn week_start_of(datetime: &DateTime<FixedOffset>) -> NaiveDate {
    let date = datetime.date_naive();
    let back = datetime.weekday().num_days_from_sunday() as u64;
    date - Days::new(back)
}

/// Groups observations into Sunday-start weeks with per-weekday sums.
///
/// The input is copied and stable-sorted by time; the caller's slice is left
/// untouched. Weeks come back in chronological order. Week totals are rounded
/// to two decimals, daily aggregates are not.
pub fn aggregate_by_week(observations: &[Observation]) -> Vec<WeeklySummary> {
    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.datetime);

    let mut buckets: BTreeMap<NaiveDate, Vec<Observation>> = BTreeMap::new();
    for obs in sorted {
        buckets
            .entry(week_start_of(&obs.datetime))
            .or_default()
            .push(obs);
    }

    buckets
        .into_iter()
        .map(|(week_start, week)| summarize_week(week_start, week))
        .collect()
}

fn summarize_week(week_start: NaiveDate, week: Vec<Observation>) -> WeeklySummary {
    let mut daily: Vec<DailyAggregate> = WEEKDAYS.into_iter().map(DailyAggregate::zero).collect();
    let mut fuel_total = 0.0;
    let mut water_total = 0.0;

    for obs in &week {
        let slot = &mut daily[obs.datetime.weekday().num_days_from_sunday() as usize];
        slot.fuel_mass_g += obs.fuel_mass_g;
        slot.water_mass_g += obs.water_mass_g;

        fuel_total += obs.fuel_mass_g;
        water_total += obs.water_mass_g;
    }

    let week_end = week_start + Days::new(6);

    WeeklySummary {
        week_start,
        label: format!("{} - {}", month_day(week_start), month_day(week_end)),
        fuel_total_g: round2(fuel_total),
        water_total_g: round2(water_total),
        daily_aggregates: daily,
        source_observations: week,
    }
}

/// Which week the chart should display. Owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WeekSelection {
    /// The most recent week.
    #[default]
    Latest,
    /// Position in the newest-first week listing.
    Index(usize),
    /// Exact week label, e.g. `"Jan-07 - Jan-13"`.
    Label(String),
}

/// Resolves a [`WeekSelection`] against chronologically ordered summaries.
///
/// `Latest` on an empty list yields `Ok(None)`; an index or label that does
/// not match any week is an error.
pub fn select_week<'a>(
    summaries: &'a [WeeklySummary],
    selection: &WeekSelection,
) -> Result<Option<&'a WeeklySummary>, DashboardError> {
    match selection {
        WeekSelection::Latest => Ok(summaries.last()),
        WeekSelection::Index(i) => summaries
            .iter()
            .rev()
            .nth(*i)
            .map(Some)
            .ok_or_else(|| DashboardError::UnknownWeek(format!("index {i}"))),
        WeekSelection::Label(label) => summaries
            .iter()
            .find(|s| s.label == *label)
            .map(Some)
            .ok_or_else(|| DashboardError::UnknownWeek(label.clone())),
    }
}
