//! Output formatting for the dashboard.
//!
//! Renders metric cards, the weekly chart and the observation table as plain
//! text, and supports JSON and CSV output of the computed data.

use std::fmt::{self, Write as _};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::WeeklySummary;
use crate::analyzers::weekly::{WeekSelection, aggregate_by_week, select_week};
use crate::fetch::DataState;
use crate::observation::Observation;
use crate::stats::DashboardSummary;
use crate::table::{Column, TablePage, TableState, paginate};

const BAR_WIDTH: f64 = 24.0;

/// Formats grams the way the dashboard displays them: thousands separators
/// and at most three fraction digits, trailing zeros dropped.
pub fn format_grams(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// `Jan 7, 2024 10:00 AM`
pub fn format_timestamp(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

/// Builds the headline cards. Peak cards are left out when there is no peak.
pub fn metric_cards(summary: &DashboardSummary) -> Vec<MetricCard> {
    let mut cards = vec![
        MetricCard {
            title: "Total Fuel Production",
            value: format!("{}g", format_grams(summary.total_fuel_g)),
        },
        MetricCard {
            title: "Total Water Production",
            value: format!("{}g", format_grams(summary.total_water_g)),
        },
    ];

    if let Some(peak) = &summary.peak_fuel {
        cards.push(MetricCard {
            title: "Peak Fuel Production",
            value: format!(
                "{}g : {}",
                format_grams(peak.value),
                format_timestamp(&peak.observation.datetime)
            ),
        });
    }
    if let Some(peak) = &summary.peak_water {
        cards.push(MetricCard {
            title: "Peak Water Production",
            value: format!(
                "{}g : {}",
                format_grams(peak.value),
                format_timestamp(&peak.observation.datetime)
            ),
        });
    }

    cards
}

fn write_metrics(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
    for card in metric_cards(summary) {
        writeln!(out, "{:<24} {}", card.title, card.value)?;
    }
    Ok(())
}

fn bar(value: f64, max: f64, glyph: char) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = (value / max * BAR_WIDTH).round() as usize;
    std::iter::repeat_n(glyph, len).collect()
}

fn write_chart(
    out: &mut String,
    summaries: &[WeeklySummary],
    selected: Option<&WeeklySummary>,
) -> fmt::Result {
    writeln!(out, "Weekly Fuel and Water Production")?;

    let Some(week) = selected else {
        writeln!(out, "No weeks to display.")?;
        return Ok(());
    };

    writeln!(out, "{}", week.label)?;
    let listing: Vec<&str> = summaries.iter().rev().map(|s| s.label.as_str()).collect();
    writeln!(out, "Weeks: {}", listing.join(" | "))?;
    writeln!(out)?;

    let max = week
        .daily_aggregates
        .iter()
        .flat_map(|d| [d.fuel_mass_g, d.water_mass_g])
        .fold(0.0_f64, f64::max);

    writeln!(out, "{:<10} {:>12} {:>12}", "Day", "Fuel (g)", "Water (g)")?;
    for day in &week.daily_aggregates {
        writeln!(
            out,
            "{:<10} {:>12} {:>12}  {}",
            day.day,
            format_grams(day.fuel_mass_g),
            format_grams(day.water_mass_g),
            bar(day.fuel_mass_g, max, '#'),
        )?;
        writeln!(out, "{:<10} {:>12} {:>12}  {}", "", "", "", bar(day.water_mass_g, max, '~'))?;
    }
    writeln!(
        out,
        "{:<10} {:>12} {:>12}",
        "Total",
        format_grams(week.fuel_total_g),
        format_grams(week.water_total_g)
    )?;
    writeln!(out, "# fuel  ~ water")?;
    writeln!(
        out,
        "Showing total fuel and water production for selected week range"
    )
}

fn cells(obs: &Observation) -> [String; 4] {
    [
        format_timestamp(&obs.datetime),
        obs.experiment_id.clone(),
        obs.fuel_mass_g.to_string(),
        obs.water_mass_g.to_string(),
    ]
}

fn write_table(out: &mut String, page: &TablePage<'_>) -> fmt::Result {
    writeln!(out, "Fuel and Water Production")?;

    if page.rows.is_empty() {
        writeln!(out, "No results.")?;
        return Ok(());
    }

    let rows: Vec<[String; 4]> = page.rows.iter().map(|o| cells(o)).collect();
    let mut widths = Column::ALL.map(|c| c.header().len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = Column::ALL
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c.header()))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("  "))?;

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }

    write!(
        out,
        "Page {} of {} ({} rows)",
        page.page_index + 1,
        page.page_count,
        page.total_rows
    )?;
    if page.can_previous() {
        write!(out, "  < Previous")?;
    }
    if page.can_next() {
        write!(out, "  Next >")?;
    }
    writeln!(out)
}

/// Renders the whole dashboard for one load outcome.
///
/// Failed and empty loads render an explicit message instead of metrics.
///
/// # Errors
///
/// Returns an error if `selection` names a week that does not exist.
pub fn render_dashboard(
    state: &DataState,
    selection: &WeekSelection,
    table: &TableState,
) -> Result<String> {
    let mut out = String::new();

    let batch = match state {
        DataState::Failed(reason) => {
            writeln!(out, "Failed to load experiment data: {reason}")?;
            return Ok(out);
        }
        DataState::Empty { rejected } => {
            writeln!(out, "No experiment data available.")?;
            if *rejected > 0 {
                writeln!(out, "{rejected} malformed records were skipped.")?;
            }
            return Ok(out);
        }
        DataState::Loaded(batch) => batch,
    };

    let observations = &batch.observations;
    let summary = DashboardSummary::from_observations(observations);
    let weeks = aggregate_by_week(observations);
    let selected = select_week(&weeks, selection)?;
    debug!(
        weeks = weeks.len(),
        selected = selected.map(|w| w.label.as_str()),
        "Rendering dashboard"
    );

    write_metrics(&mut out, &summary)?;
    if !batch.rejected.is_empty() {
        writeln!(out, "{} malformed records were skipped.", batch.rejected.len())?;
    }
    writeln!(out)?;
    write_chart(&mut out, &weeks, selected)?;
    writeln!(out)?;
    write_table(&mut out, &paginate(observations, table))?;

    Ok(out)
}

/// Prints any serializable value to stdout as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One CSV row per weekday per week.
#[derive(Debug, Serialize)]
pub struct DailyRow<'a> {
    pub week_start: NaiveDate,
    pub date_range: &'a str,
    pub day: &'static str,
    #[serde(rename = "fuel_mass__g")]
    pub fuel_mass_g: f64,
    #[serde(rename = "water_mass__g")]
    pub water_mass_g: f64,
}

pub fn daily_rows(summaries: &[WeeklySummary]) -> Vec<DailyRow<'_>> {
    summaries
        .iter()
        .flat_map(|week| {
            week.daily_aggregates.iter().map(move |day| DailyRow {
                week_start: week.week_start,
                date_range: &week.label,
                day: day.day,
                fuel_mass_g: day.fuel_mass_g,
                water_mass_g: day.water_mass_g,
            })
        })
        .collect()
}

/// Writes `records` to a fresh CSV file at `path`, header first.
pub fn write_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    debug!(path, rows = records.len(), "Writing CSV export");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
