//! Sortable, paginated view over raw observations.

use std::cmp::Ordering;

use clap::ValueEnum;

use crate::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Column {
    Date,
    ExperimentId,
    Fuel,
    Water,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Date, Column::ExperimentId, Column::Fuel, Column::Water];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::ExperimentId => "Experiment ID",
            Column::Fuel => "Fuel Mass (g)",
            Column::Water => "Water Mass (g)",
        }
    }

    fn compare(self, a: &Observation, b: &Observation) -> Ordering {
        match self {
            Column::Date => a.datetime.cmp(&b.datetime),
            Column::ExperimentId => a.experiment_id.cmp(&b.experiment_id),
            Column::Fuel => a.fuel_mass_g.total_cmp(&b.fuel_mass_g),
            Column::Water => a.water_mass_g.total_cmp(&b.water_mass_g),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub direction: Direction,
}

impl SortKey {
    pub fn newest_first() -> Self {
        Self {
            column: Column::Date,
            direction: Direction::Descending,
        }
    }
}

/// Caller-owned table state: sort order and the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    pub sort: SortKey,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sort: SortKey::newest_first(),
            page_index: 0,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One rendered page of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Observation>,
    pub page_index: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

impl TablePage<'_> {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// Returns references to `observations` in the requested order. Stable, so
/// equal keys keep their input order.
pub fn sorted_rows(observations: &[Observation], sort: SortKey) -> Vec<&Observation> {
    let mut rows: Vec<&Observation> = observations.iter().collect();
    rows.sort_by(|a, b| match sort.direction {
        Direction::Ascending => sort.column.compare(a, b),
        Direction::Descending => sort.column.compare(b, a),
    });
    rows
}

/// Sorts and slices out the page described by `state`. A page index past the
/// end yields an empty page.
pub fn paginate<'a>(observations: &'a [Observation], state: &TableState) -> TablePage<'a> {
    let page_size = state.page_size.max(1);
    let total_rows = observations.len();
    let page_count = total_rows.div_ceil(page_size);

    let rows = sorted_rows(observations, state.sort)
        .into_iter()
        .skip(state.page_index.saturating_mul(page_size))
        .take(page_size)
        .collect();

    TablePage {
        rows,
        page_index: state.page_index,
        page_count,
        total_rows,
    }
}
