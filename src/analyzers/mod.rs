//! Time-series aggregation over experiment observations.
//!
//! Observations are bucketed into Sunday-start calendar weeks and, within
//! each week, into named weekdays. The resulting [`types::WeeklySummary`]
//! values feed the weekly chart and the weekly JSON/CSV outputs.

pub mod types;
pub mod utility;
pub mod weekly;
