//! JSON parser for experiment payloads.

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::observation::{Observation, RawObservation};

/// Outcome of parsing one payload: the valid observations and the records
/// that were quarantined.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedBatch {
    pub observations: Vec<Observation>,
    pub rejected: Vec<DashboardError>,
}

impl ParsedBatch {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Decodes a JSON array of experiment records.
///
/// Records that are missing fields, carry the wrong types, or fail
/// validation are collected in [`ParsedBatch::rejected`] rather than
/// aborting the whole payload.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or the top level is not an array.
pub fn parse_observations(bytes: &[u8]) -> Result<ParsedBatch> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(DashboardError::UnexpectedPayload(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))
            .into());
        }
    };

    let mut batch = ParsedBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawObservation>(item)
            .map_err(|e| DashboardError::MalformedObservation {
                index,
                reason: e.to_string(),
            })
            .and_then(|raw| raw.validate(index));

        match parsed {
            Ok(obs) => batch.observations.push(obs),
            Err(e) => {
                warn!(error = %e, "Quarantined experiment record");
                batch.rejected.push(e);
            }
        }
    }

    debug!(
        accepted = batch.observations.len(),
        rejected = batch.rejected.len(),
        "Experiment payload parsed"
    );
    Ok(batch)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_array() {
        let batch = parse_observations(b"[]").unwrap();
        assert!(batch.is_empty());
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_observations(b"{not json").is_err());
    }

    #[test]
    fn test_parse_non_array() {
        let err = parse_observations(br#"{"data": []}"#).unwrap_err();
        let err = err.downcast::<DashboardError>().unwrap();
        assert_eq!(
            err,
            DashboardError::UnexpectedPayload("expected a JSON array, got an object".into())
        );
    }

    #[test]
    fn test_parse_valid_records() {
        let json = br#"[
            {"datetime": "2024-01-07T10:00:00Z", "experiment_id": "exp-1", "fuel_mass__g": 100, "water_mass__g": 50},
            {"datetime": "2024-01-08T10:00:00Z", "experiment_id": "exp-2", "fuel_mass__g": 200.5, "water_mass__g": 75}
        ]"#;

        let batch = parse_observations(json).unwrap();

        assert_eq!(batch.observations.len(), 2);
        assert_eq!(batch.observations[1].experiment_id, "exp-2");
        assert_eq!(batch.observations[1].fuel_mass_g, 200.5);
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_parse_quarantines_bad_records() {
        let json = br#"[
            {"datetime": "2024-01-07T10:00:00Z", "experiment_id": "ok", "fuel_mass__g": 1, "water_mass__g": 2},
            {"datetime": "garbage", "experiment_id": "bad-date", "fuel_mass__g": 1, "water_mass__g": 2},
            {"datetime": "2024-01-07T10:00:00Z", "experiment_id": "missing-water", "fuel_mass__g": 1},
            {"datetime": "2024-01-07T10:00:00Z", "experiment_id": "wrong-type", "fuel_mass__g": "lots", "water_mass__g": 2}
        ]"#;

        let batch = parse_observations(json).unwrap();

        assert_eq!(batch.observations.len(), 1);
        assert_eq!(batch.observations[0].experiment_id, "ok");

        let indexes: Vec<_> = batch
            .rejected
            .iter()
            .map(|e| match e {
                DashboardError::MalformedObservation { index, .. } => *index,
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert!(batch.rejected[1].to_string().contains("water_mass__g"));
    }

    #[test]
    fn test_parse_rejects_extended_years_before_aggregation() {
        let json = br#"[
            {"datetime": "+262142-12-31T00:00:00", "experiment_id": "far-future", "fuel_mass__g": 1, "water_mass__g": 2},
            {"datetime": "-262143-01-01T00:00:00", "experiment_id": "far-past", "fuel_mass__g": 1, "water_mass__g": 2},
            {"datetime": "2024-01-07T10:00:00Z", "experiment_id": "ok", "fuel_mass__g": 1, "water_mass__g": 2}
        ]"#;

        let batch = parse_observations(json).unwrap();

        assert_eq!(batch.observations.len(), 1);
        assert_eq!(batch.rejected.len(), 2);
        let weeks = crate::analyzers::weekly::aggregate_by_week(&batch.observations);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].label, "Jan-07 - Jan-13");
    }
}
