use serde::Serialize;

use crate::observation::Observation;

/// A maximal measurement together with the observation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    pub value: f64,
    pub observation: Observation,
}

/// Headline metrics for the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub observation_count: usize,
    pub total_fuel_g: f64,
    pub total_water_g: f64,
    pub peak_fuel: Option<Peak>,
    pub peak_water: Option<Peak>,
}

impl DashboardSummary {
    pub fn from_observations(observations: &[Observation]) -> Self {
        DashboardSummary {
            observation_count: observations.len(),
            total_fuel_g: total_fuel(observations),
            total_water_g: total_water(observations),
            peak_fuel: peak_fuel(observations),
            peak_water: peak_water(observations),
        }
    }
}

pub fn total_fuel(observations: &[Observation]) -> f64 {
    observations.iter().map(|o| o.fuel_mass_g).sum()
}

pub fn total_water(observations: &[Observation]) -> f64 {
    observations.iter().map(|o| o.water_mass_g).sum()
}

/// Largest fuel mass and the first observation reaching it. `None` when empty.
pub fn peak_fuel(observations: &[Observation]) -> Option<Peak> {
    peak_by(observations, |o| o.fuel_mass_g)
}

/// Largest water mass and the first observation reaching it. `None` when empty.
pub fn peak_water(observations: &[Observation]) -> Option<Peak> {
    peak_by(observations, |o| o.water_mass_g)
}

fn peak_by(observations: &[Observation], measure: impl Fn(&Observation) -> f64) -> Option<Peak> {
    let mut best: Option<&Observation> = None;
    for obs in observations {
        // strict comparison keeps the earliest of equal maxima
        if best.is_none_or(|b| measure(obs) > measure(b)) {
            best = Some(obs);
        }
    }
    best.map(|o| Peak {
        value: measure(o),
        observation: o.clone(),
    })
}
