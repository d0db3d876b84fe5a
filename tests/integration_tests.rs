use experiment_dashboard::analyzers::weekly::{WeekSelection, aggregate_by_week};
use experiment_dashboard::config::DashboardConfig;
use experiment_dashboard::fetch::{BasicClient, DataState, load_dataset};
use experiment_dashboard::output::render_dashboard;
use experiment_dashboard::parser::parse_observations;
use experiment_dashboard::stats::DashboardSummary;
use experiment_dashboard::table::TableState;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/sample_experiments.json"
);

#[test]
fn test_full_pipeline() {
    let bytes = include_bytes!("fixtures/sample_experiments.json");
    let batch = parse_observations(bytes).expect("Failed to parse payload");

    assert_eq!(batch.observations.len(), 12);
    assert_eq!(batch.rejected.len(), 2);

    let summary = DashboardSummary::from_observations(&batch.observations);
    assert!((summary.total_fuel_g - 1797.485).abs() < 1e-9);
    assert!((summary.total_water_g - 690.055).abs() < 1e-9);

    let peak_fuel = summary.peak_fuel.expect("peak fuel");
    assert_eq!(peak_fuel.value, 310.5);
    assert_eq!(peak_fuel.observation.experiment_id, "exp-0005");
    let peak_water = summary.peak_water.expect("peak water");
    assert_eq!(peak_water.observation.experiment_id, "exp-0005");

    let weeks = aggregate_by_week(&batch.observations);
    let labels: Vec<_> = weeks.iter().map(|w| w.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Jan-07 - Jan-13",
            "Jan-14 - Jan-20",
            "Jan-21 - Jan-27",
            "Jan-28 - Feb-03"
        ]
    );
    assert_eq!(weeks[1].fuel_total_g, 666.25);
    assert_eq!(weeks[1].water_total_g, 228.8);
    assert_eq!(weeks[2].day("Monday").unwrap().fuel_mass_g, 200.0);
    assert_eq!(weeks[3].day("Friday").unwrap().fuel_mass_g, 130.0);

    for week in &weeks {
        assert_eq!(week.daily_aggregates.len(), 7);
        let daily: f64 = week.daily_aggregates.iter().map(|d| d.fuel_mass_g).sum();
        assert!((daily - week.fuel_total_g).abs() <= 0.01);
    }
    let counted: usize = weeks.iter().map(|w| w.source_observations.len()).sum();
    assert_eq!(counted, batch.observations.len());
}

#[tokio::test]
async fn test_dashboard_from_file_source() {
    let config = DashboardConfig {
        source: FIXTURE.to_string(),
        ..DashboardConfig::default()
    };
    let client = BasicClient::new(&config).expect("client");

    let state = load_dataset(&client, &config.source).await;
    assert!(matches!(state, DataState::Loaded(_)));

    let out = render_dashboard(&state, &WeekSelection::Latest, &TableState::default())
        .expect("render");

    assert!(out.contains("Total Fuel Production    1,797.485g"));
    assert!(out.contains("Peak Fuel Production     310.5g : Jan 14, 2024 8:00 AM"));
    assert!(out.contains("2 malformed records were skipped."));
    assert!(out.contains("Weekly Fuel and Water Production\nJan-28 - Feb-03\n"));
    assert!(out.contains("Page 1 of 2 (12 rows)  Next >"));
    assert!(out.contains("exp-0012"));
    assert!(!out.contains("exp-0001"));
}

#[tokio::test]
async fn test_dashboard_missing_source_renders_failure() {
    let config = DashboardConfig::default();
    let client = BasicClient::new(&config).expect("client");

    let state = load_dataset(&client, "tests/fixtures/does_not_exist.json").await;
    let out = render_dashboard(&state, &WeekSelection::Latest, &TableState::default())
        .expect("render");

    assert!(out.starts_with("Failed to load experiment data:"));
}
