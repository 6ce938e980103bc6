//! Malformed parameter sets must fail fast with a configuration error.

use fitdata_core::{
    config::{AddonConfig, CheckinWindow, SimConfig},
    customer_generator::CustomerGenerator,
    engine::GenEngine,
    error::GenError,
    subscription_simulator::SubscriptionSimulator,
    types::{AccessType, AddonType, Segment},
    visit_simulator::VisitSimulator,
};

fn assert_config_error(config: SimConfig, needle: &str) {
    match config.validate() {
        Err(GenError::Config { reason }) => assert!(
            reason.contains(needle),
            "expected reason mentioning '{needle}', got '{reason}'"
        ),
        other => panic!("expected config error mentioning '{needle}', got {other:?}"),
    }
}

#[test]
fn reference_parameters_are_valid() {
    SimConfig::default().validate().unwrap();
}

#[test]
fn zero_segment_share_is_rejected() {
    let mut config = SimConfig::default();
    config.segments[2].population_share = 0.0;
    assert_config_error(config, "population share of 'senior'");
}

#[test]
fn negative_plan_weight_is_rejected() {
    let mut config = SimConfig::default();
    config.segments[0].plan_weights[1] = -0.15;
    assert_config_error(config, "plan weights of 'student'");
}

#[test]
fn plan_weights_must_match_catalog() {
    let mut config = SimConfig::default();
    config.segments[1].plan_weights.pop();
    assert_config_error(config, "catalog has 4 plans");
}

#[test]
fn unnormalized_weights_are_accepted() {
    let mut config = SimConfig::default();
    for seg in &mut config.segments {
        for w in &mut seg.plan_weights {
            *w *= 3.0;
        }
    }
    config.genders[0].share = 52.0;
    config.genders[1].share = 48.0;
    config.validate().unwrap();
}

#[test]
fn nan_gender_share_is_rejected() {
    let mut config = SimConfig::default();
    config.genders[0].share = f64::NAN;
    assert_config_error(config, "gender shares");
}

#[test]
fn hazard_outside_unit_interval_is_rejected() {
    let mut config = SimConfig::default();
    config.plans[3].monthly_churn_hazard = 1.5;
    assert_config_error(config, "churn hazard of plan 4");
}

#[test]
fn missing_addon_rate_is_rejected() {
    let mut config = SimConfig::default();
    config.addons[0].adoption.remove(&Segment::Adult);
    assert_config_error(config, "no adoption rate for segment 'adult'");
}

#[test]
fn empty_age_range_is_rejected() {
    let mut config = SimConfig::default();
    config.segments[0].age_max = config.segments[0].age_min;
    assert_config_error(config, "age range");
}

#[test]
fn inverted_horizon_is_rejected() {
    let mut config = SimConfig::default();
    std::mem::swap(&mut config.horizon.start, &mut config.horizon.end);
    assert_config_error(config, "horizon");
}

#[test]
fn invalid_checkin_window_is_rejected() {
    let mut config = SimConfig::default();
    config
        .visits
        .checkin_windows
        .insert(AccessType::OffPeak, CheckinWindow::uniform([7, 24]));
    assert_config_error(config, "contains hour 24");

    let mut config = SimConfig::default();
    config.visits.checkin_windows.remove(&AccessType::OffPeak);
    assert_config_error(config, "no check-in window for access type 'off_peak'");
}

#[test]
fn zero_duration_std_is_rejected() {
    let mut config = SimConfig::default();
    config.visits.duration_std = 0.0;
    assert_config_error(config, "visit duration");
}

#[test]
fn repeated_addon_type_is_rejected() {
    let mut config = SimConfig::default();
    config.addons.push(AddonConfig::uniform(AddonType::Drinks, 999, 1.0));
    assert_config_error(config, "add-on 'drinks' listed twice");
}

#[test]
fn repeated_fixed_cost_is_rejected() {
    let mut config = SimConfig::default();
    let rent = config.fixed_costs[0].clone();
    config.fixed_costs.push(rent);
    assert_config_error(config, "fixed cost 'rent' listed twice");
}

#[test]
fn stages_refuse_to_build_on_bad_config() {
    let mut config = SimConfig::default();
    config.segments[0].age_max = config.segments[0].age_min;

    assert!(matches!(CustomerGenerator::new(&config), Err(GenError::Config { .. })));
    assert!(matches!(SubscriptionSimulator::new(&config), Err(GenError::Config { .. })));
    assert!(matches!(VisitSimulator::new(&config), Err(GenError::Config { .. })));
}

#[test]
fn engine_refuses_to_build_on_bad_config() {
    let mut config = SimConfig::default();
    config.plans.clear();
    let result = GenEngine::build(42, config);
    assert!(matches!(result, Err(GenError::Config { .. })));
}

#[test]
fn config_round_trips_through_json_file() {
    let path = std::env::temp_dir().join(format!("fitdata-config-{}.json", std::process::id()));
    let json = serde_json::to_string_pretty(&SimConfig::default()).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = SimConfig::load(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    loaded.validate().unwrap();
    assert_eq!(loaded.population, 2500);
    assert_eq!(loaded.plans.len(), 4);
    assert_eq!(loaded.visits.checkin_windows[&AccessType::OffPeak].hours, (7..=16).collect::<Vec<_>>());
}

#[test]
fn missing_config_file_names_the_path() {
    let err = SimConfig::load("/nonexistent/fitdata.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/fitdata.json"));
}
