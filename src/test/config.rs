use crate::clock::{DEFAULT_STEADY_START, DEFAULT_WALL_START};
use crate::config::{ConfigError, HarnessConfig};
use crate::sim::{SimDuration, SimTime};

#[test]
fn missing_fields_take_defaults() {
    let cfg = HarnessConfig::from_json_str(r#"{ "default_tick": 250000 }"#).expect("valid");
    assert_eq!(cfg.steady_start, DEFAULT_STEADY_START);
    assert_eq!(cfg.wall_start, DEFAULT_WALL_START);
    assert_eq!(cfg.default_tick, SimDuration::from_micros(250));

    let cfg = HarnessConfig::from_json_str("{}").expect("valid");
    assert_eq!(cfg, HarnessConfig::default());
}

#[test]
fn start_instants_are_nanoseconds() {
    let cfg = HarnessConfig::from_json_str(r#"{ "steady_start": -5, "wall_start": 9 }"#)
        .expect("valid");
    assert_eq!(cfg.steady_start, SimTime(-5));
    assert_eq!(cfg.wall_start, SimTime(9));
}

#[test]
fn non_positive_default_tick_is_rejected() {
    let err = HarnessConfig::from_json_str(r#"{ "default_tick": 0 }"#).expect_err("invalid");
    assert!(matches!(err, ConfigError::NonPositiveTick(SimDuration(0))));
}

#[test]
fn malformed_json_and_missing_file_are_reported() {
    let err = HarnessConfig::from_json_str("{ nope").expect_err("malformed");
    assert!(matches!(err, ConfigError::Json(_)));

    let err = HarnessConfig::from_path("/nonexistent/timesim/harness.json").expect_err("missing");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("harness.json"));
}
