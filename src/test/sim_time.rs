use crate::sim::{SimDuration, SimTime};

#[test]
fn sim_duration_unit_conversions() {
    assert_eq!(SimDuration::from_micros(1), SimDuration(1_000));
    assert_eq!(SimDuration::from_millis(1), SimDuration(1_000_000));
    assert_eq!(SimDuration::from_secs(1), SimDuration(1_000_000_000));
    assert_eq!(SimDuration::from_millis(-1), SimDuration(-1_000_000));
}

#[test]
fn sim_duration_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimDuration::from_micros(i64::MAX), SimDuration(i64::MAX));
    assert_eq!(SimDuration::from_millis(i64::MIN), SimDuration(i64::MIN));
    assert_eq!(SimDuration::from_secs(i64::MAX), SimDuration(i64::MAX));
}

#[test]
fn checked_mul_is_exact_and_reports_overflow() {
    let tick = SimDuration::from_nanos(333_333);
    assert_eq!(tick.checked_mul(3_000), Some(SimDuration(999_999_000)));
    assert_eq!(tick.checked_mul(0), Some(SimDuration::ZERO));
    assert_eq!(SimDuration(i64::MAX).checked_mul(2), None);
    assert_eq!(SimDuration(1).checked_mul(u64::MAX), None);
}

#[test]
fn time_and_duration_arithmetic() {
    let t = SimTime(10) + SimDuration(5);
    assert_eq!(t, SimTime(15));
    assert_eq!(t - SimTime(3), SimDuration(12));
    assert_eq!(t - SimDuration(15), SimTime::ZERO);

    let mut remaining = SimDuration::from_millis(10);
    remaining -= SimDuration::from_millis(3);
    assert_eq!(remaining, SimDuration::from_millis(7));
}

#[test]
fn duration_from_std() {
    let d: SimDuration = std::time::Duration::from_micros(7).into();
    assert_eq!(d, SimDuration(7_000));
    let huge: SimDuration = std::time::Duration::MAX.into();
    assert_eq!(huge, SimDuration(i64::MAX));
}

#[test]
fn checked_add_reports_overflow() {
    assert_eq!(SimTime(1).checked_add(SimDuration(2)), Some(SimTime(3)));
    assert_eq!(SimTime(i64::MAX).checked_add(SimDuration(1)), None);
    assert_eq!(SimDuration(i64::MAX).checked_add(SimDuration(1)), None);
    assert_eq!(SimDuration(4).checked_add(SimDuration(-1)), Some(SimDuration(3)));
}
