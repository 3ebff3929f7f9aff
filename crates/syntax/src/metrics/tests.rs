use super::*;

#[test]
fn test_counts_by_outcome_and_reason() {
	let mut metrics = UpdateMetrics::new();
	metrics.record(UpdateOutcome::Incremental, Duration::from_micros(10));
	metrics.record(UpdateOutcome::Reused, Duration::from_micros(1));
	metrics.record(UpdateOutcome::Full(FullReparseReason::StructuralEdit), Duration::from_micros(100));

	assert_eq!(metrics.incremental_count(), 2);
	assert_eq!(metrics.full_count(), 1);
	assert_eq!(metrics.reason_count(FullReparseReason::StructuralEdit), 1);
	assert_eq!(metrics.reason_count(FullReparseReason::Disabled), 0);
	assert!((metrics.incremental_ratio() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_ema_seeds_with_first_sample() {
	let mut metrics = UpdateMetrics::new();
	assert_eq!(metrics.avg_full_duration(), None);

	metrics.record(UpdateOutcome::Full(FullReparseReason::Disabled), Duration::from_millis(10));
	let first = metrics.avg_full_duration().unwrap();
	assert!((first.as_secs_f64() - 0.010).abs() < 1e-9);

	metrics.record(UpdateOutcome::Full(FullReparseReason::Disabled), Duration::from_millis(20));
	// 0.2 * 20 + 0.8 * 10
	let second = metrics.avg_full_duration().unwrap();
	assert!((second.as_secs_f64() - 0.012).abs() < 1e-9);
}

#[test]
fn test_empty_ratio_is_zero() {
	assert_eq!(UpdateMetrics::new().incremental_ratio(), 0.0);
}
