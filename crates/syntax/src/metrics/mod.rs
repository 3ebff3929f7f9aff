//! Tree update metrics.
//!
//! Counts incremental and full updates, tracks an EMA of their durations and
//! records why full reparses happened.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::incremental::{FullReparseReason, UpdateOutcome};

/// Smoothing factor for Exponential Moving Average.
/// alpha = 2 / (N + 1). For N=10, alpha ~= 0.18.
const EMA_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, Default)]
struct Ema {
	value: f64,
	initialized: bool,
}

impl Ema {
	fn update(&mut self, next: f64) {
		if self.initialized {
			self.value = EMA_ALPHA * next + (1.0 - EMA_ALPHA) * self.value;
		} else {
			self.value = next;
			self.initialized = true;
		}
	}

	fn get(&self) -> Option<f64> {
		self.initialized.then_some(self.value)
	}
}

#[derive(Debug, Clone, Default)]
struct Entry {
	count: u64,
	duration_us: Ema,
}

impl Entry {
	fn record(&mut self, elapsed: Duration) {
		self.count += 1;
		self.duration_us.update(elapsed.as_secs_f64() * 1_000_000.0);
	}

	fn avg_duration(&self) -> Option<Duration> {
		self.duration_us.get().map(|us| Duration::from_secs_f64(us / 1_000_000.0))
	}
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMetrics {
	local: Entry,
	full: Entry,
	reasons: FxHashMap<FullReparseReason, u64>,
}

impl UpdateMetrics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, outcome: UpdateOutcome, elapsed: Duration) {
		match outcome {
			UpdateOutcome::Reused | UpdateOutcome::Incremental => self.local.record(elapsed),
			UpdateOutcome::Full(reason) => {
				self.full.record(elapsed);
				*self.reasons.entry(reason).or_default() += 1;
			}
		}
	}

	/// Updates that reused the previous tree's structure.
	pub fn incremental_count(&self) -> u64 {
		self.local.count
	}

	pub fn full_count(&self) -> u64 {
		self.full.count
	}

	/// Full reparses attributed to `reason`.
	pub fn reason_count(&self, reason: FullReparseReason) -> u64 {
		self.reasons.get(&reason).copied().unwrap_or(0)
	}

	/// Share of updates that took the local path, in `[0, 1]`.
	pub fn incremental_ratio(&self) -> f64 {
		let total = self.local.count + self.full.count;
		if total == 0 {
			return 0.0;
		}
		self.local.count as f64 / total as f64
	}

	pub fn avg_incremental_duration(&self) -> Option<Duration> {
		self.local.avg_duration()
	}

	pub fn avg_full_duration(&self) -> Option<Duration> {
		self.full.avg_duration()
	}
}

#[cfg(test)]
mod tests;
