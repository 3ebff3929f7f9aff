//! Completion filtering and ranking.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::completion::{Candidate, CompletionItem, CompletionList};

/// How well a label matched the typed prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
	/// The label starts with the query, ignoring case.
	Prefix,
	/// The query appears in the label, contiguously or as a subsequence.
	Fuzzy,
}

/// Classifies `label` against `query`; `None` if it does not match.
pub fn match_tier(label: &str, query: &str, fuzzy: bool) -> Option<MatchTier> {
	if query.is_empty() {
		return Some(MatchTier::Prefix);
	}
	let label = label.to_lowercase();
	let query = query.to_lowercase();
	if label.starts_with(&query) {
		return Some(MatchTier::Prefix);
	}
	if fuzzy && (label.contains(&query) || is_subsequence(&query, &label)) {
		return Some(MatchTier::Fuzzy);
	}
	None
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
	let mut haystack = haystack.chars();
	needle.chars().all(|n| haystack.any(|h| h == n))
}

/// Deduplicates by label, filters by `query`, sorts and truncates.
///
/// Among candidates sharing a label the highest-priority source wins. Prefix
/// matches come before fuzzy ones; each tier is sorted case-insensitively.
pub fn rank(candidates: Vec<Candidate>, query: &str, fuzzy: bool, max_items: usize) -> CompletionList {
	let mut best: FxHashMap<String, Candidate> = FxHashMap::default();
	for candidate in candidates {
		match best.get(&candidate.item.label) {
			Some(existing) if existing.source.priority() >= candidate.source.priority() => {}
			_ => {
				best.insert(candidate.item.label.clone(), candidate);
			}
		}
	}

	let mut matched: Vec<(MatchTier, String, CompletionItem)> = best
		.into_values()
		.filter_map(|c| {
			let tier = match_tier(&c.item.label, query, fuzzy)?;
			Some((tier, c.item.label.to_lowercase(), c.item))
		})
		.collect();
	matched.sort_by(compare);

	let is_incomplete = matched.len() > max_items;
	matched.truncate(max_items);
	CompletionList {
		items: matched.into_iter().map(|(_, _, item)| item).collect(),
		is_incomplete,
	}
}

fn compare(a: &(MatchTier, String, CompletionItem), b: &(MatchTier, String, CompletionItem)) -> Ordering {
	a.0.cmp(&b.0)
		.then_with(|| a.1.cmp(&b.1))
		.then_with(|| a.2.label.cmp(&b.2.label))
}

#[cfg(test)]
mod tests;
