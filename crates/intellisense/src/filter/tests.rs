use pretty_assertions::assert_eq;

use super::*;
use crate::completion::{CandidateSource, CompletionKind};

fn candidate(label: &str, source: CandidateSource) -> Candidate {
	let kind = match source {
		CandidateSource::Keyword => CompletionKind::Keyword,
		CandidateSource::ArgumentName => CompletionKind::Argument,
		CandidateSource::Index => CompletionKind::Function,
		CandidateSource::Document => CompletionKind::Variable,
	};
	Candidate::new(CompletionItem::new(label, kind), source)
}

fn labels(list: &CompletionList) -> Vec<&str> {
	list.items.iter().map(|i| i.label.as_str()).collect()
}

#[test]
fn test_match_tiers() {
	assert_eq!(match_tier("as.matrix", "as.m", true), Some(MatchTier::Prefix));
	assert_eq!(match_tier("As.Matrix", "as.m", true), Some(MatchTier::Prefix));
	assert_eq!(match_tier("is.matrix", "matrix", true), Some(MatchTier::Fuzzy));
	assert_eq!(match_tier("data.frame", "dfr", true), Some(MatchTier::Fuzzy));
	assert_eq!(match_tier("data.frame", "dfr", false), None);
	assert_eq!(match_tier("mean", "x", true), None);
	assert_eq!(match_tier("anything", "", false), Some(MatchTier::Prefix));
}

#[test]
fn test_prefix_tier_before_fuzzy_then_lexical() {
	let candidates = vec![
		candidate("is.matrix", CandidateSource::Index),
		candidate("matrix", CandidateSource::Index),
		candidate("Mat", CandidateSource::Document),
		candidate("mat.or.vec", CandidateSource::Index),
		candidate("max", CandidateSource::Index),
	];
	let list = rank(candidates, "mat", true, 100);
	assert_eq!(labels(&list), vec!["Mat", "mat.or.vec", "matrix", "is.matrix"]);
	assert!(!list.is_incomplete);
}

#[test]
fn test_duplicates_keep_highest_priority_source() {
	let candidates = vec![
		candidate("x", CandidateSource::Index),
		candidate("x", CandidateSource::Document),
		candidate("x", CandidateSource::Keyword),
		candidate("if", CandidateSource::Keyword),
	];
	let list = rank(candidates, "", true, 100);
	assert_eq!(labels(&list), vec!["if", "x"]);
	assert_eq!(list.items[1].kind, CompletionKind::Variable);
}

#[test]
fn test_truncation_marks_incomplete() {
	let candidates = (0..10).map(|i| candidate(&format!("v{i}"), CandidateSource::Document)).collect();
	let list = rank(candidates, "v", true, 3);
	assert_eq!(labels(&list), vec!["v0", "v1", "v2"]);
	assert!(list.is_incomplete);
}
