use pretty_assertions::assert_eq;
use rsense_primitives::Snapshot;
use rsense_syntax::parse;

use super::*;
use crate::context::DocumentId;
use crate::index::SymbolIndex;
use crate::signature::FormalParameter;

fn context(text: &str, position: CharIdx) -> IntellisenseContext {
	let tree = parse(&Snapshot::new(text, 0)).unwrap();
	IntellisenseContext::new(DocumentId::from("test.R"), Arc::new(tree), position).unwrap()
}

fn provider(signatures: Vec<FunctionSignature>) -> CallSignatures {
	CallSignatures::new(Arc::new(SymbolIndex::from_signatures(signatures)))
}

async fn help(provider: &CallSignatures, text: &str, position: CharIdx) -> Option<SignatureHelp> {
	provider
		.signature_help(&context(text, position), &CancellationToken::new())
		.await
}

#[test]
fn test_parameter_ranges_point_into_label() {
	let signature = FunctionSignature::new("f", [
		FormalParameter::new("a"),
		FormalParameter::new("b").with_default("TRUE"),
	]);
	let info = SignatureInfo::new(&signature, Some(1));
	assert_eq!(info.label, "f(a, b = TRUE)");
	let slices: Vec<String> = info
		.parameters
		.iter()
		.map(|p| info.label.chars().skip(p.range.0).take(p.range.1 - p.range.0).collect())
		.collect();
	assert_eq!(slices, vec!["a".to_string(), "b = TRUE".to_string()]);
}

#[tokio::test]
async fn test_active_signature_is_first_that_resolves() {
	let provider = provider(vec![
		FunctionSignature::new("f", [FormalParameter::new("x")]).with_package("one"),
		FunctionSignature::new("f", [FormalParameter::new("x"), FormalParameter::new("y")]).with_package("two"),
	]);
	let help = help(&provider, "f(1, 2)", 5).await.unwrap();
	assert_eq!(help.signatures.len(), 2);
	assert_eq!(help.active_signature, 1);
	assert_eq!(help.active_parameter, Some(1));
	assert_eq!(help.signatures[0].current_parameter, None);

	let help = help_or_panic(&provider, "f(|)").await;
	assert_eq!(help.active_signature, 0);
	assert_eq!(help.active_parameter, Some(0));
}

async fn help_or_panic(provider: &CallSignatures, marked: &str) -> SignatureHelp {
	let position = marked.find('|').unwrap();
	help(provider, &marked.replace('|', ""), position).await.unwrap()
}

#[tokio::test]
async fn test_local_definition_shadows_index() {
	let provider = provider(vec![FunctionSignature::new("g", [FormalParameter::new("indexed")]).with_documentation("docs")]);
	let help = help_or_panic(&provider, "g <- function(local) local\ng(|)").await;
	assert_eq!(help.signatures.len(), 1);
	assert_eq!(help.signatures[0].label, "g(local)");
	assert_eq!(help.signatures[0].documentation, None);
}

#[tokio::test]
async fn test_namespaced_callee() {
	let provider = provider(vec![FunctionSignature::new("median", [FormalParameter::new("x"), FormalParameter::new("na.rm")])]);
	let help = help_or_panic(&provider, "stats::median(v, |)").await;
	assert_eq!(help.signatures[0].label, "median(x, na.rm)");
	assert_eq!(help.active_parameter, Some(1));
}

#[tokio::test]
async fn test_unknown_callee_and_outside_call() {
	let provider = provider(Vec::new());
	assert_eq!(help(&provider, "unknown(x)", 8).await, None);
	assert_eq!(help(&provider, "x <- 1", 3).await, None);
}

#[tokio::test]
async fn test_nested_call_resolves_innermost() {
	let provider = provider(vec![
		FunctionSignature::new("outer", [FormalParameter::new("a"), FormalParameter::new("b")]),
		FunctionSignature::new("inner", [FormalParameter::new("z")]),
	]);
	let help = help_or_panic(&provider, "outer(1, inner(|))").await;
	assert_eq!(help.signatures[0].label, "inner(z)");
	let help = help_or_panic(&provider, "outer(1, inner(2)|)").await;
	assert_eq!(help.signatures[0].label, "outer(a, b)");
	assert_eq!(help.active_parameter, Some(1));
}
