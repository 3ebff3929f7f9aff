//! Symbols defined in the document itself.

use rsense_primitives::CharIdx;
use rsense_syntax::{Node, SyntaxKind, SyntaxTree, TokenKind};

use crate::signature::{FormalParameter, FunctionSignature};

/// Name written by an identifier or string leaf, without backticks or
/// quotes.
pub fn symbol_name(node: Node<'_>) -> Option<String> {
	let text = node.text();
	match node.kind() {
		SyntaxKind::Identifier => Some(strip_delimiters(&text, '`').to_string()),
		SyntaxKind::String => {
			let quote = text.chars().next()?;
			matches!(quote, '"' | '\'').then(|| strip_delimiters(&text, quote).to_string())
		}
		_ => None,
	}
}

fn strip_delimiters(text: &str, delimiter: char) -> &str {
	let inner = text.strip_prefix(delimiter).unwrap_or(text);
	inner.strip_suffix(delimiter).unwrap_or(inner)
}

/// Function name a call's callee refers to; `pkg::name` resolves to `name`.
pub fn callee_name(callee: Node<'_>) -> Option<String> {
	match callee.kind() {
		SyntaxKind::Identifier | SyntaxKind::String => symbol_name(callee),
		SyntaxKind::Binary => {
			let op = callee.child(1)?;
			if op.is_token(TokenKind::DoubleColon) || op.is_token(TokenKind::TripleColon) {
				symbol_name(callee.child(2)?)
			} else {
				None
			}
		}
		_ => None,
	}
}

/// An assignment binding a name.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
	pub target: Node<'a>,
	pub value: Node<'a>,
}

impl<'a> Binding<'a> {
	/// Reads `name <- value`, `name = value` or `value -> name`.
	pub fn from_assignment(node: Node<'a>) -> Option<Self> {
		if node.kind() != SyntaxKind::Assignment {
			return None;
		}
		let op = node.child(1)?.token()?;
		let (target, value) = match op {
			TokenKind::LeftAssign | TokenKind::SuperAssign | TokenKind::EqualsAssign => (node.child(0)?, node.child(2)?),
			TokenKind::RightAssign | TokenKind::SuperRightAssign => (node.child(2)?, node.child(0)?),
			_ => return None,
		};
		Some(Self {
			target,
			value: unparenthesized(value),
		})
	}

	pub fn name(&self) -> Option<String> {
		symbol_name(self.target)
	}

	pub fn is_function(&self) -> bool {
		self.value.kind() == SyntaxKind::FunctionDefinition
	}
}

/// Strips grouping parentheses: `(function(x) x)` yields the definition.
fn unparenthesized(mut node: Node<'_>) -> Node<'_> {
	while node.kind() == SyntaxKind::Paren
		&& let Some(inner) = node.child(1).filter(|n| !n.is_leaf())
	{
		node = inner;
	}
	node
}

/// Assignments in document order.
pub fn bindings(tree: &SyntaxTree) -> impl Iterator<Item = Binding<'_>> + '_ {
	tree.preorder().filter_map(Binding::from_assignment)
}

/// Formal parameters of a `function(...)` node.
pub fn formal_parameters(definition: Node<'_>) -> Vec<FormalParameter> {
	let Some(list) = definition.first_child(SyntaxKind::ParameterList) else {
		return Vec::new();
	};
	list.children()
		.filter(|n| n.kind() == SyntaxKind::Parameter)
		.filter_map(|parameter| {
			let mut formal = FormalParameter::new(symbol_name(parameter.child(0)?)?);
			if let Some(default) = parameter.child(2) {
				formal = formal.with_default(default.text());
			}
			Some(formal)
		})
		.collect()
}

/// Signature of a function assigned to `name` in the document.
///
/// The last definition starting before `position` wins; when every
/// definition comes later, the first one is used.
pub fn local_signature(tree: &SyntaxTree, name: &str, position: CharIdx) -> Option<FunctionSignature> {
	let mut first = None;
	let mut last_before = None;
	for binding in bindings(tree).filter(Binding::is_function) {
		if binding.name().as_deref() != Some(name) {
			continue;
		}
		first.get_or_insert(binding);
		if binding.target.range().start().min(binding.value.range().start()) < position {
			last_before = Some(binding);
		}
	}
	let binding = last_before.or(first)?;
	Some(FunctionSignature::new(name, formal_parameters(binding.value)))
}

/// What a document symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
	Variable,
	Function,
	Parameter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSymbol {
	pub name: String,
	pub kind: SymbolKind,
}

/// Names visible at `position`: assignment targets anywhere in the
/// document, loop variables, and the parameters of every enclosing function.
pub fn visible_symbols(tree: &SyntaxTree, position: CharIdx) -> Vec<DocumentSymbol> {
	let mut symbols = Vec::new();
	for binding in bindings(tree) {
		if let Some(name) = binding.name() {
			let kind = if binding.is_function() {
				SymbolKind::Function
			} else {
				SymbolKind::Variable
			};
			symbols.push(DocumentSymbol { name, kind });
		}
	}

	for node in tree.preorder().filter(|n| n.kind() == SyntaxKind::For) {
		if let Some(name) = node.child(2).filter(|n| n.kind() == SyntaxKind::Identifier).and_then(symbol_name) {
			symbols.push(DocumentSymbol {
				name,
				kind: SymbolKind::Variable,
			});
		}
	}

	let enclosing = tree
		.node_at(position)
		.into_iter()
		.flat_map(|node| node.ancestors())
		.filter(|n| n.kind() == SyntaxKind::FunctionDefinition);
	for definition in enclosing {
		for formal in formal_parameters(definition) {
			if !formal.is_sink() {
				symbols.push(DocumentSymbol {
					name: formal.name,
					kind: SymbolKind::Parameter,
				});
			}
		}
	}
	symbols
}
