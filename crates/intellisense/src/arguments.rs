//! Matching written arguments to formal parameters.
//!
//! Follows R's matching order: exact names, then unique partial names among
//! the formals before `...`, then positions. Whatever is left over lands in
//! the `...` sink.

use rsense_primitives::CharIdx;
use rsense_syntax::{Node, SyntaxKind, TokenKind};

use crate::signature::FormalParameter;
use crate::symbols::symbol_name;

/// Arguments as written in one call, split at commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArguments {
	/// Name of each slot's argument; `None` for positional or empty slots.
	pub slots: Vec<Option<String>>,
	/// Slot holding the position.
	pub caret: usize,
}

impl WrittenArguments {
	/// Splits an argument list at its commas. The caret slot is the number
	/// of commas ending at or before `position`.
	pub fn from_list(list: Node<'_>, position: CharIdx) -> Self {
		let mut slots = vec![None];
		let mut caret = 0;
		for child in list.children() {
			if child.is_token(TokenKind::Comma) {
				slots.push(None);
				if child.range().end() <= position {
					caret += 1;
				}
			} else if child.kind() == SyntaxKind::Argument
				&& let Some(slot) = slots.last_mut()
			{
				*slot = argument_name(child);
			}
		}
		Self { slots, caret }
	}

	/// Name of the argument under the caret, if it is written `name = `.
	pub fn caret_name(&self) -> Option<&str> {
		self.slots.get(self.caret)?.as_deref()
	}

	pub fn named(&self) -> impl Iterator<Item = &str> + '_ {
		self.slots.iter().flatten().map(String::as_str)
	}

	/// Formal the caret argument binds to.
	pub fn current_parameter(&self, formals: &[FormalParameter]) -> Option<usize> {
		let matcher = Matcher::new(formals);
		if let Some(name) = self.caret_name() {
			return matcher.by_name(name, &[]).or(matcher.sink);
		}

		let mut used = vec![false; formals.len()];
		for name in self.named() {
			if let Some(i) = matcher.by_name(name, &used) {
				used[i] = true;
			}
		}

		let mut next = 0;
		for (index, slot) in self.slots.iter().enumerate().take(self.caret + 1) {
			if slot.is_some() {
				continue;
			}
			while next < matcher.positional && used[next] {
				next += 1;
			}
			if index == self.caret {
				return if next < matcher.positional {
					Some(next)
				} else {
					matcher.sink
				};
			}
			if next < matcher.positional {
				used[next] = true;
				next += 1;
			}
		}
		None
	}
}

fn argument_name(argument: Node<'_>) -> Option<String> {
	let equals = argument.child(1)?;
	if !equals.is_token(TokenKind::EqualsAssign) {
		return None;
	}
	symbol_name(argument.child(0)?)
}

struct Matcher<'a> {
	formals: &'a [FormalParameter],
	sink: Option<usize>,
	/// Formals before the sink; the only ones matched by position or
	/// partial name.
	positional: usize,
}

impl<'a> Matcher<'a> {
	fn new(formals: &'a [FormalParameter]) -> Self {
		let sink = formals.iter().position(FormalParameter::is_sink);
		Self {
			formals,
			sink,
			positional: sink.unwrap_or(formals.len()),
		}
	}

	/// Exact match, else a unique unused partial match before the sink.
	fn by_name(&self, name: &str, used: &[bool]) -> Option<usize> {
		let is_used = |i: usize| used.get(i).copied().unwrap_or(false);
		if let Some(i) = self.formals.iter().position(|f| !f.is_sink() && f.name == name) {
			return Some(i);
		}
		let mut partial = (0..self.positional).filter(|&i| !is_used(i) && self.formals[i].name.starts_with(name));
		let first = partial.next()?;
		partial.next().is_none().then_some(first)
	}
}

#[cfg(test)]
mod tests;
