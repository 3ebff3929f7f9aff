//! Error-tolerant R parser.
//!
//! A Pratt parser over the significant token stream. Nodes are appended to
//! the arena bottom-up, so a parent always has a higher id than its children.
//! The parser never fails: anything it cannot place becomes an `Error` node
//! and a [`Diagnostic`].

use rsense_primitives::{CharIdx, Snapshot, TextRange};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::error::{Diagnostic, Result};
use crate::kind::{SyntaxKind, TokenKind};
use crate::lexer::{Token, tokenize};
use crate::tree::{Comment, NodeData, NodeId, StringLiteral, SyntaxTree};

type Children = SmallVec<[NodeId; 4]>;

/// Binding power of call and index postfixes.
const POSTFIX_BP: u8 = 34;
/// Minimum binding power of argument values; excludes `=` assignment.
const ARGUMENT_BP: u8 = 7;
/// Expression nesting past which the rest of the bracketed span becomes a
/// single `Error` node.
const MAX_DEPTH: usize = 256;

/// Parses a whole snapshot.
///
/// Deterministic and total for any text without embedded NUL characters.
pub fn parse(snapshot: &Snapshot) -> Result<SyntaxTree> {
	let chars: Vec<char> = snapshot.rope().chars().collect();
	let tokens = tokenize(&chars, 0)?;

	let mut significant = Vec::with_capacity(tokens.len());
	let mut strings = Vec::new();
	let mut comments = Vec::new();
	for token in tokens {
		match token.kind {
			TokenKind::Comment => comments.push(Comment { range: token.range }),
			kind => {
				if kind == TokenKind::String {
					strings.push(StringLiteral {
						range: token.range,
						terminated: token.terminated,
					});
				}
				significant.push(token);
			}
		}
	}

	let mut parser = Parser::new(&significant, chars.len());
	let root = parser.root();
	trace!(
		version = snapshot.version(),
		nodes = parser.nodes.len(),
		errors = parser.diagnostics.len(),
		"syntax.parse"
	);

	Ok(SyntaxTree {
		snapshot: snapshot.clone(),
		nodes: parser.nodes,
		root,
		strings,
		comments,
		diagnostics: parser.diagnostics,
	})
}

/// Infix binding powers `(left, right)`; right-associative operators have
/// `right < left`.
fn infix_bp(kind: TokenKind) -> Option<(u8, u8)> {
	use TokenKind::*;
	let bp = match kind {
		Question => (2, 3),
		EqualsAssign => (6, 5),
		LeftAssign | SuperAssign => (8, 7),
		RightAssign | SuperRightAssign => (9, 10),
		Tilde => (12, 13),
		Or | OrOr => (14, 15),
		And | AndAnd => (16, 17),
		Eq | NotEq | Lt | Gt | Le | Ge => (20, 21),
		Plus | Minus => (22, 23),
		Star | Slash => (24, 25),
		Special | Pipe => (26, 27),
		Colon => (28, 29),
		Caret => (33, 32),
		Dollar | At => (35, 36),
		DoubleColon | TripleColon => (38, 39),
		_ => return None,
	};
	Some(bp)
}

fn prefix_bp(kind: TokenKind) -> Option<u8> {
	match kind {
		TokenKind::Question => Some(3),
		TokenKind::Tilde => Some(13),
		TokenKind::Bang => Some(18),
		TokenKind::Plus | TokenKind::Minus => Some(30),
		_ => None,
	}
}

struct Parser<'t> {
	tokens: &'t [Token],
	pos: usize,
	len: CharIdx,
	/// Newline handling per nesting level; `true` inside `()` and `[]`.
	ignore_newlines: Vec<bool>,
	block_depth: usize,
	/// Current expression nesting.
	depth: usize,
	nodes: Vec<NodeData>,
	diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
	fn new(tokens: &'t [Token], len: CharIdx) -> Self {
		Self {
			tokens,
			pos: 0,
			len,
			ignore_newlines: vec![false],
			block_depth: 0,
			depth: 0,
			nodes: Vec::with_capacity(tokens.len() * 2 + 1),
			diagnostics: Vec::new(),
		}
	}

	fn skip_newlines(&mut self) {
		while self.tokens.get(self.pos).is_some_and(|t| t.kind == TokenKind::Newline) {
			self.pos += 1;
		}
	}

	/// Current token kind, skipping newlines where they are insignificant.
	fn peek(&mut self) -> Option<TokenKind> {
		if self.ignore_newlines.last().copied().unwrap_or(false) {
			self.skip_newlines();
		}
		self.tokens.get(self.pos).map(|t| t.kind)
	}

	/// Kind of the next non-newline token after the current one.
	fn peek_after_current(&self) -> Option<TokenKind> {
		self.tokens[self.pos + 1..]
			.iter()
			.map(|t| t.kind)
			.find(|&k| k != TokenKind::Newline)
	}

	/// Start of the current token, or the text length at end of input.
	fn stop_offset(&self) -> CharIdx {
		self.tokens.get(self.pos).map_or(self.len, |t| t.range.start())
	}

	fn current_range(&self) -> TextRange {
		self.tokens
			.get(self.pos)
			.map_or(TextRange::empty(self.len), |t| t.range)
	}

	/// Turns the current token into a leaf.
	fn bump(&mut self) -> NodeId {
		let Some(&token) = self.tokens.get(self.pos) else {
			return self.node_spanning(SyntaxKind::Error, SmallVec::new(), TextRange::empty(self.len));
		};
		self.pos += 1;
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(NodeData {
			kind: SyntaxKind::from_token(token.kind),
			token: Some(token.kind),
			range: token.range,
			parent: None,
			children: SmallVec::new(),
		});
		id
	}

	fn node(&mut self, kind: SyntaxKind, children: Children) -> NodeId {
		let range = match (children.first(), children.last()) {
			(Some(first), Some(last)) => TextRange::new(
				self.nodes[first.index()].range.start(),
				self.nodes[last.index()].range.end(),
			),
			_ => TextRange::empty(self.stop_offset()),
		};
		self.node_spanning(kind, children, range)
	}

	fn node_spanning(&mut self, kind: SyntaxKind, children: Children, range: TextRange) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		for child in &children {
			self.nodes[child.index()].parent = Some(id);
		}
		self.nodes.push(NodeData {
			kind,
			token: None,
			range,
			parent: None,
			children,
		});
		id
	}

	/// Closes a bracketed construct: its own children when closed, otherwise
	/// everything up to the token that stopped it.
	fn bracketed(&mut self, kind: SyntaxKind, children: Children, closed: bool) -> NodeId {
		if closed {
			return self.node(kind, children);
		}
		let start = children
			.first()
			.map_or(self.stop_offset(), |c| self.nodes[c.index()].range.start());
		let end = self.stop_offset().max(start);
		self.diagnostics.push(Diagnostic {
			range: TextRange::new(start, end),
			message: "unterminated bracket",
		});
		self.node_spanning(kind, children, TextRange::new(start, end))
	}

	fn error(&mut self, range: TextRange, message: &'static str) {
		self.diagnostics.push(Diagnostic { range, message });
	}

	/// Consumes the current token (or expression starting at it) as an
	/// `Error` node.
	fn recover(&mut self, message: &'static str) -> NodeId {
		self.error(self.current_range(), message);
		let inner = match self.expr(0) {
			Some(expr) => expr,
			None => self.bump(),
		};
		self.node(SyntaxKind::Error, smallvec![inner])
	}

	fn root(&mut self) -> NodeId {
		let children = self.sequence(false);
		self.node_spanning(SyntaxKind::Root, children, TextRange::new(0, self.len))
	}

	/// Statements up to end of input, or up to `}` inside a block.
	fn sequence(&mut self, in_block: bool) -> Children {
		let mut children = Children::new();
		loop {
			match self.peek() {
				None => break,
				Some(TokenKind::Newline) => self.pos += 1,
				Some(TokenKind::Semicolon) => children.push(self.bump()),
				Some(TokenKind::RBrace) if in_block => break,
				Some(_) => {
					let statement = match self.expr(0) {
						Some(expr) => expr,
						None => self.recover("unexpected token"),
					};
					children.push(statement);
					match self.peek() {
						None | Some(TokenKind::Newline | TokenKind::Semicolon) => {}
						Some(TokenKind::RBrace) if in_block => {}
						Some(_) => self.error(self.current_range(), "expected newline or ';'"),
					}
				}
			}
		}
		children
	}

	fn expr(&mut self, min_bp: u8) -> Option<NodeId> {
		if self.depth >= MAX_DEPTH {
			return self.too_deep();
		}
		self.depth += 1;
		let node = self.expr_bp(min_bp);
		self.depth -= 1;
		node
	}

	/// Swallows tokens up to the closer of the enclosing bracket as one
	/// `Error` node. `None` when nothing could be consumed.
	fn too_deep(&mut self) -> Option<NodeId> {
		let mut children = Children::new();
		let mut open = 0usize;
		while let Some(kind) = self.tokens.get(self.pos).map(|t| t.kind) {
			match kind {
				TokenKind::Newline => {
					self.pos += 1;
					continue;
				}
				TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => open += 1,
				TokenKind::LDoubleBracket => open += 2,
				TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
					if open == 0 {
						break;
					}
					open -= 1;
				}
				_ => {}
			}
			children.push(self.bump());
		}
		if children.is_empty() {
			return None;
		}
		let node = self.node(SyntaxKind::Error, children);
		self.error(self.nodes[node.index()].range, "nesting too deep");
		Some(node)
	}

	fn expr_bp(&mut self, min_bp: u8) -> Option<NodeId> {
		let mut lhs = self.prefix()?;
		loop {
			let Some(kind) = self.peek() else {
				break;
			};

			if matches!(kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LDoubleBracket) {
				if POSTFIX_BP < min_bp {
					break;
				}
				let args = self.argument_list();
				let node_kind = if kind == TokenKind::LParen {
					SyntaxKind::Call
				} else {
					SyntaxKind::Index
				};
				lhs = self.node(node_kind, smallvec![lhs, args]);
				continue;
			}

			let Some((left_bp, right_bp)) = infix_bp(kind) else {
				break;
			};
			if left_bp < min_bp {
				break;
			}
			let op = self.bump();
			self.skip_newlines();
			let mut children: Children = smallvec![lhs, op];
			match self.expr(right_bp) {
				Some(rhs) => children.push(rhs),
				None => self.error(self.current_range(), "expected expression"),
			}
			let node_kind = if kind.is_assignment() {
				SyntaxKind::Assignment
			} else {
				SyntaxKind::Binary
			};
			lhs = self.node(node_kind, children);
		}
		Some(lhs)
	}

	fn prefix(&mut self) -> Option<NodeId> {
		let kind = self.peek()?;
		let node = match kind {
			TokenKind::Identifier
			| TokenKind::Number
			| TokenKind::String
			| TokenKind::Constant
			| TokenKind::Break
			| TokenKind::Next => self.bump(),
			TokenKind::Function | TokenKind::Backslash => self.function_definition(),
			TokenKind::If => self.if_expr(),
			TokenKind::For => self.for_expr(),
			TokenKind::While => self.while_expr(),
			TokenKind::Repeat => {
				let keyword = self.bump();
				let mut children: Children = smallvec![keyword];
				self.body(&mut children);
				self.node(SyntaxKind::Repeat, children)
			}
			TokenKind::LParen => self.paren(),
			TokenKind::LBrace => self.block(),
			kind => {
				let bp = prefix_bp(kind)?;
				let op = self.bump();
				self.skip_newlines();
				let mut children: Children = smallvec![op];
				match self.expr(bp) {
					Some(operand) => children.push(operand),
					None => self.error(self.current_range(), "expected expression"),
				}
				self.node(SyntaxKind::Unary, children)
			}
		};
		Some(node)
	}

	/// Parses a body expression, which may start on a later line.
	fn body(&mut self, children: &mut Children) {
		self.skip_newlines();
		match self.expr(0) {
			Some(body) => children.push(body),
			None => self.error(self.current_range(), "expected body"),
		}
	}

	/// `(expr)` as direct children of a control-flow node.
	fn condition(&mut self, children: &mut Children) -> bool {
		if self.peek() != Some(TokenKind::LParen) {
			self.error(self.current_range(), "expected '('");
			return false;
		}
		children.push(self.bump());
		self.ignore_newlines.push(true);
		if let Some(cond) = self.expr(0) {
			children.push(cond);
		}
		let closed = self.close_paren(children);
		self.ignore_newlines.pop();
		closed
	}

	/// Recovers until `)` and consumes it.
	fn close_paren(&mut self, children: &mut Children) -> bool {
		loop {
			match self.peek() {
				Some(TokenKind::RParen) => {
					children.push(self.bump());
					return true;
				}
				None | Some(TokenKind::RBrace) => {
					self.error(self.current_range(), "expected ')'");
					return false;
				}
				Some(_) => children.push(self.recover("expected ')'")),
			}
		}
	}

	fn paren(&mut self) -> NodeId {
		let open = self.bump();
		let mut children: Children = smallvec![open];
		self.ignore_newlines.push(true);
		match self.expr(0) {
			Some(inner) => children.push(inner),
			None => self.error(self.current_range(), "expected expression"),
		}
		let closed = self.close_paren(&mut children);
		self.ignore_newlines.pop();
		self.bracketed(SyntaxKind::Paren, children, closed)
	}

	fn block(&mut self) -> NodeId {
		let open = self.bump();
		let mut children: Children = smallvec![open];
		self.ignore_newlines.push(false);
		self.block_depth += 1;
		children.extend(self.sequence(true));
		let closed = self.peek() == Some(TokenKind::RBrace);
		if closed {
			children.push(self.bump());
		}
		self.block_depth -= 1;
		self.ignore_newlines.pop();
		self.bracketed(SyntaxKind::Block, children, closed)
	}

	fn function_definition(&mut self) -> NodeId {
		let keyword = self.bump();
		let mut children: Children = smallvec![keyword];
		if self.peek() == Some(TokenKind::LParen) {
			children.push(self.parameter_list());
		} else {
			self.error(self.current_range(), "expected '('");
		}
		self.body(&mut children);
		self.node(SyntaxKind::FunctionDefinition, children)
	}

	fn parameter_list(&mut self) -> NodeId {
		let open = self.bump();
		let mut children: Children = smallvec![open];
		self.ignore_newlines.push(true);
		let closed = loop {
			match self.peek() {
				Some(TokenKind::RParen) => {
					children.push(self.bump());
					break true;
				}
				None | Some(TokenKind::RBrace) => break false,
				Some(TokenKind::Comma) => children.push(self.bump()),
				Some(TokenKind::Identifier) => {
					let name = self.bump();
					let mut parameter: Children = smallvec![name];
					if self.peek() == Some(TokenKind::EqualsAssign) {
						parameter.push(self.bump());
						match self.expr(ARGUMENT_BP) {
							Some(default) => parameter.push(default),
							None => self.error(self.current_range(), "expected default value"),
						}
					}
					children.push(self.node(SyntaxKind::Parameter, parameter));
				}
				Some(_) => children.push(self.recover("expected parameter")),
			}
		};
		self.ignore_newlines.pop();
		self.bracketed(SyntaxKind::ParameterList, children, closed)
	}

	fn if_expr(&mut self) -> NodeId {
		let keyword = self.bump();
		let mut children: Children = smallvec![keyword];
		self.condition(&mut children);
		self.body(&mut children);

		let resume = self.pos;
		if self.block_depth > 0 {
			self.skip_newlines();
		}
		if self.peek() == Some(TokenKind::Else) {
			children.push(self.bump());
			self.body(&mut children);
		} else {
			self.pos = resume;
		}
		self.node(SyntaxKind::If, children)
	}

	fn for_expr(&mut self) -> NodeId {
		let keyword = self.bump();
		let mut children: Children = smallvec![keyword];
		if self.peek() == Some(TokenKind::LParen) {
			children.push(self.bump());
			self.ignore_newlines.push(true);
			if self.peek() == Some(TokenKind::Identifier) {
				children.push(self.bump());
			} else {
				self.error(self.current_range(), "expected loop variable");
			}
			if self.peek() == Some(TokenKind::In) {
				children.push(self.bump());
				if let Some(seq) = self.expr(0) {
					children.push(seq);
				}
			} else {
				self.error(self.current_range(), "expected 'in'");
			}
			self.close_paren(&mut children);
			self.ignore_newlines.pop();
		} else {
			self.error(self.current_range(), "expected '('");
		}
		self.body(&mut children);
		self.node(SyntaxKind::For, children)
	}

	fn while_expr(&mut self) -> NodeId {
		let keyword = self.bump();
		let mut children: Children = smallvec![keyword];
		self.condition(&mut children);
		self.body(&mut children);
		self.node(SyntaxKind::While, children)
	}

	/// `(args)`, `[args]` or `[[args]]` after a callee.
	fn argument_list(&mut self) -> NodeId {
		let open_kind = self.peek();
		let open = self.bump();
		let mut children: Children = smallvec![open];
		self.ignore_newlines.push(true);
		let closer = if open_kind == Some(TokenKind::LParen) {
			TokenKind::RParen
		} else {
			TokenKind::RBracket
		};

		let closed = loop {
			match self.peek() {
				None | Some(TokenKind::RBrace) => break false,
				Some(kind) if kind == closer => {
					children.push(self.bump());
					if open_kind == Some(TokenKind::LDoubleBracket) {
						if self.peek() == Some(TokenKind::RBracket) {
							children.push(self.bump());
						} else {
							self.error(self.current_range(), "expected ']]'");
						}
					}
					break true;
				}
				Some(TokenKind::Comma) => children.push(self.bump()),
				Some(_) => {
					let argument = match self.argument() {
						Some(argument) => argument,
						None => self.recover("expected argument"),
					};
					children.push(argument);
					match self.peek() {
						None | Some(TokenKind::Comma | TokenKind::RBrace) => {}
						Some(kind) if kind == closer => {}
						Some(_) => self.error(self.current_range(), "expected ','"),
					}
				}
			}
		};
		self.ignore_newlines.pop();
		self.bracketed(SyntaxKind::ArgumentList, children, closed)
	}

	/// Positional `expr`, named `name = expr`, or `name =` with no value.
	fn argument(&mut self) -> Option<NodeId> {
		let kind = self.peek()?;
		let named = matches!(kind, TokenKind::Identifier | TokenKind::String | TokenKind::Constant)
			&& self.peek_after_current() == Some(TokenKind::EqualsAssign);
		if named {
			let name = self.bump();
			self.skip_newlines();
			let equals = self.bump();
			let mut children: Children = smallvec![name, equals];
			if let Some(value) = self.expr(ARGUMENT_BP) {
				children.push(value);
			}
			return Some(self.node(SyntaxKind::Argument, children));
		}
		let value = self.expr(ARGUMENT_BP)?;
		Some(self.node(SyntaxKind::Argument, smallvec![value]))
	}
}

#[cfg(test)]
mod tests;
