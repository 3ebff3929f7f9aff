//! Arena syntax tree and structural queries.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]. A tree belongs to
//! exactly one [`Snapshot`] and is never mutated once built; incremental
//! updates produce a new tree.

use rsense_primitives::{CharIdx, Snapshot, TextRange};
use smallvec::SmallVec;

use crate::error::{Diagnostic, TreeViolation};
use crate::kind::{SyntaxKind, TokenKind};

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	#[inline]
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
	pub(crate) kind: SyntaxKind,
	pub(crate) token: Option<TokenKind>,
	pub(crate) range: TextRange,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: SmallVec<[NodeId; 4]>,
}

/// A string literal recorded in the string index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLiteral {
	pub range: TextRange,
	pub terminated: bool,
}

/// A `#` comment, from the `#` to the end of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
	pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
	pub(crate) snapshot: Snapshot,
	pub(crate) nodes: Vec<NodeData>,
	pub(crate) root: NodeId,
	pub(crate) strings: Vec<StringLiteral>,
	pub(crate) comments: Vec<Comment>,
	pub(crate) diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
	/// Snapshot this tree was built from.
	#[inline]
	pub fn snapshot(&self) -> &Snapshot {
		&self.snapshot
	}

	/// Buffer version this tree belongs to.
	#[inline]
	pub fn version(&self) -> u64 {
		self.snapshot.version()
	}

	#[inline]
	pub fn root(&self) -> Node<'_> {
		self.node(self.root)
	}

	#[inline]
	pub fn node(&self, id: NodeId) -> Node<'_> {
		Node { tree: self, id }
	}

	/// Number of nodes in the arena.
	#[inline]
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// String literals in document order.
	pub fn strings(&self) -> &[StringLiteral] {
		&self.strings
	}

	/// Comments in document order.
	pub fn comments(&self) -> &[Comment] {
		&self.comments
	}

	/// Recoverable syntax errors in document order.
	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	/// Returns true if `offset` is strictly between a string's delimiters.
	///
	/// Unterminated strings extend through the end of input, so the end
	/// offset itself is inside.
	pub fn is_position_inside_string(&self, offset: CharIdx) -> bool {
		let idx = self.strings.partition_point(|s| s.range.start() < offset);
		let Some(string) = idx.checked_sub(1).map(|i| self.strings[i]) else {
			return false;
		};
		if string.terminated {
			offset < string.range.end()
		} else {
			offset <= string.range.end()
		}
	}

	/// Comment whose body contains `offset`: after the `#` through the end of
	/// the line.
	pub fn comment_containing(&self, offset: CharIdx) -> Option<&Comment> {
		let idx = self.comments.partition_point(|c| c.range.start() < offset);
		let comment = self.comments.get(idx.checked_sub(1)?)?;
		(offset <= comment.range.end()).then_some(comment)
	}

	/// Returns true if `offset` is inside a string or a comment.
	pub fn is_position_in_string_or_comment(&self, offset: CharIdx) -> bool {
		self.is_position_inside_string(offset) || self.comment_containing(offset).is_some()
	}

	/// Deepest node whose half-open range contains `offset`.
	///
	/// At the end of the text nothing contains the offset, so the search
	/// descends into the rightmost node that ends there instead.
	pub fn node_at(&self, offset: CharIdx) -> Option<Node<'_>> {
		let len = self.snapshot.len();
		if offset > len {
			return None;
		}
		let mut current = self.root();
		loop {
			let children = &self.nodes[current.id.index()].children;
			let next = children
				.iter()
				.copied()
				.find(|&c| self.nodes[c.index()].range.contains(offset))
				.or_else(|| {
					(offset == len)
						.then(|| children.last().copied())
						.flatten()
						.filter(|&c| self.nodes[c.index()].range.end() == len)
				});
			match next {
				Some(id) => current = self.node(id),
				None => return Some(current),
			}
		}
	}

	/// Leaf containing `offset`, or the leaf ending at `offset` when no leaf
	/// contains it.
	pub fn leaf_at(&self, offset: CharIdx) -> Option<Node<'_>> {
		if let Some(node) = self.node_at(offset).filter(|n| n.is_leaf()) {
			return Some(node);
		}
		self.leaves().find(|leaf| leaf.range().end() == offset)
	}

	/// All nodes in pre-order.
	pub fn preorder(&self) -> impl Iterator<Item = Node<'_>> + '_ {
		let mut stack = vec![self.root];
		std::iter::from_fn(move || {
			let id = stack.pop()?;
			stack.extend(self.nodes[id.index()].children.iter().rev().copied());
			Some(self.node(id))
		})
	}

	/// Leaves in document order.
	pub fn leaves(&self) -> impl Iterator<Item = Node<'_>> + '_ {
		self.preorder().filter(Node::is_leaf)
	}

	/// Function definitions in document order.
	pub fn function_definitions(&self) -> impl Iterator<Item = Node<'_>> + '_ {
		self.preorder().filter(|n| n.kind() == SyntaxKind::FunctionDefinition)
	}

	/// Innermost call whose argument list contains `offset`.
	///
	/// The list covers `[after '(', ')']`; an unterminated list covers
	/// everything up to and including its end.
	pub fn call_at(&self, offset: CharIdx) -> Option<Node<'_>> {
		self.node_at(offset)?
			.ancestors()
			.filter(|n| n.kind() == SyntaxKind::Call)
			.find(|call| call.arguments().is_some_and(|args| args.covers_argument_offset(offset)))
	}

	/// Checks range containment, sibling order, parent links and index order.
	pub fn validate(&self) -> Result<(), TreeViolation> {
		let len = self.snapshot.len();
		let root = &self.nodes[self.root.index()];
		if root.range != TextRange::new(0, len) || root.parent.is_some() {
			return Err(TreeViolation::Root { range: root.range, len });
		}

		for (index, node) in self.nodes.iter().enumerate() {
			if node.range.end() > len {
				return Err(TreeViolation::OutOfBounds {
					node: index,
					range: node.range,
					len,
				});
			}
			let mut prev: Option<NodeId> = None;
			for &child in &node.children {
				let data = &self.nodes[child.index()];
				if data.parent.map(NodeId::index) != Some(index) {
					return Err(TreeViolation::ParentLink { node: child.index() });
				}
				if !node.range.contains_range(data.range) {
					return Err(TreeViolation::Escapes {
						parent: index,
						parent_range: node.range,
						child: child.index(),
						child_range: data.range,
					});
				}
				if let Some(prev) = prev
					&& self.nodes[prev.index()].range.end() > data.range.start()
				{
					return Err(TreeViolation::Overlap {
						parent: index,
						left: prev.index(),
						right: child.index(),
					});
				}
				prev = Some(child);
			}
		}

		let mut last_end = 0;
		for range in self.strings.iter().map(|s| s.range).chain(self.comments.iter().map(|c| c.range)) {
			if range.end() > len {
				return Err(TreeViolation::Index { range });
			}
		}
		for range in self.strings.iter().map(|s| s.range) {
			if range.start() < last_end {
				return Err(TreeViolation::Index { range });
			}
			last_end = range.end();
		}
		last_end = 0;
		for range in self.comments.iter().map(|c| c.range) {
			if range.start() < last_end {
				return Err(TreeViolation::Index { range });
			}
			last_end = range.end();
		}
		Ok(())
	}

	/// `(kind, range)` of every node in pre-order.
	///
	/// Two trees with equal shapes describe the same parse regardless of
	/// arena layout.
	pub fn shape(&self) -> Vec<(SyntaxKind, TextRange)> {
		self.preorder().map(|n| (n.kind(), n.range())).collect()
	}
}

/// Borrowed handle to one node.
#[derive(Clone, Copy)]
pub struct Node<'a> {
	tree: &'a SyntaxTree,
	id: NodeId,
}

impl std::fmt::Debug for Node<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}@{:?}", self.kind(), self.range())
	}
}

impl PartialEq for Node<'_> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.tree, other.tree) && self.id == other.id
	}
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
	#[inline]
	fn data(&self) -> &'a NodeData {
		&self.tree.nodes[self.id.index()]
	}

	#[inline]
	pub fn id(&self) -> NodeId {
		self.id
	}

	#[inline]
	pub fn tree(&self) -> &'a SyntaxTree {
		self.tree
	}

	#[inline]
	pub fn kind(&self) -> SyntaxKind {
		self.data().kind
	}

	/// Token kind for leaves.
	#[inline]
	pub fn token(&self) -> Option<TokenKind> {
		self.data().token
	}

	#[inline]
	pub fn range(&self) -> TextRange {
		self.data().range
	}

	#[inline]
	pub fn is_leaf(&self) -> bool {
		self.data().kind.is_leaf()
	}

	pub fn parent(&self) -> Option<Node<'a>> {
		self.data().parent.map(|id| self.tree.node(id))
	}

	pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + use<'a> {
		let tree = self.tree;
		self.data().children.iter().map(move |&id| tree.node(id))
	}

	pub fn child(&self, index: usize) -> Option<Node<'a>> {
		self.data().children.get(index).map(|&id| self.tree.node(id))
	}

	pub fn first_child(&self, kind: SyntaxKind) -> Option<Node<'a>> {
		self.children().find(|c| c.kind() == kind)
	}

	/// Self followed by each parent up to the root.
	pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
		std::iter::successors(Some(*self), |n| n.parent())
	}

	/// Source text covered by this node.
	pub fn text(&self) -> String {
		self.tree.snapshot.slice(self.range())
	}

	/// Returns true if this is a leaf wrapping `kind`.
	#[inline]
	pub fn is_token(&self, kind: TokenKind) -> bool {
		self.token() == Some(kind)
	}

	/// Argument list of a `Call` or `Index` node.
	pub fn arguments(&self) -> Option<Node<'a>> {
		matches!(self.kind(), SyntaxKind::Call | SyntaxKind::Index)
			.then(|| self.first_child(SyntaxKind::ArgumentList))
			.flatten()
	}

	/// Callee expression of a `Call` node.
	pub fn callee(&self) -> Option<Node<'a>> {
		(self.kind() == SyntaxKind::Call).then(|| self.child(0)).flatten()
	}

	/// Returns true if a bracketed list ends with its closing token.
	pub fn is_closed(&self) -> bool {
		self.children().len() > 1
			&& self
				.children()
				.next_back()
				.is_some_and(|last| matches!(last.token(), Some(TokenKind::RParen | TokenKind::RBracket)))
	}

	/// Span between the opening token's end and the list end.
	///
	/// For a closed list this is `[open.end, close.end)`, so the closing
	/// token's own position counts as inside.
	pub fn argument_span(&self) -> TextRange {
		let start = self.child(0).map_or(self.range().start(), |open| open.range().end());
		TextRange::new(start.min(self.range().end()), self.range().end())
	}

	/// Returns true if `offset` falls in this list's argument span; the end
	/// of an unterminated list counts as inside.
	pub fn covers_argument_offset(&self, offset: CharIdx) -> bool {
		let span = self.argument_span();
		if self.is_closed() {
			span.contains(offset)
		} else {
			span.contains_inclusive(offset)
		}
	}
}

#[cfg(test)]
mod tests;
