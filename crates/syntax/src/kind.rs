//! Token and node kinds.

/// Lexical token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	Identifier,
	Number,
	String,
	Comment,
	Newline,

	// Keywords.
	Function,
	If,
	Else,
	For,
	In,
	While,
	Repeat,
	Break,
	Next,
	/// `TRUE`, `FALSE`, `NULL`, `NA*`, `Inf`, `NaN`.
	Constant,

	// Operators.
	LeftAssign,
	SuperAssign,
	RightAssign,
	SuperRightAssign,
	EqualsAssign,
	Eq,
	NotEq,
	Lt,
	Gt,
	Le,
	Ge,
	Plus,
	Minus,
	Star,
	Slash,
	Caret,
	Tilde,
	Question,
	Bang,
	And,
	AndAnd,
	Or,
	OrOr,
	Pipe,
	Colon,
	DoubleColon,
	TripleColon,
	Dollar,
	At,
	/// `%op%`, including `%%`, `%in%` and `%>%`.
	Special,
	/// `\`, the lambda shorthand.
	Backslash,

	// Punctuation.
	LParen,
	RParen,
	LBrace,
	RBrace,
	LBracket,
	LDoubleBracket,
	RBracket,
	Comma,
	Semicolon,

	/// A character that starts no valid token.
	Unknown,
}

impl TokenKind {
	/// Maps an identifier-shaped word to its keyword or constant kind.
	pub fn keyword(word: &str) -> Option<Self> {
		let kind = match word {
			"function" => Self::Function,
			"if" => Self::If,
			"else" => Self::Else,
			"for" => Self::For,
			"in" => Self::In,
			"while" => Self::While,
			"repeat" => Self::Repeat,
			"break" => Self::Break,
			"next" => Self::Next,
			"TRUE" | "FALSE" | "NULL" | "Inf" | "NaN" => Self::Constant,
			"NA" | "NA_integer_" | "NA_real_" | "NA_complex_" | "NA_character_" => Self::Constant,
			_ => return None,
		};
		Some(kind)
	}

	/// Returns true for tokens the parser never sees.
	#[inline]
	pub const fn is_trivia(self) -> bool {
		matches!(self, Self::Comment)
	}

	/// Returns true for reserved words (not constants).
	pub const fn is_keyword(self) -> bool {
		matches!(
			self,
			Self::Function | Self::If | Self::Else | Self::For | Self::In | Self::While | Self::Repeat | Self::Break | Self::Next
		)
	}

	/// Returns true for assignment operators.
	pub const fn is_assignment(self) -> bool {
		matches!(
			self,
			Self::LeftAssign | Self::SuperAssign | Self::RightAssign | Self::SuperRightAssign | Self::EqualsAssign
		)
	}

	/// Returns true for tokens that close a bracketed construct.
	pub const fn is_closer(self) -> bool {
		matches!(self, Self::RParen | Self::RBrace | Self::RBracket)
	}
}

/// Syntax node kinds.
///
/// Interior kinds group children; leaf kinds wrap exactly one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
	Root,
	Block,
	Paren,
	Call,
	Index,
	ArgumentList,
	Argument,
	FunctionDefinition,
	ParameterList,
	Parameter,
	Binary,
	Unary,
	Assignment,
	If,
	For,
	While,
	Repeat,
	Error,

	Identifier,
	Number,
	String,
	Constant,
	Keyword,
	Operator,
	Punctuation,
}

impl SyntaxKind {
	/// Leaf kind wrapping a token of `kind`.
	pub const fn from_token(kind: TokenKind) -> Self {
		match kind {
			TokenKind::Identifier => Self::Identifier,
			TokenKind::Number => Self::Number,
			TokenKind::String => Self::String,
			TokenKind::Constant => Self::Constant,
			TokenKind::Function
			| TokenKind::If
			| TokenKind::Else
			| TokenKind::For
			| TokenKind::In
			| TokenKind::While
			| TokenKind::Repeat
			| TokenKind::Break
			| TokenKind::Next => Self::Keyword,
			TokenKind::LParen
			| TokenKind::RParen
			| TokenKind::LBrace
			| TokenKind::RBrace
			| TokenKind::LBracket
			| TokenKind::LDoubleBracket
			| TokenKind::RBracket
			| TokenKind::Comma
			| TokenKind::Semicolon
			| TokenKind::Newline
			| TokenKind::Comment
			| TokenKind::Unknown => Self::Punctuation,
			_ => Self::Operator,
		}
	}

	/// Returns true for kinds that wrap a single token.
	pub const fn is_leaf(self) -> bool {
		matches!(
			self,
			Self::Identifier | Self::Number | Self::String | Self::Constant | Self::Keyword | Self::Operator | Self::Punctuation
		)
	}
}
