//! R tokenizer.
//!
//! Works over a character slice so token ranges are character offsets, the
//! coordinate space of the buffer. Whitespace other than `\n` is skipped;
//! comments are emitted as tokens so the parser can index them.

use rsense_primitives::TextRange;

use crate::error::{ParseError, Result};
use crate::kind::TokenKind;

/// A lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub range: TextRange,
	/// False for strings and backtick names that run to end of input.
	pub terminated: bool,
}

/// Returns true for characters that may continue an identifier.
#[inline]
pub fn is_ident_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '.' || ch == '_'
}

/// Returns true for characters that may start an identifier.
#[inline]
pub fn is_ident_start(ch: char) -> bool {
	ch.is_alphabetic() || ch == '.'
}

/// Tokenizes `chars`, offsetting every range by `base`.
pub fn tokenize(chars: &[char], base: usize) -> Result<Vec<Token>> {
	let mut lexer = Lexer::new(chars, base);
	let mut tokens = Vec::new();
	while let Some(token) = lexer.next_token()? {
		tokens.push(token);
	}
	Ok(tokens)
}

pub struct Lexer<'a> {
	chars: &'a [char],
	pos: usize,
	base: usize,
}

impl<'a> Lexer<'a> {
	pub fn new(chars: &'a [char], base: usize) -> Self {
		Self { chars, pos: 0, base }
	}

	#[inline]
	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	#[inline]
	fn peek_at(&self, n: usize) -> Option<char> {
		self.chars.get(self.pos + n).copied()
	}

	#[inline]
	fn eat(&mut self, ch: char) -> bool {
		if self.peek() == Some(ch) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
		while self.peek().is_some_and(&pred) {
			self.pos += 1;
		}
	}

	/// Produces the next token, or `None` at end of input.
	pub fn next_token(&mut self) -> Result<Option<Token>> {
		self.eat_while(|ch| ch != '\n' && ch.is_whitespace());

		let start = self.pos;
		let Some(ch) = self.peek() else {
			return Ok(None);
		};
		if ch == '\0' {
			return Err(ParseError::InvalidEncoding { offset: self.base + start });
		}

		self.pos += 1;
		let mut terminated = true;
		let kind = match ch {
			'\n' => TokenKind::Newline,
			'#' => {
				self.eat_while(|ch| ch != '\n' && ch != '\r' && ch != '\0');
				if self.peek() == Some('\0') {
					return Err(ParseError::InvalidEncoding { offset: self.base + self.pos });
				}
				TokenKind::Comment
			}
			'"' | '\'' => {
				terminated = self.quoted(ch)?;
				TokenKind::String
			}
			'`' => {
				terminated = self.quoted('`')?;
				TokenKind::Identifier
			}
			'r' | 'R' if matches!(self.peek(), Some('"' | '\'')) && self.raw_string_opener().is_some() => {
				terminated = self.raw_string()?;
				TokenKind::String
			}
			'0'..='9' => self.number(ch),
			'.' if self.peek().is_some_and(|ch| ch.is_ascii_digit()) => self.number(ch),
			ch if is_ident_start(ch) => {
				self.eat_while(is_ident_char);
				let word: String = self.chars[start..self.pos].iter().collect();
				TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier)
			}
			'(' => TokenKind::LParen,
			')' => TokenKind::RParen,
			'{' => TokenKind::LBrace,
			'}' => TokenKind::RBrace,
			'[' if self.eat('[') => TokenKind::LDoubleBracket,
			'[' => TokenKind::LBracket,
			']' => TokenKind::RBracket,
			',' => TokenKind::Comma,
			';' => TokenKind::Semicolon,
			'<' if self.peek() == Some('<') && self.peek_at(1) == Some('-') => {
				self.pos += 2;
				TokenKind::SuperAssign
			}
			'<' if self.eat('-') => TokenKind::LeftAssign,
			'<' if self.eat('=') => TokenKind::Le,
			'<' => TokenKind::Lt,
			'-' if self.peek() == Some('>') && self.peek_at(1) == Some('>') => {
				self.pos += 2;
				TokenKind::SuperRightAssign
			}
			'-' if self.eat('>') => TokenKind::RightAssign,
			'-' => TokenKind::Minus,
			'>' if self.eat('=') => TokenKind::Ge,
			'>' => TokenKind::Gt,
			'=' if self.eat('=') => TokenKind::Eq,
			'=' => TokenKind::EqualsAssign,
			'!' if self.eat('=') => TokenKind::NotEq,
			'!' => TokenKind::Bang,
			'&' if self.eat('&') => TokenKind::AndAnd,
			'&' => TokenKind::And,
			'|' if self.eat('|') => TokenKind::OrOr,
			'|' if self.eat('>') => TokenKind::Pipe,
			'|' => TokenKind::Or,
			':' if self.peek() == Some(':') && self.peek_at(1) == Some(':') => {
				self.pos += 2;
				TokenKind::TripleColon
			}
			':' if self.eat(':') => TokenKind::DoubleColon,
			':' => TokenKind::Colon,
			'+' => TokenKind::Plus,
			'*' => TokenKind::Star,
			'/' => TokenKind::Slash,
			'^' => TokenKind::Caret,
			'~' => TokenKind::Tilde,
			'?' => TokenKind::Question,
			'$' => TokenKind::Dollar,
			'@' => TokenKind::At,
			'\\' => TokenKind::Backslash,
			'%' => self.special(),
			_ => TokenKind::Unknown,
		};

		Ok(Some(Token {
			kind,
			range: TextRange::new(self.base + start, self.base + self.pos),
			terminated,
		}))
	}

	/// Consumes a quoted body after the opening `quote`. Returns whether the
	/// closing quote was found.
	fn quoted(&mut self, quote: char) -> Result<bool> {
		while let Some(ch) = self.peek() {
			if ch == '\0' {
				return Err(ParseError::InvalidEncoding { offset: self.base + self.pos });
			}
			self.pos += 1;
			if ch == '\\' {
				if self.peek().is_some_and(|ch| ch != '\0') {
					self.pos += 1;
				}
			} else if ch == quote {
				return Ok(true);
			}
		}
		Ok(false)
	}

	/// Checks for `"---(` after an `r` prefix without consuming anything.
	/// Returns the closing delimiter and dash count.
	fn raw_string_opener(&self) -> Option<(char, usize)> {
		let mut n = 1;
		while self.peek_at(n) == Some('-') {
			n += 1;
		}
		let close = match self.peek_at(n)? {
			'(' => ')',
			'[' => ']',
			'{' => '}',
			_ => return None,
		};
		Some((close, n - 1))
	}

	fn raw_string(&mut self) -> Result<bool> {
		let Some(quote) = self.peek() else {
			return Ok(false);
		};
		let Some((close, dashes)) = self.raw_string_opener() else {
			return Ok(false);
		};
		self.pos += dashes + 2;

		while let Some(ch) = self.peek() {
			if ch == '\0' {
				return Err(ParseError::InvalidEncoding { offset: self.base + self.pos });
			}
			self.pos += 1;
			if ch == close
				&& (0..dashes).all(|i| self.peek_at(i) == Some('-'))
				&& self.peek_at(dashes) == Some(quote)
			{
				self.pos += dashes + 1;
				return Ok(true);
			}
		}
		Ok(false)
	}

	fn number(&mut self, first: char) -> TokenKind {
		if first == '0' && matches!(self.peek(), Some('x' | 'X')) && self.peek_at(1).is_some_and(|ch| ch.is_ascii_hexdigit()) {
			self.pos += 1;
			self.eat_while(|ch| ch.is_ascii_hexdigit());
		} else {
			self.eat_while(|ch| ch.is_ascii_digit());
			if first != '.' && self.eat('.') {
				self.eat_while(|ch| ch.is_ascii_digit());
			} else if first == '.' {
				self.eat_while(|ch| ch.is_ascii_digit());
			}
			if matches!(self.peek(), Some('e' | 'E')) {
				let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
				if self.peek_at(1 + sign).is_some_and(|ch| ch.is_ascii_digit()) {
					self.pos += 1 + sign;
					self.eat_while(|ch| ch.is_ascii_digit());
				}
			}
		}
		let _ = self.eat('L') || self.eat('i');
		TokenKind::Number
	}

	/// `%op%`; a lone `%` without a closing one on the same line is unknown.
	fn special(&mut self) -> TokenKind {
		let close = self.chars[self.pos..]
			.iter()
			.take_while(|&&ch| ch != '\n')
			.position(|&ch| ch == '%');
		match close {
			Some(n) => {
				self.pos += n + 1;
				TokenKind::Special
			}
			None => TokenKind::Unknown,
		}
	}
}
