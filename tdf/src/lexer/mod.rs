/*!
# Lexical layer (C1, §4.1)

A code-point reader over an in-memory document. The grammar is defined
over whole documents (§5 concurrency model: synchronous, single
document per parser instance, no streaming-partial-document support per
§1's Non-goals), so the lexer operates directly on a borrowed `&str`
rather than the teacher's incremental byte-buffer-over-`io::Read`
design — "mark/reset" is then just saving and restoring a byte offset.
*/
use crate::error::{ParseError, ParseErrorKind, Position};

/// Sentinel returned by `peek` at end of input.
pub const EOF: char = '\u{0}';

/// Result of [`Lexer::skip_sequence_delimiters`] (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
	/// An explicit `,` was seen: a following item is syntactically
	/// required.
	RequiredNext,
	/// Only line breaks were seen: a following item is permitted but not
	/// required.
	OptionalNext,
	/// Nothing was seen: the sequence ends here.
	None,
}

/// A code-point reader with one-character lookahead and unbounded
/// backtracking (trivial, since the whole document is held in memory).
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
	input: &'a str,
	pos: usize,
}

impl<'a> Lexer<'a> {
	pub fn new(input: &'a str) -> Self {
		Lexer { input, pos: 0 }
	}

	/// Current byte offset, usable with [`Lexer::mark`]/[`Lexer::reset`].
	pub fn mark(&self) -> usize {
		self.pos
	}

	/// The full source text, for slicing out a range between two marks.
	pub fn source(&self) -> &'a str {
		self.input
	}

	/// Rewind to a byte offset previously returned by [`Lexer::mark`].
	pub fn reset(&mut self, mark: usize) {
		self.pos = mark;
	}

	/// The current line/column, computed from the byte offset. Only used
	/// for error reporting, so O(n) recomputation is acceptable.
	pub fn position(&self) -> Position {
		let mut line = 1;
		let mut column = 1;
		for c in self.input[..self.pos].chars() {
			if c == '\n' {
				line += 1;
				column = 1;
			} else {
				column += 1;
			}
		}
		Position { line, column }
	}

	fn err(&self, kind: ParseErrorKind) -> ParseError {
		ParseError::new(self.position(), kind)
	}

	/// Peek at the current character without consuming it. Returns
	/// [`EOF`] at end of input.
	pub fn peek(&self) -> char {
		self.input[self.pos..].chars().next().unwrap_or(EOF)
	}

	/// Peek at the character after the current one, without consuming
	/// anything. Returns [`EOF`] if there is no such character.
	pub fn peek2(&self) -> char {
		let mut chars = self.input[self.pos..].chars();
		chars.next();
		chars.next().unwrap_or(EOF)
	}

	pub fn at_eof(&self) -> bool {
		self.pos >= self.input.len()
	}

	fn advance(&mut self) -> char {
		let c = self.peek();
		if c != EOF {
			self.pos += c.len_utf8();
		}
		c
	}

	/// Read one character, failing at end of input.
	pub fn read_required(&mut self, ctx: &'static str) -> Result<char, ParseError> {
		if self.at_eof() {
			return Err(self.err(ParseErrorKind::UnexpectedEof(ctx)));
		}
		Ok(self.advance())
	}

	/// Read exactly `n` characters, failing at end of input.
	pub fn read_required_count(&mut self, n: usize, ctx: &'static str) -> Result<String, ParseError> {
		let mut out = String::with_capacity(n);
		for _ in 0..n {
			out.push(self.read_required(ctx)?);
		}
		Ok(out)
	}

	/// Consume and return a (possibly empty) run of characters matching
	/// `pred`.
	pub fn read_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
		let start = self.pos;
		while pred(self.peek()) && !self.at_eof() {
			self.advance();
		}
		&self.input[start..self.pos]
	}

	/// Consume and return a (possibly empty) run of characters not
	/// matching `pred`.
	pub fn read_until(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
		self.read_while(|c| !pred(c))
	}

	/// Consume up to (but not including) the first character matching
	/// `pred`, discarding it.
	pub fn reach(&mut self, pred: impl FnMut(char) -> bool) {
		self.read_until(pred);
	}

	/// Assert the current character is `literal` and consume it; error
	/// otherwise.
	pub fn check(&mut self, literal: char, ctx: &'static str) -> Result<(), ParseError> {
		if self.peek() == literal {
			self.advance();
			Ok(())
		} else if self.at_eof() {
			Err(self.err(ParseErrorKind::UnexpectedEof(ctx)))
		} else {
			Err(self.err(ParseErrorKind::MissingDelimiter(literal, ctx)))
		}
	}

	/// Consume `literal` if it is the current character; report whether it
	/// matched.
	pub fn confirm(&mut self, literal: char) -> bool {
		if self.peek() == literal {
			self.advance();
			true
		} else {
			false
		}
	}

	/// Consume and discard whitespace, line endings, and `!...<EOL>` line
	/// comments, leaving position at the next significant character
	/// (§4.1 "Filler and sequence delimiters").
	pub fn skip_filler(&mut self) {
		loop {
			let before = self.pos;
			self.read_while(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r');
			if self.peek() == '!' {
				self.advance();
				self.read_until(|c| c == '\n' || c == '\r' || c == EOF);
			}
			if self.pos == before {
				break;
			}
		}
	}

	/// After an item, consume horizontal whitespace and at most one `,`
	/// plus any number of line breaks; reports which of the three states
	/// from §4.1 was observed.
	pub fn skip_sequence_delimiters(&mut self) -> SequenceState {
		let before = self.pos;
		self.read_while(|c| c == ' ' || c == '\t');
		let saw_comma = self.confirm(',');
		self.skip_filler();
		if saw_comma {
			SequenceState::RequiredNext
		} else if self.pos != before {
			SequenceState::OptionalNext
		} else {
			SequenceState::None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn peek_and_advance() {
		let mut lx = Lexer::new("ab");
		assert_eq!(lx.peek(), 'a');
		assert_eq!(lx.read_required("x").unwrap(), 'a');
		assert_eq!(lx.peek(), 'b');
	}

	#[test]
	fn mark_reset() {
		let mut lx = Lexer::new("abc");
		let m = lx.mark();
		lx.read_required("x").unwrap();
		lx.read_required("x").unwrap();
		lx.reset(m);
		assert_eq!(lx.peek(), 'a');
	}

	#[test]
	fn filler_skips_comments() {
		let mut lx = Lexer::new("  ! a comment\n  x");
		lx.skip_filler();
		assert_eq!(lx.peek(), 'x');
	}

	#[test]
	fn sequence_delimiter_states() {
		let mut lx = Lexer::new(", next");
		assert_eq!(lx.skip_sequence_delimiters(), SequenceState::RequiredNext);
		let mut lx = Lexer::new("\nnext");
		assert_eq!(lx.skip_sequence_delimiters(), SequenceState::OptionalNext);
		let mut lx = Lexer::new("x");
		assert_eq!(lx.skip_sequence_delimiters(), SequenceState::None);
	}
}
