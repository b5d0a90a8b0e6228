//! Input cursor
//!
//! The matcher only ever moves forward through the input or jumps back to a saved
//! [Checkpoint]. Positions are character offsets, which is also what error messages report.

/// A saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Cursor {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Next character, without consuming it
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Consume and return the next character
    pub fn skip(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Consume the next character if `accept` says yes
    pub fn skip_if(&mut self, accept: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(c) if accept(c) => self.skip(),
            _ => None,
        }
    }

    /// Consume `literal` if the input continues with exactly that text.
    /// Nothing is consumed on a mismatch.
    pub fn skip_literal(&mut self, literal: &str) -> bool {
        let mut end = self.position;
        for expected in literal.chars() {
            if self.chars.get(end) != Some(&expected) {
                return false;
            }
            end += 1;
        }
        self.position = end;
        true
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Character offset from the start of the input
    pub fn position(&self) -> usize {
        self.position
    }

    /// Unconsumed input
    pub fn rest(&self) -> String {
        self.chars[self.position..].iter().collect()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }
}
