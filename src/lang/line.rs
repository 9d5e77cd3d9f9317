use super::detokenize::detokenize;
use super::tokenize::tokenize;
use super::{Error, LineNumber, DIRECT_LINE};

/// ## A tokenized line
///
/// The stored record is `[number hi][number lo][len][tokens][CR]` where
/// `len` counts the tokens and the CR.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: LineNumber,
    tokens: Vec<u8>,
}

impl Line {
    pub fn new(number: LineNumber, tokens: Vec<u8>) -> Line {
        Line { number, tokens }
    }

    pub fn from_str(s: &str) -> Result<Line, Error> {
        tokenize(s)
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    pub fn is_direct(&self) -> bool {
        self.number.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[u8] {
        &self.tokens
    }

    /// Bytes as stored in program memory.
    pub fn record(&self) -> Vec<u8> {
        let number = self.number.unwrap_or(DIRECT_LINE);
        let mut v = Vec::with_capacity(self.tokens.len() + 4);
        v.extend_from_slice(&number.to_be_bytes());
        v.push((self.tokens.len() + 1) as u8);
        v.extend_from_slice(&self.tokens);
        v.push(b'\r');
        v
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = detokenize(&self.tokens);
        match self.number {
            Some(number) if s.is_empty() => write!(f, "{}", number),
            Some(number) => write!(f, "{} {}", number, s),
            None => write!(f, "{}", s),
        }
    }
}
