//! Recursive-descent parser for factored words.
//!
//! Grammar (whitespace is ignored between tokens):
//!
//! ```text
//! word      := '<identity' ... '>' | product
//! product   := factor ('*' factor)*
//! factor    := atom ('^' exponent)?
//! atom      := generator | '(' product ')'
//! generator := 'x' digits? | 'y' | 'z'
//! exponent  := '-'? digits
//! ```
//!
//! Bracketed groups are expanded in place. A negative group exponent repeats the
//! group's formal inverse: token order reversed, every exponent negated.

use std::fmt;

use thiserror::Error;

/// Cap on the expanded token count of one word.
const MAX_TOKENS: usize = 1 << 20;

/// Generator letters of the automorphism group alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Letter {
    /// `x1` / `x`: the length-d cycle on the ground set.
    Cycle,
    /// `x2` / `y`: the transposition of ground elements 0 and 1.
    Swap,
    /// `x3` / `z`: the global complement (d = 2k only).
    Complement,
}

/// One generator power; `pos` is the byte offset of the generator in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub letter: Letter,
    pub exp: i64,
    pub pos: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordErrorKind {
    UnexpectedChar(char),
    UnexpectedEnd,
    UnbalancedParen,
    MissingExponent,
    ExponentOverflow,
    EmptyWord,
    TrailingInput,
    UnknownGenerator(String),
    /// The complement letter was used on a hypersimplex with d != 2k.
    NoComplement,
    TooLong,
}

impl fmt::Display for WordErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::UnbalancedParen => write!(f, "unbalanced parenthesis"),
            Self::MissingExponent => write!(f, "expected exponent digits after '^'"),
            Self::ExponentOverflow => write!(f, "exponent out of range"),
            Self::EmptyWord => write!(f, "empty word"),
            Self::TrailingInput => write!(f, "trailing input"),
            Self::UnknownGenerator(g) => write!(f, "unknown generator `{g}`"),
            Self::NoComplement => write!(f, "complement generator needs d = 2k"),
            Self::TooLong => write!(f, "expanded word exceeds {MAX_TOKENS} tokens"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("at byte {pos}: {kind}")]
pub struct WordError {
    pub pos: usize,
    pub kind: WordErrorKind,
}

impl WordError {
    fn at(pos: usize, kind: WordErrorKind) -> Self {
        Self { pos, kind }
    }
}

/// Parse a factored word into a flat token list. The identity yields `[]`.
pub fn parse_word(src: &str) -> Result<Vec<Token>, WordError> {
    let mut p = Parser {
        src: src.as_bytes(),
        pos: 0,
    };
    match p.peek() {
        None => return Err(WordError::at(p.pos, WordErrorKind::EmptyWord)),
        Some(b'<') => return p.identity(),
        Some(_) => {}
    }
    let tokens = p.product()?;
    match p.peek() {
        None => Ok(tokens),
        Some(b')') => Err(WordError::at(p.pos, WordErrorKind::UnbalancedParen)),
        Some(_) => Err(WordError::at(p.pos, WordErrorKind::TrailingInput)),
    }
}

/// Formal inverse of a token sequence.
pub fn invert(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .rev()
        .map(|t| Token { exp: -t.exp, ..*t })
        .collect()
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn err(&self, kind: WordErrorKind) -> WordError {
        WordError::at(self.pos, kind)
    }

    fn unexpected(&mut self) -> WordError {
        match self.peek() {
            None => self.err(WordErrorKind::UnexpectedEnd),
            Some(_) => {
                // report the full character, not the leading byte
                let c = std::str::from_utf8(&self.src[self.pos..])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.err(WordErrorKind::UnexpectedChar(c))
            }
        }
    }

    fn identity(&mut self) -> Result<Vec<Token>, WordError> {
        const TAG: &[u8] = b"<identity";
        if !self.src[self.pos..].starts_with(TAG) {
            return Err(self.unexpected());
        }
        match self.src[self.pos..].iter().position(|&b| b == b'>') {
            Some(off) => self.pos += off + 1,
            None => {
                self.pos = self.src.len();
                return Err(self.err(WordErrorKind::UnexpectedEnd));
            }
        }
        match self.peek() {
            None => Ok(Vec::new()),
            Some(_) => Err(self.err(WordErrorKind::TrailingInput)),
        }
    }

    fn product(&mut self) -> Result<Vec<Token>, WordError> {
        let mut out = self.factor()?;
        while self.peek() == Some(b'*') {
            self.pos += 1;
            out.extend(self.factor()?);
            if out.len() > MAX_TOKENS {
                return Err(self.err(WordErrorKind::TooLong));
            }
        }
        Ok(out)
    }

    fn factor(&mut self) -> Result<Vec<Token>, WordError> {
        match self.peek() {
            Some(b'(') => {
                let open = self.pos;
                self.pos += 1;
                let inner = self.product()?;
                if self.peek() != Some(b')') {
                    return Err(WordError::at(open, WordErrorKind::UnbalancedParen));
                }
                self.pos += 1;
                let e = self.exponent()?.unwrap_or(1);
                let reps = e.unsigned_abs() as usize;
                if reps.saturating_mul(inner.len()) > MAX_TOKENS {
                    return Err(self.err(WordErrorKind::TooLong));
                }
                let unit = if e < 0 { invert(&inner) } else { inner };
                Ok(unit.repeat(reps))
            }
            Some(b'x' | b'y' | b'z') => {
                let pos = self.pos;
                let letter = self.generator()?;
                let exp = self.exponent()?.unwrap_or(1);
                Ok(vec![Token { letter, exp, pos }])
            }
            _ => Err(self.unexpected()),
        }
    }

    fn generator(&mut self) -> Result<Letter, WordError> {
        let start = self.pos;
        let head = self.src[self.pos];
        self.pos += 1;
        match head {
            b'y' => return Ok(Letter::Swap),
            b'z' => return Ok(Letter::Complement),
            _ => {}
        }
        let digits = self.digits();
        match digits {
            "" | "1" => Ok(Letter::Cycle),
            "2" => Ok(Letter::Swap),
            "3" => Ok(Letter::Complement),
            other => Err(WordError::at(
                start,
                WordErrorKind::UnknownGenerator(format!("x{other}")),
            )),
        }
    }

    /// Raw digit run at the cursor (no whitespace skipping inside a number).
    fn digits(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.pos < src.len() && src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        // ASCII digits are valid UTF-8
        std::str::from_utf8(&src[start..self.pos]).unwrap_or_default()
    }

    fn exponent(&mut self) -> Result<Option<i64>, WordError> {
        if self.peek() != Some(b'^') {
            return Ok(None);
        }
        self.pos += 1;
        let negative = if self.peek() == Some(b'-') {
            self.pos += 1;
            true
        } else {
            false
        };
        self.skip_ws();
        let at = self.pos;
        let digits = self.digits();
        if digits.is_empty() {
            return Err(WordError::at(at, WordErrorKind::MissingExponent));
        }
        let magnitude: i64 = digits
            .parse()
            .map_err(|_| WordError::at(at, WordErrorKind::ExponentOverflow))?;
        Ok(Some(if negative { -magnitude } else { magnitude }))
    }
}
