// src/requisitions/codes.rs
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Capitals and digits without the look-alikes 0/O and 1/I.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const DEFAULT_CODE_LENGTH: usize = 8;

const AMBIGUOUS: [char; 4] = ['0', 'O', '1', 'I'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeAlphabetError {
    #[error("code alphabet needs at least two distinct characters")]
    TooFewGlyphs,
    #[error("code alphabet contains ambiguous character `{0}`")]
    AmbiguousGlyph(char),
    #[error("code alphabet contains lowercase character `{0}`; codes are matched case-insensitively")]
    LowercaseGlyph(char),
    #[error("code length must be at least 1")]
    ZeroLength,
}

/// The glyph set and length requisition codes are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAlphabet {
    glyphs: Vec<char>,
    length: usize,
}

impl Default for CodeAlphabet {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl CodeAlphabet {
    pub fn new(glyphs: &str, length: usize) -> Result<Self, CodeAlphabetError> {
        if length == 0 {
            return Err(CodeAlphabetError::ZeroLength);
        }
        let mut unique: Vec<char> = Vec::new();
        for c in glyphs.chars().filter(|c| !c.is_whitespace()) {
            if AMBIGUOUS.contains(&c) {
                return Err(CodeAlphabetError::AmbiguousGlyph(c));
            }
            if c.is_lowercase() {
                return Err(CodeAlphabetError::LowercaseGlyph(c));
            }
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        if unique.len() < 2 {
            return Err(CodeAlphabetError::TooFewGlyphs);
        }
        Ok(Self {
            glyphs: unique,
            length,
        })
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// One random candidate; uniqueness is not checked.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| self.glyphs[rng.gen_range(0..self.glyphs.len())])
            .collect()
    }

    /// Draws candidates until `exists` reports one as free.
    ///
    /// There is no retry cap: as long as one code is free the loop ends, and
    /// the default alphabet makes a second draw rare.
    pub fn issue<R, F, E>(&self, rng: &mut R, mut exists: F) -> Result<String, E>
    where
        R: Rng,
        F: FnMut(&str) -> Result<bool, E>,
    {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            let candidate = self.generate(rng);
            if !exists(&candidate)? {
                return Ok(candidate);
            }
            debug!(attempts, candidate = %candidate, "requisition code collision, retrying");
        }
    }
}
