//! Random short code generation.
//!
//! Codes are drawn from a configurable alphabet that omits visually
//! ambiguous characters (`0/O`, `1/l/I`, `2/Z`, `5/S`) so they survive
//! human transcription.

use rand::Rng;
use tracing::warn;

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default alphabet without ambiguous characters: 0/O, 1/l/I, 2/Z, 5/S.
pub const DEFAULT_CODE_ALPHABET: &str = "abcdefghjkmnpqrtuvwxyACDEFGHJKMNPQRTUVWXY346789";

/// Generator producing fixed-length random codes from a fixed alphabet.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
    alphabet: Vec<char>,
}

impl CodeGenerator {
    pub fn new(length: usize, alphabet: &str) -> Self {
        Self {
            length,
            alphabet: alphabet.chars().collect(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> String {
        self.alphabet.iter().collect()
    }

    /// Produces a code of exactly `length` characters drawn uniformly at
    /// random from the alphabet.
    ///
    /// OS entropy (`getrandom`) is the primary source; if it fails, the
    /// thread RNG (still a CSPRNG) takes over. The sequence is never
    /// predictable.
    ///
    /// Degenerate configuration (`length < 1` or an empty alphabet) yields
    /// an empty string; callers must treat empty as a generation failure.
    pub fn generate(&self) -> String {
        if self.length < 1 || self.alphabet.is_empty() {
            return String::new();
        }

        let mut buffer = vec![0u8; self.length];

        if getrandom::fill(&mut buffer).is_ok() {
            buffer
                .iter()
                .map(|b| self.alphabet[*b as usize % self.alphabet.len()])
                .collect()
        } else {
            warn!("OS entropy unavailable, falling back to thread RNG");
            let mut rng = rand::rng();
            (0..self.length)
                .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
                .collect()
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_CODE_ALPHABET)
    }
}
