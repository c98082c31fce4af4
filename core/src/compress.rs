//! Identifier compression for the 30-character naming limit.
//!
//! Generated table, constraint and index names must fit in
//! [`IDENTIFIER_LIMIT`] characters to be exported by Etendo. Over-long
//! names keep their first `_`-delimited segment (the module prefix) and
//! shrink the rest: vowels go first, then random characters are dropped in
//! passes until the name fits.
//!
//! The output is intentionally not deterministic across runs. The random
//! source is a type parameter of [`Compressor`] so callers (and tests) can
//! pin it with a seeded generator.
//!
//! # Examples
//!
//! ```
//! use etshell_core::Compressor;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut compressor = Compressor::with_rng(StdRng::seed_from_u64(7));
//! assert_eq!(compressor.shorten("tst_orders_client"), "tst_orders_client");
//!
//! let short = compressor.shorten("tst_purchase_requisition_line_chk");
//! assert!(short.starts_with("tst_"));
//! assert!(short.len() <= 30);
//! ```

use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::debug;

/// Maximum identifier length accepted by the target convention.
pub const IDENTIFIER_LIMIT: usize = 30;

/// Probability that a character survives one retention pass.
const RETENTION_PROBABILITY: f64 = 0.8;

const SEPARATOR: char = '_';

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Drops characters at random until `text` is at most `budget` long.
fn shrink<R: Rng + ?Sized>(mut text: String, budget: usize, rng: &mut R) -> String {
    while char_len(&text) > budget {
        text = text
            .chars()
            .filter(|_| rng.gen_bool(RETENTION_PROBABILITY))
            .collect();
    }
    text
}

/// Compresses `identifier` to at most `limit` characters using `rng`.
///
/// Identifiers already within the limit are returned unchanged. The first
/// `_`-delimited segment is preserved verbatim whenever it fits; the result
/// never ends with `_`.
pub fn compress_with<R: Rng + ?Sized>(identifier: &str, limit: usize, rng: &mut R) -> String {
    if char_len(identifier) <= limit {
        return identifier.to_string();
    }

    let (prefix, rest) = identifier
        .split_once(SEPARATOR)
        .unwrap_or((identifier, ""));
    let prefix_len = char_len(prefix);

    let compressed = if prefix_len > limit {
        // The prefix alone cannot fit, so it is shrunk like the remainder.
        let mut chars = identifier.chars();
        let head: String = chars.next().into_iter().collect();
        let tail: String = chars.filter(|c| !is_vowel(*c)).collect();
        shrink(format!("{head}{tail}"), limit, rng)
    } else {
        let stripped: String = rest.chars().filter(|c| !is_vowel(*c)).collect();
        let budget = limit.saturating_sub(prefix_len + 1);
        let remainder = shrink(stripped, budget, rng);
        format!("{prefix}{SEPARATOR}{remainder}")
    };

    let compressed = compressed.trim_end_matches(SEPARATOR).to_string();
    debug!(original = identifier, compressed = %compressed, limit, "Compressed identifier");
    compressed
}

/// Compresses `identifier` to [`IDENTIFIER_LIMIT`] with the thread-local RNG.
pub fn compress(identifier: &str) -> String {
    compress_with(identifier, IDENTIFIER_LIMIT, &mut rand::thread_rng())
}

/// Stateful compressor owning its random source and length limit.
#[derive(Debug, Clone)]
pub struct Compressor<R = ThreadRng> {
    rng: R,
    limit: usize,
}

impl Compressor<ThreadRng> {
    /// Creates a compressor backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for Compressor<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Compressor<R> {
    /// Creates a compressor backed by `rng` with the default limit.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            limit: IDENTIFIER_LIMIT,
        }
    }

    /// Overrides the length limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the length limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if `identifier` already fits the limit.
    pub fn fits(&self, identifier: &str) -> bool {
        char_len(identifier) <= self.limit
    }

    /// Compresses `identifier` if it exceeds the limit.
    pub fn shorten(&mut self, identifier: &str) -> String {
        compress_with(identifier, self.limit, &mut self.rng)
    }
}
