//! The catalog of drawable tiles and the pending-pattern picker.
//!
//! There are exactly 15 ways to pair six sides into three connections. They
//! are listed by hand rather than generated, in lexicographic order, so each
//! pattern keeps a stable index (and letter `a`-`o` in board dumps).

use std::sync::OnceLock;

use crate::tile::TilePattern;

/// Number of distinct patterns.
pub const PATTERN_COUNT: usize = 15;

/// Side pairs of every pattern.
const PATTERN_SRC: [[(usize, usize); 3]; PATTERN_COUNT] = [
    [(0, 1), (2, 3), (4, 5)],
    [(0, 1), (2, 4), (3, 5)],
    [(0, 1), (2, 5), (3, 4)],
    [(0, 2), (1, 3), (4, 5)],
    [(0, 2), (1, 4), (3, 5)],
    [(0, 2), (1, 5), (3, 4)],
    [(0, 3), (1, 2), (4, 5)],
    [(0, 3), (1, 4), (2, 5)],
    [(0, 3), (1, 5), (2, 4)],
    [(0, 4), (1, 2), (3, 5)],
    [(0, 4), (1, 3), (2, 5)],
    [(0, 4), (1, 5), (2, 3)],
    [(0, 5), (1, 2), (3, 4)],
    [(0, 5), (1, 3), (2, 4)],
    [(0, 5), (1, 4), (2, 3)],
];

static PATTERNS: OnceLock<[TilePattern; PATTERN_COUNT]> = OnceLock::new();

/// All patterns, in catalog order.
pub fn patterns() -> &'static [TilePattern; PATTERN_COUNT] {
    PATTERNS.get_or_init(|| PATTERN_SRC.map(TilePattern::new))
}

/// Catalog index of `pattern`.
pub fn index_of(pattern: &TilePattern) -> usize {
    patterns()
        .iter()
        .position(|p| p == pattern)
        .unwrap_or_else(|| panic!("pattern {pattern} missing from catalog"))
}

/// Single-letter name of a pattern, `a` for index 0 through `o`.
pub fn letter(pattern: &TilePattern) -> char {
    (b'a' + index_of(pattern) as u8) as char
}

/// Hands out the next tile to place.
///
/// Owns its own generator so games can be replayed from a seed.
pub struct Catalog {
    rng: fastrand::Rng,
    pending: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Catalog backed by a randomly seeded generator.
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Catalog whose sequence of pending patterns is fixed by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(mut rng: fastrand::Rng) -> Self {
        let pending = rng.usize(..PATTERN_COUNT);
        Self { rng, pending }
    }

    /// The pattern the next placement will use.
    pub fn pending(&self) -> TilePattern {
        patterns()[self.pending]
    }

    /// Consume the pending pattern and draw a new one.
    pub fn advance(&mut self) -> TilePattern {
        let placed = self.pending();
        self.pending = self.rng.usize(..PATTERN_COUNT);
        placed
    }

    /// Force the pending pattern.
    pub fn set_pending(&mut self, pattern: TilePattern) {
        self.pending = index_of(&pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SIDES;
    use std::collections::HashSet;

    #[test]
    fn test_every_pattern_covers_all_sides_once() {
        for p in patterns() {
            let mut seen = [0u8; SIDES];
            for c in p.connections() {
                seen[c.from] += 1;
                seen[c.to] += 1;
            }
            assert_eq!(seen, [1; SIDES], "pattern {p} does not cover every side once");
        }
    }

    #[test]
    fn test_patterns_are_distinct() {
        let unique: HashSet<_> = patterns().iter().collect();
        assert_eq!(unique.len(), PATTERN_COUNT);
    }

    #[test]
    fn test_index_and_letter() {
        let first = patterns()[0];
        let last = patterns()[PATTERN_COUNT - 1];
        assert_eq!(index_of(&first), 0);
        assert_eq!(letter(&first), 'a');
        assert_eq!(letter(&last), 'o');
    }

    #[test]
    fn test_seeded_catalog_is_reproducible() {
        let mut a = Catalog::with_seed(42);
        let mut b = Catalog::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn test_advance_returns_previous_pending() {
        let mut catalog = Catalog::with_seed(7);
        let before = catalog.pending();
        assert_eq!(catalog.advance(), before);
    }

    #[test]
    fn test_set_pending() {
        let mut catalog = Catalog::with_seed(1);
        let p = patterns()[9];
        catalog.set_pending(p);
        assert_eq!(catalog.pending(), p);
    }

    #[test]
    fn test_draws_reach_every_pattern() {
        let mut catalog = Catalog::with_seed(3);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.insert(catalog.advance());
        }
        assert_eq!(seen.len(), PATTERN_COUNT);
    }
}
