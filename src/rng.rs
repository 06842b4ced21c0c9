use rand::rngs::SmallRng;
use rand::{RngExt as _, SeedableRng};

/// Instance-owned uniform integer source (§6.6, §5 "no sharing across
/// instances"). Every [`crate::Expression`] carries exactly one of these; it
/// is never hoisted to a global or thread-local singleton.
#[derive(Clone)]
pub struct Rng {
    inner: SmallRng,
}

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        Rng {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.inner = SmallRng::seed_from_u64(seed);
    }

    /// Uniform draw over the closed range `[lo, hi]`.
    #[inline]
    pub fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        self.inner.random_range(lo..=hi)
    }

    /// Uniform draw over `[lo, hi]`, excluding `exclude` when the range has more
    /// than one value. Used by the mutation operators' no-op guard (§4.5): when
    /// `lb == ub` the caller never reaches this, since that case is degenerate.
    pub fn range_excluding(&mut self, lo: usize, hi: usize, exclude: usize) -> usize {
        debug_assert!(lo < hi, "range_excluding requires a non-degenerate range");
        loop {
            let candidate = self.range_inclusive(lo, hi);
            if candidate != exclude {
                return candidate;
            }
        }
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    pub fn bool(&mut self, prob: f64) -> bool {
        self.inner.random_bool(prob)
    }
}
