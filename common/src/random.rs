//! Injectable randomness.
//!
//! Shuffling, header selection, baseline host names and jitter all draw from a
//! [`RandomSource`] handed in by the caller, so tests can pin every decision.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const FALLBACK_LABEL_LEN: usize = 7;

pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    fn next_below(&mut self, n: usize) -> usize;

    /// Fisher-Yates shuffle driven by [`RandomSource::next_below`].
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Default source backed by [`StdRng`].
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_os() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Reproducible source, mainly for tests.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }
}

/// Lowercase ASCII label of `len` letters. A length of 0 yields 7 letters.
pub fn random_label<R: RandomSource>(rng: &mut R, len: usize) -> String {
    let len = if len == 0 { FALLBACK_LABEL_LEN } else { len };
    (0..len)
        .map(|_| LETTERS[rng.next_below(LETTERS.len())] as char)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
