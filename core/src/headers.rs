//! Randomized request headers.
//!
//! Every probe carries a freshly drawn header set so consecutive requests do
//! not share an identical fingerprint. Weighted tables are ordered slices, which
//! makes the selection reproducible under a seeded [`RandomSource`].

use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT,
};
use vscout_common::random::RandomSource;

const ACCEPT_POOL: &[&str] = &[
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
    "application/json",
    "*/*",
    "image/avif,image/webp,image/apng,image/*;q=0.8,*/*;q=0.5",
    "application/xml;q=0.9,text/xml;q=0.8,*/*;q=0.7",
    "text/plain;q=0.9,application/json;q=0.8,*/*;q=0.5",
];

const LANGUAGES: &[(&str, f64)] = &[
    ("en-US,en;q=0.9", 0.65),
    ("es-ES,en;q=0.8", 0.15),
    ("fr-FR,en;q=0.7", 0.05),
    ("de-DE,en;q=0.7", 0.10),
    ("ja-JP,en;q=0.6", 0.05),
];

// Weights follow desktop market share.
const USER_AGENTS: &[(&str, f64)] = &[
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36",
        0.79,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36 Edg/141.0.3537.92",
        0.11,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:144.0) Gecko/20100101 Firefox/144.0",
        0.04,
    ),
];

const ACCEPT_ENCODING_VALUE: &str = "gzip, br, zstd";
const CACHE_CONTROL_VALUE: &str = "max-age=0";

const DEFAULT_ACCEPT: &str = "*/*";
const DEFAULT_LANGUAGE: &str = "en-US,en;q=0.9";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// One drawn header set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHeaders {
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub accept_encoding: &'static str,
    pub cache_control: &'static str,
    pub user_agent: &'static str,
}

impl RequestHeaders {
    /// Draws a header set from the built-in tables. Never fails.
    pub fn random<R: RandomSource>(rng: &mut R) -> Self {
        let accept = pick_uniform(rng, ACCEPT_POOL).unwrap_or(DEFAULT_ACCEPT);
        let accept_language = weighted_pick(rng, LANGUAGES).unwrap_or(DEFAULT_LANGUAGE);
        let user_agent = weighted_pick(rng, USER_AGENTS).unwrap_or(DEFAULT_USER_AGENT);

        Self {
            accept,
            accept_language,
            accept_encoding: ACCEPT_ENCODING_VALUE,
            cache_control: CACHE_CONTROL_VALUE,
            user_agent,
        }
    }

    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(self.accept_encoding));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(self.cache_control));
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers
    }
}

fn pick_uniform<R: RandomSource>(rng: &mut R, pool: &[&'static str]) -> Option<&'static str> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.next_below(pool.len())).copied()
}

/// Picks the first entry whose cumulative weight exceeds a uniform draw in
/// `[0, total)`. Weights do not need to sum to one.
///
/// Returns `None` only for an empty table. Tables whose weights sum to zero
/// (or a draw that lands on the upper edge through rounding) yield the last entry.
pub fn weighted_pick<R: RandomSource>(
    rng: &mut R,
    entries: &[(&'static str, f64)],
) -> Option<&'static str> {
    let (last, _) = entries.last()?;
    let total: f64 = entries.iter().map(|(_, weight)| weight.max(0.0)).sum();
    let threshold = rng.next_f64() * total;

    let mut cumulative = 0.0;
    for (item, weight) in entries {
        cumulative += weight.max(0.0);
        if threshold < cumulative {
            return Some(*item);
        }
    }
    Some(*last)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
