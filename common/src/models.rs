//! # Scan Data Model
//!
//! Plain values shared between the discovery engine, the result sink and
//! the terminal front end. Nothing in here performs I/O.

use std::fmt;

/// Hex digest of a response body. Compared for equality only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A vhost whose response differed from the target's baseline.
///
/// Only ever built when the two fingerprints differ and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: String,
    pub vhost: String,
    pub baseline_fingerprint: Fingerprint,
    pub spoofed_fingerprint: Fingerprint,
    pub status_code: u16,
}

impl ProbeOutcome {
    pub fn status_class(&self) -> StatusClass {
        StatusClass::from(self.status_code)
    }
}

/// Coarse grouping of HTTP status codes used for console annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Success,
    Redirect,
    Error,
}

impl From<u16> for StatusClass {
    fn from(code: u16) -> Self {
        match code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400.. => StatusClass::Error,
            _ => StatusClass::Informational,
        }
    }
}

/// A target whose pipeline stopped early, with the rendered error chain.
#[derive(Clone, Debug)]
pub struct TargetFailure {
    pub target: String,
    pub error: String,
}

impl TargetFailure {
    pub fn new(target: impl Into<String>, error: &anyhow::Error) -> Self {
        Self {
            target: target.into(),
            error: format!("{error:#}"),
        }
    }
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.error)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
