//! # Vhost Discovery Engine
//!
//! Drives one target through its pipeline:
//!
//! 1. **Shuffle** the candidate list so no two runs share a probe order.
//! 2. **Baseline**: probe with a random, non-existent host name. Mandatory.
//! 3. **Probe** every candidate, pausing a random jitter between candidates.
//! 4. **Classify** each candidate by comparing its fingerprint to the baseline.
//!
//! A failed baseline ends the target with nothing recorded. A failed candidate
//! ends the target but keeps what was already found.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info_span, Instrument};
use vscout_common::models::{Fingerprint, ProbeOutcome};
use vscout_common::random::{self, RandomSource};

use crate::error::{DiscoveryError, DiscoveryStage, ProbeError};
use crate::fingerprint::is_discovered;
use crate::headers::RequestHeaders;
use crate::prober::{ProbeResponse, Prober};
use crate::stop::StopSignal;

pub const BASELINE_SUFFIX: &str = ".com";
const MAX_LABEL_LEN: usize = 10;

pub struct DiscoveryEngine<R> {
    prober: Arc<dyn Prober>,
    rng: Mutex<R>,
    jitter: Duration,
    stop: StopSignal,
}

impl<R: RandomSource> DiscoveryEngine<R> {
    pub fn new(prober: Arc<dyn Prober>, rng: R, jitter: Duration, stop: StopSignal) -> Self {
        Self {
            prober,
            rng: Mutex::new(rng),
            jitter,
            stop,
        }
    }

    /// Runs the full pipeline for `target`.
    ///
    /// Every candidate is visited exactly once, in a fresh random order.
    pub async fn discover(
        &self,
        target: &str,
        candidates: Vec<String>,
    ) -> Result<Vec<ProbeOutcome>, DiscoveryError> {
        let span = info_span!("discover", url = target, candidates = candidates.len());
        self.run_pipeline(target, candidates).instrument(span).await
    }

    async fn run_pipeline(
        &self,
        target: &str,
        mut candidates: Vec<String>,
    ) -> Result<Vec<ProbeOutcome>, DiscoveryError> {
        self.rng().shuffle(&mut candidates);

        let baseline_host = self.baseline_host();
        debug!(host = %baseline_host, "establishing baseline");
        let baseline: Fingerprint = self
            .probe(target, &baseline_host)
            .await
            .map_err(|source| DiscoveryError {
                stage: DiscoveryStage::Baseline,
                partial: Vec::new(),
                source,
            })?
            .fingerprint;

        let mut outcomes: Vec<ProbeOutcome> = Vec::new();
        for (idx, vhost) in candidates.iter().enumerate() {
            let response: ProbeResponse = match self.next_candidate(target, vhost, idx == 0).await {
                Ok(response) => response,
                Err(source) => {
                    return Err(DiscoveryError {
                        stage: DiscoveryStage::Candidate,
                        partial: outcomes,
                        source,
                    });
                }
            };

            if let Some(outcome) = classify(target, vhost, &baseline, response) {
                debug!(vhost = %outcome.vhost, status = outcome.status_code, "vhost discovered");
                outcomes.push(outcome);
            }
        }

        Ok(outcomes)
    }

    /// Random label of 1 to 9 letters followed by [`BASELINE_SUFFIX`].
    pub fn baseline_host(&self) -> String {
        let mut rng = self.rng();
        let len = 1 + rng.next_below(MAX_LABEL_LEN - 1);
        format!("{}{}", random::random_label(&mut *rng, len), BASELINE_SUFFIX)
    }

    async fn next_candidate(
        &self,
        target: &str,
        vhost: &str,
        first: bool,
    ) -> Result<ProbeResponse, ProbeError> {
        if !first {
            self.pause(target, vhost).await?;
        }
        self.probe(target, vhost).await
    }

    async fn probe(&self, target: &str, host: &str) -> Result<ProbeResponse, ProbeError> {
        let interrupted = || ProbeError::Interrupted {
            target: target.to_string(),
            host: host.to_string(),
        };
        if self.stop.is_stopped() {
            return Err(interrupted());
        }

        let headers = RequestHeaders::random(&mut *self.rng());
        tokio::select! {
            _ = self.stop.stopped() => Err(interrupted()),
            res = self.prober.probe(target, host, &headers) => res,
        }
    }

    async fn pause(&self, target: &str, next_host: &str) -> Result<(), ProbeError> {
        let delay = self.jitter.mul_f64(self.rng().next_f64());
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.stop.stopped() => Err(ProbeError::Interrupted {
                target: target.to_string(),
                host: next_host.to_string(),
            }),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    fn rng(&self) -> MutexGuard<'_, R> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Emits an outcome only when the candidate's body differs from the baseline.
pub fn classify(
    target: &str,
    vhost: &str,
    baseline: &Fingerprint,
    response: ProbeResponse,
) -> Option<ProbeOutcome> {
    if !is_discovered(baseline, &response.fingerprint) {
        return None;
    }
    Some(ProbeOutcome {
        target: target.to_string(),
        vhost: vhost.to_string(),
        baseline_fingerprint: baseline.clone(),
        spoofed_fingerprint: response.fingerprint,
        status_code: response.status_code,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
