use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use vscout_common::models::ProbeOutcome;

/// Failure of a single spoofed request.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not build request to {target} with Host header {host}")]
    RequestBuild {
        target: String,
        host: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("request to {target} with Host header {host} failed")]
    Transport {
        target: String,
        host: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not read response body from {target} with Host header {host}")]
    Digest {
        target: String,
        host: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {target} with Host header {host} was interrupted")]
    Interrupted { target: String, host: String },
}

/// Which step of a target's pipeline stopped it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveryStage {
    Baseline,
    Candidate,
}

impl fmt::Display for DiscoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryStage::Baseline => f.write_str("baseline"),
            DiscoveryStage::Candidate => f.write_str("candidate"),
        }
    }
}

/// A target that could not be fully probed.
///
/// Outcomes recorded before the failure are kept in `partial`.
#[derive(Debug, Error)]
#[error("{stage} probe failed")]
pub struct DiscoveryError {
    pub stage: DiscoveryStage,
    pub partial: Vec<ProbeOutcome>,
    #[source]
    pub source: ProbeError,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not open database '{path}'")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not create table '{table}'")]
    Schema {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not write vhost '{vhost}' for target '{target}'")]
    Write {
        target: String,
        vhost: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not begin or commit the batch for target '{target}'")]
    Transaction {
        target: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not close database '{path}'")]
    Close {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database writer has stopped")]
    WriterGone,
}
