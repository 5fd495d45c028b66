use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "db.sqlite";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_JITTER: Duration = Duration::from_secs(3);

/// Run-wide settings, built once by the binary and passed down by reference.
#[derive(Clone, Debug)]
pub struct Config {
    /// Accept invalid or self-signed TLS certificates.
    ///
    /// Off unless the operator asks for it explicitly.
    pub insecure: bool,
    /// Upper bound for a single request, connect to last body byte.
    pub timeout: Duration,
    /// Exclusive upper bound of the random pause between two candidate probes.
    pub jitter: Duration,
    /// Number of targets processed at the same time. Each target stays sequential.
    pub concurrency: usize,
    /// SQLite file that receives discovered vhosts.
    pub database: PathBuf,
    pub no_banner: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
            jitter: DEFAULT_JITTER,
            concurrency: 1,
            database: PathBuf::from(DEFAULT_DATABASE),
            no_banner: false,
            quiet: 0,
        }
    }
}
