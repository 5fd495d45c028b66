//! # Spoofed Host Prober
//!
//! Sends one GET to the target URL while the `Host` header names a different
//! virtual host. The TCP/TLS peer is always the URL's own host; only the vhost
//! selector seen by the server changes.
//!
//! The body is streamed into an MD5 digest and then dropped, so memory use does
//! not grow with response size.

use async_trait::async_trait;
use reqwest::header::{HOST, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use tracing::debug;
use vscout_common::config::Config;
use vscout_common::models::Fingerprint;

use crate::error::ProbeError;
use crate::fingerprint::BodyDigest;
use crate::headers::RequestHeaders;

/// What a single spoofed request produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeResponse {
    pub fingerprint: Fingerprint,
    pub status_code: u16,
}

/// Sends one request to `target` presenting `host` as the virtual host.
///
/// Implementations must not retry.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        target: &str,
        host: &str,
        headers: &RequestHeaders,
    ) -> Result<ProbeResponse, ProbeError>;
}

/// [`Prober`] backed by a `reqwest` client built for one run.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        if cfg.insecure {
            vscout_common::warn!("TLS certificate validation is disabled");
        }

        // HTTP/1.1 keeps the Host header on the wire as given.
        let client = Client::builder()
            .http1_only()
            .danger_accept_invalid_certs(cfg.insecure)
            .timeout(cfg.timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(
        &self,
        target: &str,
        host: &str,
        headers: &RequestHeaders,
    ) -> Result<ProbeResponse, ProbeError> {
        let build_error = |source: anyhow::Error| ProbeError::RequestBuild {
            target: target.to_string(),
            host: host.to_string(),
            source,
        };

        let url = Url::parse(target).map_err(|e| build_error(e.into()))?;
        let host_value = HeaderValue::from_str(host).map_err(|e| build_error(e.into()))?;

        let mut header_map = headers.to_header_map();
        header_map.insert(HOST, host_value);

        let mut response = self
            .client
            .get(url)
            .headers(header_map)
            .send()
            .await
            .map_err(|source| {
                if source.is_builder() {
                    build_error(source.into())
                } else {
                    ProbeError::Transport {
                        target: target.to_string(),
                        host: host.to_string(),
                        source,
                    }
                }
            })?;

        let status_code = response.status().as_u16();
        let mut digest = BodyDigest::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| ProbeError::Digest {
            target: target.to_string(),
            host: host.to_string(),
            source,
        })? {
            digest.update(&chunk);
        }

        let fingerprint = digest.finish();
        debug!(url = target, host, status_code, %fingerprint, "probe complete");

        Ok(ProbeResponse { fingerprint, status_code })
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
