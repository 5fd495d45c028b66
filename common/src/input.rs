//! # Scan Input Sources
//!
//! Turns the two positional arguments into the target list and the
//! candidate vhost list.
//!
//! The target argument is either:
//! * A single absolute URL (e.g., `https://10.0.0.5:8443`).
//! * A bare domain or `host:port` that resolves via DNS (e.g., `example.com`).
//! * A path to a file with one target per line.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {kind} list '{path}'")]
    Unreadable {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the targets of a run come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSource {
    Single(String),
    File(PathBuf),
}

impl TargetSource {
    /// Classifies `input` as a single target or a target file.
    pub async fn detect(input: &str) -> Self {
        if is_domain_or_url(input).await {
            TargetSource::Single(input.to_string())
        } else {
            TargetSource::File(PathBuf::from(input))
        }
    }

    /// Produces the probe-ready target URLs.
    pub async fn load(self) -> Result<Vec<String>, InputError> {
        let raw = match self {
            TargetSource::Single(target) => vec![target],
            TargetSource::File(path) => read_list(&path, "target").await?,
        };
        Ok(raw.iter().map(|t| normalize_target(t)).collect())
    }
}

/// Reads the candidate vhost list.
pub async fn load_vhosts(path: &Path) -> Result<Vec<String>, InputError> {
    read_list(path, "vhost").await
}

/// Returns true for an absolute URL with scheme and host, or a name that resolves.
pub async fn is_domain_or_url(input: &str) -> bool {
    if is_absolute_url(input) {
        return true;
    }
    if input.is_empty() || input.contains(['/', '\\']) {
        return false;
    }
    // `host:port` resolves as is; a bare name needs a port for the lookup.
    if resolves(input).await {
        return true;
    }
    resolves((input, 80)).await
}

async fn resolves<A: tokio::net::ToSocketAddrs>(addr: A) -> bool {
    match tokio::net::lookup_host(addr).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    }
}

fn is_absolute_url(input: &str) -> bool {
    Url::parse(input)
        .map(|url| !url.scheme().is_empty() && url.has_host())
        .unwrap_or(false)
}

/// Bare hosts are probed over plain HTTP.
pub fn normalize_target(target: &str) -> String {
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{target}/")
    }
}

async fn read_list(path: &Path, kind: &'static str) -> Result<Vec<String>, InputError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Unreadable {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_lines_drops_blanks_and_whitespace() {
        let lines = parse_lines("a.test\n\n  b.test  \r\n\t\nc.test");
        assert_eq!(lines, vec!["a.test", "b.test", "c.test"]);
    }

    #[test]
    fn absolute_urls_are_recognized() {
        assert!(is_absolute_url("https://example.test"));
        assert!(is_absolute_url("http://10.0.0.1:8080/path"));
        assert!(!is_absolute_url("targets.txt"));
        assert!(!is_absolute_url("example.test"));
    }

    #[test]
    fn bare_hosts_get_http_scheme() {
        assert_eq!(normalize_target("example.test"), "http://example.test/");
        assert_eq!(normalize_target("https://example.test"), "https://example.test");
    }

    #[tokio::test]
    async fn url_input_is_a_single_target() {
        let source = TargetSource::detect("https://example.test").await;
        assert_eq!(source, TargetSource::Single("https://example.test".into()));
        assert_eq!(source.load().await.unwrap(), vec!["https://example.test"]);
    }

    #[tokio::test]
    async fn host_and_port_is_a_single_target() {
        let source = TargetSource::detect("127.0.0.1:8443").await;
        assert_eq!(source, TargetSource::Single("127.0.0.1:8443".into()));
        assert_eq!(source.load().await.unwrap(), vec!["http://127.0.0.1:8443/"]);
    }

    #[tokio::test]
    async fn path_input_is_read_as_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://one.test\n\ntwo.test").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let source = TargetSource::detect(&path).await;
        assert!(matches!(source, TargetSource::File(_)));
        let targets = source.load().await.unwrap();
        assert_eq!(targets, vec!["https://one.test", "http://two.test/"]);
    }

    #[tokio::test]
    async fn missing_vhost_list_is_unreadable() {
        let err = load_vhosts(Path::new("/nonexistent/vhosts.txt")).await.unwrap_err();
        assert!(matches!(err, InputError::Unreadable { kind: "vhost", .. }));
    }

    #[tokio::test]
    async fn empty_vhost_list_loads_as_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_vhosts(file.path()).await.unwrap().is_empty());
    }
}
