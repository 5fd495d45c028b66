//! Response body fingerprints.
//!
//! MD5 is used for change detection only; it guards nothing.

use vscout_common::models::Fingerprint;

/// Incremental digest fed chunk by chunk while the body streams in.
pub struct BodyDigest {
    ctx: md5::Context,
}

impl BodyDigest {
    pub fn new() -> Self {
        Self { ctx: md5::Context::new() }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.ctx.consume(chunk);
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint::new(format!("{:x}", self.ctx.compute()))
    }
}

impl Default for BodyDigest {
    fn default() -> Self {
        Self::new()
    }
}

pub fn fingerprint(body: &[u8]) -> Fingerprint {
    let mut digest = BodyDigest::new();
    digest.update(body);
    digest.finish()
}

/// A candidate counts as a distinct vhost when its body differs from the baseline.
pub fn is_discovered(baseline: &Fingerprint, spoofed: &Fingerprint) -> bool {
    baseline != spoofed
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

    #[test]
    fn empty_body_has_known_digest() {
        assert_eq!(fingerprint(b"").as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn chunked_digest_matches_one_shot() {
        let mut digest = BodyDigest::new();
        for chunk in [&b"<html>"[..], b"<body>hello</body>", b"</html>"] {
            digest.update(chunk);
        }
        assert_eq!(digest.finish(), fingerprint(b"<html><body>hello</body></html>"));
    }

    #[test]
    fn classification_is_stable_for_fixed_digests() {
        let baseline = Fingerprint::from("aaa");
        let same = Fingerprint::from("aaa");
        let other = Fingerprint::from("bbb");

        for _ in 0..2 {
            assert!(!is_discovered(&baseline, &same));
            assert!(is_discovered(&baseline, &other));
        }
    }
}
