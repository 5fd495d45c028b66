use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use vscout_common::config::Config;
use vscout_common::random::StdRandom;
use vscout_core::engine::DiscoveryEngine;
use vscout_core::prober::HttpProber;
use vscout_core::runner::Runner;
use vscout_core::stop::StopSignal;

pub fn config(database: PathBuf) -> Config {
    Config {
        timeout: Duration::from_secs(5),
        jitter: Duration::ZERO,
        database,
        no_banner: true,
        ..Config::default()
    }
}

pub fn runner(cfg: &Config) -> Runner<StdRandom> {
    let stop = StopSignal::new();
    let prober = HttpProber::new(cfg).unwrap();
    let engine = DiscoveryEngine::new(Arc::new(prober), StdRandom::seeded(7), cfg.jitter, stop.clone());
    Runner::new(engine, cfg.concurrency, stop)
}

pub fn write_list(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// URL of a local port with nothing listening on it.
pub fn dead_target() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

pub fn stored_rows(path: &Path) -> Vec<(String, String, u16)> {
    let conn = rusqlite::Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare("SELECT target, vhost, status_code FROM enumerated_vhosts ORDER BY vhost")
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}
