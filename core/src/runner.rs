//! # Run Controller
//!
//! Feeds every target through the [`DiscoveryEngine`] and hands each target's
//! outcomes to the single sink writer.
//!
//! Targets run on a bounded pool; a target's own pipeline stays sequential.
//! A failing target is recorded in the summary and never stops the others.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;
use vscout_common::models::{ProbeOutcome, TargetFailure};
use vscout_common::random::RandomSource;

use crate::engine::DiscoveryEngine;
use crate::sink::{self, SinkHandle, SqliteSink};
use crate::stop::StopSignal;

/// Progress notifications for the front end.
pub enum RunEvent<'a> {
    TargetStarted(&'a str),
    VhostDiscovered(&'a ProbeOutcome),
    Persisting { target: &'a str, rows: usize },
    TargetFinished(&'a TargetReport),
}

pub type EventHook = Arc<dyn Fn(RunEvent<'_>) + Send + Sync>;

/// Everything one target's pass produced.
#[derive(Debug)]
pub struct TargetReport {
    pub target: String,
    pub outcomes: Vec<ProbeOutcome>,
    pub persisted: usize,
    pub failure: Option<TargetFailure>,
}

impl TargetReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Targets whose pipeline completed, in input order.
    pub succeeded: Vec<String>,
    pub failed: Vec<TargetFailure>,
    /// Targets never started because the run was stopped.
    pub skipped: usize,
    pub discovered: usize,
    pub persisted: usize,
    pub interrupted: bool,
}

pub struct Runner<R> {
    engine: Arc<DiscoveryEngine<R>>,
    concurrency: usize,
    stop: StopSignal,
    on_event: Option<EventHook>,
}

impl<R: RandomSource + 'static> Runner<R> {
    pub fn new(engine: DiscoveryEngine<R>, concurrency: usize, stop: StopSignal) -> Self {
        Self {
            engine: Arc::new(engine),
            concurrency: concurrency.max(1),
            stop,
            on_event: None,
        }
    }

    pub fn with_events(mut self, hook: EventHook) -> Self {
        self.on_event = Some(hook);
        self
    }

    /// Processes every target and closes `sink` afterwards.
    ///
    /// Only a failure to close the store is returned as an error; everything
    /// target-specific lands in the [`RunSummary`].
    pub async fn run(
        &self,
        targets: Vec<String>,
        vhosts: Vec<String>,
        sink: SqliteSink,
    ) -> anyhow::Result<RunSummary> {
        let db_path = sink.path().to_path_buf();
        let (writer, writer_task) = sink::spawn_writer(sink);
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let vhosts: Arc<Vec<String>> = Arc::new(vhosts);

        let total = targets.len();
        let mut started = 0usize;
        let mut pipelines: JoinSet<(usize, TargetReport)> = JoinSet::new();
        let mut task_targets: HashMap<tokio::task::Id, String> = HashMap::new();

        for (idx, target) in targets.into_iter().enumerate() {
            let permit = tokio::select! {
                permit = permits.clone().acquire_owned() => permit?,
                _ = self.stop.stopped() => break,
            };
            if self.stop.is_stopped() {
                break;
            }

            let engine = self.engine.clone();
            let writer = writer.clone();
            let hook = self.on_event.clone();
            let vhosts = vhosts.clone();
            let name = target.clone();

            let handle = pipelines.spawn(async move {
                let _permit = permit;
                let report =
                    process_target(&engine, &writer, hook.as_ref(), target, &vhosts).await;
                (idx, report)
            });
            task_targets.insert(handle.id(), name);
            started += 1;
        }

        let mut reports: Vec<(usize, TargetReport)> = Vec::with_capacity(started);
        let mut crashed: Vec<TargetFailure> = Vec::new();
        while let Some(joined) = pipelines.join_next_with_id().await {
            match joined {
                Ok((_id, entry)) => reports.push(entry),
                Err(join_err) => {
                    let target = task_targets.remove(&join_err.id()).unwrap_or_default();
                    error!("Pipeline for {target} crashed: {join_err}");
                    let err = anyhow::Error::new(join_err).context("target pipeline crashed");
                    crashed.push(TargetFailure::new(target, &err));
                }
            }
        }

        drop(writer);
        let sink = writer_task.await.context("database writer crashed")?;
        sink.close()
            .with_context(|| format!("failed to close database {}", db_path.display()))?;

        reports.sort_by_key(|(idx, _)| *idx);
        let mut summary = RunSummary {
            skipped: total - started,
            interrupted: self.stop.is_stopped(),
            ..RunSummary::default()
        };
        for (_, report) in reports {
            summary.discovered += report.outcomes.len();
            summary.persisted += report.persisted;
            if report.is_success() {
                summary.succeeded.push(report.target);
            } else {
                summary.failed.extend(report.failure);
            }
        }
        summary.failed.extend(crashed);
        Ok(summary)
    }
}

async fn process_target<R: RandomSource>(
    engine: &DiscoveryEngine<R>,
    writer: &SinkHandle,
    hook: Option<&EventHook>,
    target: String,
    vhosts: &[String],
) -> TargetReport {
    let emit = |event: RunEvent<'_>| {
        if let Some(hook) = hook {
            hook(event);
        }
    };
    emit(RunEvent::TargetStarted(&target));

    let (outcomes, mut failure) = match engine.discover(&target, vhosts.to_vec()).await {
        Ok(outcomes) => (outcomes, None),
        Err(mut err) => {
            let partial = std::mem::take(&mut err.partial);
            let failure = TargetFailure::new(&target, &anyhow::Error::new(err));
            (partial, Some(failure))
        }
    };

    for outcome in &outcomes {
        emit(RunEvent::VhostDiscovered(outcome));
    }

    let mut persisted = 0;
    if !outcomes.is_empty() {
        emit(RunEvent::Persisting {
            target: &target,
            rows: outcomes.len(),
        });
        match writer.persist(outcomes.clone()).await {
            Ok(report) => persisted = report.rows(),
            Err(sink_err) => {
                let err = anyhow::Error::new(sink_err);
                match failure {
                    None => failure = Some(TargetFailure::new(&target, &err)),
                    Some(_) => error!("Could not store partial results for {target}: {err:#}"),
                }
            }
        }
    }

    let report = TargetReport {
        target,
        outcomes,
        persisted,
        failure,
    };
    emit(RunEvent::TargetFinished(&report));
    report
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
    use crate::engine::tests::StubProber;
    use crate::error::ProbeError;
    use crate::headers::RequestHeaders;
    use crate::prober::{ProbeResponse, Prober};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use vscout_common::models::Fingerprint;
    use vscout_common::random::StdRandom;

    /// Targets listed in `down` refuse every request; the rest answer per vhost.
    struct Fleet {
        down: Vec<&'static str>,
    }

    #[async_trait]
    impl Prober for Fleet {
        async fn probe(
            &self,
            target: &str,
            host: &str,
            _headers: &RequestHeaders,
        ) -> Result<ProbeResponse, ProbeError> {
            if self.down.contains(&target) {
                return Err(ProbeError::Interrupted {
                    target: target.to_string(),
                    host: host.to_string(),
                });
            }
            let fingerprint = if host.starts_with("real.") { "REAL" } else { "DEFAULT" };
            Ok(ProbeResponse {
                fingerprint: Fingerprint::from(fingerprint),
                status_code: 200,
            })
        }
    }

    fn runner(prober: Arc<dyn Prober>, concurrency: usize) -> Runner<StdRandom> {
        let stop = StopSignal::new();
        let engine = DiscoveryEngine::new(prober, StdRandom::seeded(9), Duration::ZERO, stop.clone());
        Runner::new(engine, concurrency, stop)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn count_rows(path: &std::path::Path) -> i64 {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM enumerated_vhosts", [], |r| r.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn failing_target_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.sqlite");
        let prober = Arc::new(Fleet { down: vec!["http://down.test/"] });

        let summary = runner(prober, 1)
            .run(
                strings(&["http://up.test/", "http://down.test/", "http://up2.test/"]),
                strings(&["real.up.test", "fake.up.test"]),
                SqliteSink::new(&db),
            )
            .await
            .unwrap();

        assert_eq!(summary.succeeded, strings(&["http://up.test/", "http://up2.test/"]));
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].target, "http://down.test/");
        assert!(summary.failed[0].error.contains("baseline probe failed"));
        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.persisted, 2);
        assert_eq!(count_rows(&db), 2);
    }

    #[tokio::test]
    async fn nothing_found_leaves_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.sqlite");
        let prober = Arc::new(StubProber::new("SAME"));

        let summary = runner(prober, 1)
            .run(strings(&["http://t.test/"]), strings(&["a.test", "b.test"]), SqliteSink::new(&db))
            .await
            .unwrap();

        assert_eq!(summary.succeeded.len(), 1);
        assert_eq!(summary.discovered, 0);
        assert!(!db.exists());
    }

    #[tokio::test]
    async fn partial_outcomes_are_persisted_for_failed_target() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.sqlite");
        let prober = Arc::new(
            StubProber::new("BASE")
                .answer("a.test", "A", 200)
                .answer("b.test", "B", 200)
                .answer("c.test", "C", 200)
                .fail_on_call(3),
        );

        let summary = runner(prober.clone(), 1)
            .run(
                strings(&["http://t.test/"]),
                strings(&["a.test", "b.test", "c.test"]),
                SqliteSink::new(&db),
            )
            .await
            .unwrap();

        assert!(summary.succeeded.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].error.contains("candidate probe failed"));
        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.persisted, 2);
        assert_eq!(count_rows(&db), 2);
    }

    #[tokio::test]
    async fn concurrent_targets_all_complete() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.sqlite");
        let prober = Arc::new(Fleet { down: vec![] });
        let targets: Vec<String> = (0..12).map(|i| format!("http://t{i}.test/")).collect();

        let summary = runner(prober, 4)
            .run(targets.clone(), strings(&["real.x", "other.x"]), SqliteSink::new(&db))
            .await
            .unwrap();

        assert_eq!(summary.succeeded, targets);
        assert_eq!(summary.persisted, 12);
        assert_eq!(count_rows(&db), 12);
    }

    #[tokio::test]
    async fn events_bracket_each_target() {
        let dir = tempfile::tempdir().unwrap();
        let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_log = log.clone();
        let hook: EventHook = Arc::new(move |event: RunEvent<'_>| {
            let line = match event {
                RunEvent::TargetStarted(t) => format!("start {t}"),
                RunEvent::VhostDiscovered(o) => format!("found {}", o.vhost),
                RunEvent::Persisting { rows, .. } => format!("persist {rows}"),
                RunEvent::TargetFinished(r) => format!("finish {}", r.target),
            };
            sink_log.lock().unwrap().push(line);
        });
        let prober = Arc::new(Fleet { down: vec![] });

        runner(prober, 1)
            .with_events(hook)
            .run(
                strings(&["http://t.test/"]),
                strings(&["real.t.test"]),
                SqliteSink::new(dir.path().join("db.sqlite")),
            )
            .await
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            strings(&["start http://t.test/", "found real.t.test", "persist 1", "finish http://t.test/"])
        );
    }

    #[tokio::test]
    async fn stopped_run_skips_remaining_targets() {
        let dir = tempfile::tempdir().unwrap();
        let stop = StopSignal::new();
        let prober = Arc::new(StubProber::new("SAME"));
        let engine = DiscoveryEngine::new(prober, StdRandom::seeded(1), Duration::ZERO, stop.clone());
        stop.stop();

        let summary = Runner::new(engine, 1, stop)
            .run(
                strings(&["http://a.test/", "http://b.test/"]),
                strings(&["x"]),
                SqliteSink::new(dir.path().join("db.sqlite")),
            )
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.skipped, 2);
        assert!(summary.succeeded.is_empty());
    }
}
