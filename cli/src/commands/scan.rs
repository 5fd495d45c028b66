use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::error;
use vscout_common::config::Config;
use vscout_common::input::{self, TargetSource};
use vscout_common::random::StdRandom;
use vscout_common::{info, success, warn};
use vscout_core::engine::DiscoveryEngine;
use vscout_core::prober::HttpProber;
use vscout_core::runner::{EventHook, RunEvent, RunSummary, Runner};
use vscout_core::sink::SqliteSink;
use vscout_core::stop::StopSignal;

use crate::terminal::{colors, print, spinner};
use crate::vprint;

const SUMMARY_KEY_WIDTH: usize = 10;

pub async fn scan(targets_arg: &str, vhosts_path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let targets: Vec<String> = TargetSource::detect(targets_arg).await.load().await?;
    let vhosts: Vec<String> = input::load_vhosts(vhosts_path).await?;

    print::banner(cfg.no_banner, cfg.quiet, &targets, &vhosts);
    print::header("starting vhost discovery", cfg.quiet);

    let stop = StopSignal::new();
    watch_interrupt(stop.clone());

    let prober = HttpProber::new(cfg).context("failed to build HTTP client")?;
    let engine = DiscoveryEngine::new(Arc::new(prober), StdRandom::from_os(), cfg.jitter, stop.clone());
    let runner = Runner::new(engine, cfg.concurrency, stop)
        .with_events(progress_hook(cfg.quiet, targets.len()));

    spinner::start();
    let start_time: Instant = Instant::now();
    let result = runner
        .run(targets, vhosts, SqliteSink::new(&cfg.database))
        .await;
    spinner::finish();

    let summary: RunSummary = result?;
    scan_ends(&summary, start_time.elapsed(), cfg);
    Ok(())
}

/// Raises `stop` on the first Ctrl-C.
fn watch_interrupt(stop: StopSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, abandoning in-flight probes");
            stop.stop();
        }
    });
}

fn progress_hook(q_level: u8, total: usize) -> EventHook {
    let finished = AtomicUsize::new(0);
    let discovered = AtomicUsize::new(0);

    Arc::new(move |event: RunEvent<'_>| match event {
        RunEvent::TargetStarted(target) => {
            if q_level == 0 {
                info!("Starting vhost enumeration on {}", target.color(colors::PRIMARY));
            }
        }
        RunEvent::VhostDiscovered(outcome) => {
            discovered.fetch_add(1, Ordering::Relaxed);
            if q_level < 2 {
                success!("{}", print::vhost_line(outcome));
            }
        }
        RunEvent::Persisting { rows, .. } => {
            if q_level == 0 {
                info!("Adding {} enumerated vhosts to database", rows.to_string().bold());
            }
        }
        RunEvent::TargetFinished(report) => {
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            spinner::report_progress(done, total, discovered.load(Ordering::Relaxed));

            if let Some(failure) = &report.failure {
                error!("{}", failure);
            } else if report.outcomes.is_empty() && q_level == 0 {
                warn!("No vhosts were enumerated on {}", report.target);
            }
            if q_level == 0 {
                info!("Finished vhost enumeration on {}", report.target.color(colors::PRIMARY));
            }
        }
    })
}

fn scan_ends(summary: &RunSummary, total_time: Duration, cfg: &Config) {
    if summary.interrupted {
        warn!("Scan interrupted, {} targets were not started", summary.skipped);
    }

    if summary.discovered == 0 && cfg.quiet == 0 {
        print::header("zero vhosts discovered", cfg.quiet);
        print::no_results();
    }

    if !summary.failed.is_empty() && cfg.quiet < 2 {
        print::header("failed targets", cfg.quiet);
        print_failures(summary);
    }

    print_summary(summary, total_time, cfg);
}

fn print_failures(summary: &RunSummary) {
    for (idx, failure) in summary.failed.iter().enumerate() {
        print::tree_head(idx, &failure.target);
        let causes: Vec<ColoredString> = failure
            .error
            .split(": ")
            .map(|cause| cause.color(colors::STATUS_ERROR))
            .collect();
        print::as_tree_one_level(&causes);
        if idx + 1 != summary.failed.len() {
            vprint!();
        }
    }
}

fn print_summary(summary: &RunSummary, total_time: Duration, cfg: &Config) {
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let discovered: ColoredString = format!("{} vhosts", summary.discovered).bold().green();
    let output: ColoredString = format!("Discovery Complete: {discovered} identified in {total_time}")
        .color(colors::TEXT_DEFAULT);

    if cfg.quiet > 0 {
        vprint!();
        success!("{}", output);
        return;
    }

    print::header("summary", cfg.quiet);
    let failed: ColoredString = summary.failed.len().to_string().color(if summary.failed.is_empty() {
        colors::TEXT_DEFAULT
    } else {
        colors::STATUS_ERROR
    });
    print::aligned_line("Succeeded", summary.succeeded.len().to_string(), SUMMARY_KEY_WIDTH);
    print::aligned_line("Failed", failed, SUMMARY_KEY_WIDTH);
    print::aligned_line("Skipped", summary.skipped.to_string(), SUMMARY_KEY_WIDTH);
    print::aligned_line("Persisted", summary.persisted.to_string(), SUMMARY_KEY_WIDTH);
    print::aligned_line(
        "Database",
        cfg.database.display().to_string().color(colors::SECONDARY),
        SUMMARY_KEY_WIDTH,
    );
    print::fat_separator();
    print::centerln(&output.to_string());
    print::end_of_program();
}
