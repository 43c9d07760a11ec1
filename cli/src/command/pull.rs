//! `pull` (§6.2): runs the inventory pipeline for a set of vendors against
//! a connection string, wiring the shared [`ProgressTracker`] to an
//! `indicatif` multi-progress display (§9 "Progress callbacks").

use std::time::Duration;

use sc_core::cache::DiskCache;
use sc_core::pipeline::CancellationToken;
use sc_core::{CrateError, Pipeline, ProgressTracker};
use sc_db::Engine;
use sc_inspector::{HttpArchiveSource, Inspector};
use tracing::{info, warn};

use crate::settings;

pub struct PullOptions {
    pub connection_string: String,
    pub include_vendor: Vec<String>,
    pub exclude_vendor: Vec<String>,
    pub scd: bool,
    pub inspector_archive_url: Option<String>,
    pub cache_enabled: bool,
    pub cache_ttl_minutes: u64,
}

pub async fn execute(opts: PullOptions) -> Result<(), CrateError> {
    let selected = settings::resolve_vendor_selection(&opts.include_vendor, &opts.exclude_vendor)?;

    let engine = Engine::connect(&opts.connection_string).await?;
    engine.ensure_schema().await?;
    sc_core::lookup::seed(&engine).await?;

    let inspector = opts.inspector_archive_url.as_deref().map(|url| Inspector::new(HttpArchiveSource::new(url)));

    let cache = if opts.cache_enabled {
        DiskCache::new(crate::utils::default_cache_dir(), Duration::from_secs(opts.cache_ttl_minutes * 60), true)
    } else {
        DiskCache::disabled()
    };

    let tracker = ProgressTracker::new();
    let runners = sc_providers::vendor_runners(&tracker, &cache, &selected);
    info!(vendors = runners.len(), "starting pull");

    let cancellation = CancellationToken::new();
    let cancellation_for_signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing the in-flight vendor before stopping");
            cancellation_for_signal.cancel();
        }
    });

    let progress_handle = spawn_progress_reporter(tracker.clone());

    let pipeline = Pipeline::new(opts.scd);
    let mut failures = Vec::new();
    for runner in &runners {
        match pipeline.run_vendor(&engine, inspector.as_ref(), runner, &cancellation).await {
            Ok(summary) => println!("{}", crate::utils::format_summary(&summary)),
            Err(err) => {
                warn!(vendor_id = %runner.vendor.vendor_id, %err, "vendor pull failed, continuing with remaining vendors");
                failures.push(runner.vendor.vendor_id.clone());
            }
        }
    }

    progress_handle.abort();

    if !failures.is_empty() && failures.len() == runners.len() {
        return Err(sc_core::error::AdapterError::Other {
            vendor_id: failures.join(","),
            message: "every selected vendor failed".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Polls the tracker every 200ms and redraws an `indicatif` `MultiProgress`
/// until the caller aborts the task. A best-effort display, not part of the
/// pipeline's correctness surface (§9).
fn spawn_progress_reporter(tracker: ProgressTracker) -> tokio::task::JoinHandle<()> {
    use std::collections::HashMap;

    use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

    tokio::spawn(async move {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template("{prefix:.bold} [{bar:30}] {pos}/{len}").unwrap_or_else(|_| ProgressStyle::default_bar());
        let mut bars = HashMap::new();

        loop {
            for snapshot in tracker.tasks().await {
                if snapshot.hidden {
                    if let Some(bar) = bars.remove(&snapshot.id) {
                        let bar: ProgressBar = bar;
                        bar.finish_and_clear();
                    }
                    continue;
                }
                let bar = bars.entry(snapshot.id).or_insert_with(|| {
                    let bar = multi.add(ProgressBar::new(snapshot.total));
                    bar.set_style(style.clone());
                    bar.set_prefix(snapshot.name.clone());
                    bar
                });
                bar.set_length(snapshot.total);
                bar.set_position(snapshot.completed);
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
}
