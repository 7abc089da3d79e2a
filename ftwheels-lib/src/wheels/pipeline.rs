use super::{AnnotatedPackage, Classification, DistributionRecord, Progress, ProviderResult, Throttler};
use crate::Result;
use crate::source::{Candidate, omit_deprecated};
use core::num::NonZero;
use core::sync::atomic::{AtomicU64, Ordering};
use ohno::IntoAppError;
use std::sync::Arc;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "  pipeline";

/// Upper bound of the default worker pool size.
const MAX_DEFAULT_CONCURRENCY: usize = 32;

/// Anything that can report the wheels published for a package.
pub trait WheelSource: Send + Sync + 'static {
    fn distribution_record(&self, name: &str) -> impl Future<Output = ProviderResult<DistributionRecord>> + Send;
}

/// Default size of the worker pool: the number of CPUs plus four, capped at 32.
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map_or(1, NonZero::get)
        .saturating_add(4)
        .min(MAX_DEFAULT_CONCURRENCY)
}

/// What one scan task found out about its candidate.
struct Scan {
    candidate: Candidate,
    classification: Classification,

    /// The metadata could not be fetched, so `classification` is a fallback.
    fetch_failed: bool,
}

/// The outcome of [`Pipeline::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Relevant packages, in rank order.
    pub packages: Vec<AnnotatedPackage>,

    /// Consumed candidates whose metadata could not be fetched, in rank order.
    pub failed: Vec<Candidate>,
}

/// Marks progress as done when dropped, including on early returns.
struct DoneOnDrop<'a>(&'a dyn Progress);

impl Drop for DoneOnDrop<'_> {
    fn drop(&mut self) {
        self.0.done();
    }
}

/// A spawned scan that is aborted when dropped.
struct ScanTask(JoinHandle<Scan>);

impl Drop for ScanTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Candidates in scan order plus the tasks scheduled for a prefix of them.
///
/// `scans[i]` always belongs to `candidates[i]`, and `next_unscheduled` only grows.
struct Worklist<T> {
    candidates: Vec<Candidate>,
    scans: Vec<T>,
    next_unscheduled: usize,
}

impl<T> Worklist<T> {
    fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            scans: Vec::new(),
            next_unscheduled: 0,
        }
    }

    /// Schedule the next candidate. Returns `false` once candidates are exhausted.
    fn schedule_next(&mut self, spawn: impl FnOnce(usize, Candidate) -> T) -> bool {
        let Some(candidate) = self.candidates.get(self.next_unscheduled) else {
            return false;
        };

        self.scans.push(spawn(self.next_unscheduled, candidate.clone()));
        self.next_unscheduled += 1;
        true
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.scans.get_mut(index)
    }

    const fn scheduled(&self) -> usize {
        self.next_unscheduled
    }
}

/// Classifies ranked candidates until enough relevant packages are found.
pub struct Pipeline<S> {
    source: Arc<S>,
    throttler: Arc<Throttler>,
    include_no_wheel: bool,
    progress: Arc<dyn Progress>,
}

impl<S: core::fmt::Debug> core::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source)
            .field("throttler", &self.throttler)
            .field("include_no_wheel", &self.include_no_wheel)
            .field("progress", &"<dyn Progress>")
            .finish()
    }
}

impl<S: WheelSource> Pipeline<S> {
    #[must_use]
    pub fn new(source: S, max_concurrent: usize, include_no_wheel: bool, progress: impl Progress + 'static) -> Self {
        Self {
            source: Arc::new(source),
            throttler: Throttler::new(max_concurrent),
            include_no_wheel,
            progress: Arc::new(progress),
        }
    }

    /// Return up to `target` relevant packages, in the order of `candidates`.
    ///
    /// Deprecated names are dropped before any fetch. Fetches run concurrently, but
    /// results are consumed in scan order; every irrelevant result schedules the next
    /// candidate. Running out of candidates yields a shorter result. A scan task that
    /// panics is reported as an error.
    pub async fn classify(&self, candidates: impl IntoIterator<Item = Candidate>, target: usize) -> Result<ScanReport> {
        let mut worklist: Worklist<ScanTask> = Worklist::new(omit_deprecated(candidates).collect());
        let mut results = Vec::with_capacity(target);
        let mut failed = Vec::new();

        let accepted = Arc::new(AtomicU64::new(0));
        let scanned = Arc::new(AtomicU64::new(0));
        self.progress.set_phase("Scanning");
        self.progress.set_determinate(Box::new({
            let accepted = Arc::clone(&accepted);
            let scanned = Arc::clone(&scanned);
            let target = u64::try_from(target).unwrap_or(u64::MAX);
            move || {
                let scanned = scanned.load(Ordering::Relaxed);
                (target, accepted.load(Ordering::Relaxed), format!("{scanned} packages scanned"))
            }
        }));
        let _done = DoneOnDrop(&*self.progress);

        for _ in 0..target {
            if !worklist.schedule_next(|rank, candidate| self.spawn_scan(rank, candidate)) {
                break;
            }
        }

        let mut cursor = 0;
        while results.len() < target {
            let Some(task) = worklist.get_mut(cursor) else {
                log::debug!(target: LOG_TARGET, "Ran out of candidates after {cursor} packages");
                break;
            };

            let Scan {
                candidate,
                classification,
                fetch_failed,
            } = (&mut task.0)
                .await
                .into_app_err_with(|| format!("scan task #{} failed", cursor + 1))?;
            cursor += 1;
            _ = scanned.fetch_add(1, Ordering::Relaxed);

            if fetch_failed {
                failed.push(candidate.clone());
            }

            if classification.is_relevant(self.include_no_wheel) {
                log::info!(target: LOG_TARGET, "Added '{candidate}' to results ({}/{target})", results.len() + 1);
                results.push(AnnotatedPackage::new(candidate, classification));
                _ = accepted.fetch_add(1, Ordering::Relaxed);
            } else {
                log::info!(target: LOG_TARGET, "Skipping '{candidate}' ({classification})");
                _ = worklist.schedule_next(|rank, candidate| self.spawn_scan(rank, candidate));
            }
        }

        let pending = worklist.scheduled() - cursor;
        if pending > 0 {
            log::debug!(target: LOG_TARGET, "Discarding {pending} pending scan(s)");
        }

        log::info!(target: LOG_TARGET, "Scanned {cursor} packages in total");

        Ok(ScanReport {
            packages: results,
            failed,
        })
    }

    fn spawn_scan(&self, rank: usize, candidate: Candidate) -> ScanTask {
        let source = Arc::clone(&self.source);
        let throttler = Arc::clone(&self.throttler);

        ScanTask(tokio::spawn(async move {
            let _permit = throttler.acquire().await;
            log::info!(target: LOG_TARGET, "{} Checking published wheels for '{candidate}'", rank + 1);

            let (classification, fetch_failed) = match source.distribution_record(candidate.name()).await {
                ProviderResult::Found(record) => (record.classification(), false),
                ProviderResult::Unavailable(reason) => {
                    log::warn!(target: LOG_TARGET, "No metadata for '{candidate}': {reason}");
                    (Classification::NoWheel, false)
                }
                ProviderResult::Error(e) => {
                    log::warn!(target: LOG_TARGET, "Could not fetch metadata for '{candidate}': {e:#}");
                    (Classification::NoWheel, true)
                }
            };

            Scan {
                candidate,
                classification,
                fetch_failed,
            }
        }))
    }
}
