//! Batch driver.
//!
//! Runs the transform stage over an ordered list of [`BatchItem`]s, reports
//! progress, and keeps going when individual items fail.
//!
//! ## Contract
//!
//! - Configuration problems (zero target size, missing output directory, a
//!   suffix with a path separator, a non-positive brightness factor) are caught
//!   by [`BatchConfig::validate`] before any item runs, as a single error.
//! - Per-item problems never abort the run. Each one is reported through
//!   [`BatchObserver::on_item_failed`] and counted in [`BatchResult::failed`].
//! - An empty item list returns a zeroed result without calling the observer.
//!
//! ## Sequential and parallel runs
//!
//! With `jobs == 1` items run one after another on the calling thread, in
//! order, and `on_progress` is called with `0, 1, 2, ...` before each item.
//!
//! With `jobs > 1` items run on a dedicated [rayon](https://docs.rs/rayon)
//! pool. Counters are atomics and every observer call goes through a single
//! mutex, so observers never see interleaved calls and progress indices still
//! arrive strictly increasing. Which item gets which index is no longer
//! deterministic; only the final counts are.
//!
//! ## Cancellation
//!
//! A [`CancelToken`] is checked before each item starts and once more right
//! before its encode. Items that never start are counted as cancelled. An item
//! whose encode has begun always finishes.

use crate::config::ConfigError;
use crate::imaging::operations::{ItemGuard, TransformError, transform_guarded};
use crate::imaging::{FitMode, ImageBackend, Quality, TargetSize};
use crate::naming::suffix_has_separator;
use crate::types::{BatchItem, BatchResult};
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Immutable snapshot of everything a batch needs.
///
/// Built once before the run; nothing is re-read while items are processed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub target: TargetSize,
    pub fit_mode: FitMode,
    /// Brightness multiplier. `None` or `Some(1.0)` leaves pixels alone.
    pub brightness: Option<f32>,
    pub output_dir: PathBuf,
    pub suffix: String,
    pub quality: Quality,
    /// Worker count. 1 runs sequentially on the calling thread.
    pub jobs: usize,
    /// Per-item watchdog, checked between stages.
    pub item_timeout: Option<Duration>,
}

impl BatchConfig {
    /// Config with the stock defaults: stretch, no brightness, `_resized`, sequential.
    pub fn new(target: TargetSize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            fit_mode: FitMode::default(),
            brightness: None,
            output_dir: output_dir.into(),
            suffix: crate::config::DEFAULT_SUFFIX.to_string(),
            quality: Quality::default(),
            jobs: 1,
            item_timeout: None,
        }
    }

    /// Reject configurations that would make every item fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(ConfigError::Validation(format!(
                "target size must be positive, got {}",
                self.target
            )));
        }
        if suffix_has_separator(&self.suffix) {
            return Err(ConfigError::Validation(format!(
                "suffix {:?} must not contain a path separator",
                self.suffix
            )));
        }
        if let Some(factor) = self.brightness
            && !(factor.is_finite() && factor > 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "brightness factor must be a positive number, got {factor}"
            )));
        }
        validate_output_dir(&self.output_dir)?;
        Ok(())
    }
}

fn validate_output_dir(dir: &Path) -> Result<(), ConfigError> {
    let meta = std::fs::metadata(dir).map_err(|e| {
        ConfigError::Validation(format!(
            "output directory {} is not accessible: {e}",
            dir.display()
        ))
    })?;
    if !meta.is_dir() {
        return Err(ConfigError::Validation(format!(
            "output path {} is not a directory",
            dir.display()
        )));
    }
    if meta.permissions().readonly() {
        return Err(ConfigError::Validation(format!(
            "output directory {} is read-only",
            dir.display()
        )));
    }
    Ok(())
}

/// Shared flag for stopping a batch early.
///
/// Cheap to clone; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives progress from [`run_batch`].
///
/// All methods default to doing nothing. Calls are never concurrent, even in
/// a parallel run.
pub trait BatchObserver: Sync {
    /// Item `index` (0-based, out of `total`) is about to be processed.
    fn on_progress(&self, _index: usize, _total: usize, _display_name: &str) {}

    /// Item finished and its output was written to `output`.
    fn on_item_done(&self, _display_name: &str, _output: &Path) {}

    /// Item failed; the batch carries on.
    fn on_item_failed(&self, _display_name: &str, _error: &TransformError) {}

    /// Last call of a non-empty batch.
    fn on_finished(&self, _result: &BatchResult) {}
}

/// Observer that ignores everything.
impl BatchObserver for () {}

/// Event form of the observer callbacks, for sending to another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        index: usize,
        total: usize,
        display_name: String,
    },
    Done {
        display_name: String,
        output: PathBuf,
    },
    Failed {
        display_name: String,
        error: String,
    },
    Finished(BatchResult),
}

/// Forwards callbacks as [`BatchEvent`]s. A dropped receiver is ignored.
impl BatchObserver for Sender<BatchEvent> {
    fn on_progress(&self, index: usize, total: usize, display_name: &str) {
        self.send(BatchEvent::Started {
            index,
            total,
            display_name: display_name.to_string(),
        })
        .ok();
    }

    fn on_item_done(&self, display_name: &str, output: &Path) {
        self.send(BatchEvent::Done {
            display_name: display_name.to_string(),
            output: output.to_path_buf(),
        })
        .ok();
    }

    fn on_item_failed(&self, display_name: &str, error: &TransformError) {
        self.send(BatchEvent::Failed {
            display_name: display_name.to_string(),
            error: error.to_string(),
        })
        .ok();
    }

    fn on_finished(&self, result: &BatchResult) {
        self.send(BatchEvent::Finished(*result)).ok();
    }
}

/// Running counters plus the lock that serializes observer calls.
struct Tally<'a, O: BatchObserver + ?Sized> {
    observer: &'a O,
    total: usize,
    /// Next progress index; also the lock every observer call takes.
    started: Mutex<usize>,
    processed: AtomicUsize,
    failed: AtomicUsize,
    cancelled: AtomicUsize,
}

impl<'a, O: BatchObserver + ?Sized> Tally<'a, O> {
    fn new(observer: &'a O, total: usize) -> Self {
        Self {
            observer,
            total,
            started: Mutex::new(0),
            processed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            cancelled: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        self.started.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> BatchResult {
        BatchResult {
            processed: self.processed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
            total: self.total,
        }
    }
}

fn process_item<B, O>(
    backend: &B,
    item: &BatchItem,
    config: &BatchConfig,
    cancel: Option<&CancelToken>,
    tally: &Tally<'_, O>,
) where
    B: ImageBackend,
    O: BatchObserver + ?Sized,
{
    if cancel.is_some_and(CancelToken::is_cancelled) {
        tally.cancelled.fetch_add(1, Ordering::SeqCst);
        return;
    }

    {
        let mut next = tally.lock();
        tally
            .observer
            .on_progress(*next, tally.total, &item.display_name);
        *next += 1;
    }

    let guard = ItemGuard::new(cancel, config.item_timeout);
    match transform_guarded(backend, &item.source_path, config, &guard) {
        Ok(output) => {
            tally.processed.fetch_add(1, Ordering::SeqCst);
            let _lock = tally.lock();
            tally.observer.on_item_done(&item.display_name, &output);
        }
        Err(TransformError::Cancelled) => {
            tally.cancelled.fetch_add(1, Ordering::SeqCst);
        }
        Err(e) => {
            warn!("{}: {}", item.display_name, e);
            tally.failed.fetch_add(1, Ordering::SeqCst);
            let _lock = tally.lock();
            tally.observer.on_item_failed(&item.display_name, &e);
        }
    }
}

/// Run a batch to completion.
///
/// Returns an error only for invalid configuration, before any item runs.
/// Item failures are counted in the returned [`BatchResult`].
pub fn run_batch<B, O>(
    backend: &B,
    items: &[BatchItem],
    config: &BatchConfig,
    observer: &O,
    cancel: Option<&CancelToken>,
) -> Result<BatchResult, ConfigError>
where
    B: ImageBackend,
    O: BatchObserver + ?Sized,
{
    config.validate()?;

    if items.is_empty() {
        return Ok(BatchResult::default());
    }

    info!(
        "resizing {} images to {} ({}) into {}",
        items.len(),
        config.target,
        config.fit_mode,
        config.output_dir.display()
    );

    let tally = Tally::new(observer, items.len());
    let pool = if config.jobs > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| {
                warn!(
                    "could not start {} workers, running sequentially: {e}",
                    config.jobs
                )
            })
            .ok()
    } else {
        None
    };

    match pool {
        Some(pool) => pool.install(|| {
            items
                .par_iter()
                .for_each(|item| process_item(backend, item, config, cancel, &tally));
        }),
        None => {
            for item in items {
                process_item(backend, item, config, cancel, &tally);
            }
        }
    }

    let result = tally.snapshot();
    info!(
        "batch finished: {} processed, {} failed, {} cancelled of {}",
        result.processed, result.failed, result.cancelled, result.total
    );
    observer.on_finished(&result);
    Ok(result)
}
