//! Shared test utilities for the batch-resize test suite.
//!
//! Provides image fixture writers, a ready-made [`BatchConfig`], and an
//! observer that records every callback for later assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("wide.png"), 200, 100);
//!
//! let config = test_config(tmp.path(), 100, 100, FitMode::CropToFill);
//! let observer = RecordingObserver::default();
//! run_batch(&RustBackend::new(), &items, &config, &observer, None).unwrap();
//!
//! assert_eq!(observer.progress().len(), 1);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::batch::{BatchConfig, BatchObserver};
use crate::imaging::{FitMode, TargetSize, TransformError};
use crate::types::BatchResult;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a `width`x`height` gradient image; the format follows the extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Write a `width`x`height` image where every channel is `value`.
pub fn write_solid_image(path: &Path, width: u32, height: u32, value: u8) {
    image::RgbImage::from_pixel(width, height, image::Rgb([value; 3]))
        .save(path)
        .unwrap();
}

/// Sequential stock config targeting `width`x`height` in `output_dir`.
pub fn test_config(
    output_dir: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fit_mode: FitMode,
) -> BatchConfig {
    BatchConfig {
        fit_mode,
        ..BatchConfig::new(TargetSize::new(width, height), output_dir)
    }
}

// =========================================================================
// Observer
// =========================================================================

/// Observer that keeps every callback it receives.
#[derive(Default)]
pub struct RecordingObserver {
    progress: Mutex<Vec<(usize, usize, String)>>,
    done: Mutex<Vec<(String, PathBuf)>>,
    failures: Mutex<Vec<String>>,
    finished: Mutex<Vec<BatchResult>>,
}

impl RecordingObserver {
    pub fn progress(&self) -> Vec<(usize, usize, String)> {
        self.progress.lock().unwrap().clone()
    }

    pub fn done(&self) -> Vec<(String, PathBuf)> {
        self.done.lock().unwrap().clone()
    }

    /// Display names of failed items, in callback order.
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<BatchResult> {
        self.finished.lock().unwrap().clone()
    }
}

impl BatchObserver for RecordingObserver {
    fn on_progress(&self, index: usize, total: usize, display_name: &str) {
        self.progress
            .lock()
            .unwrap()
            .push((index, total, display_name.to_string()));
    }

    fn on_item_done(&self, display_name: &str, output: &Path) {
        self.done
            .lock()
            .unwrap()
            .push((display_name.to_string(), output.to_path_buf()));
    }

    fn on_item_failed(&self, display_name: &str, _error: &TransformError) {
        self.failures.lock().unwrap().push(display_name.to_string());
    }

    fn on_finished(&self, result: &BatchResult) {
        self.finished.lock().unwrap().push(*result);
    }
}
