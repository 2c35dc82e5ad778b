// Install run metrics
//
// Lightweight counters summarizing what a run moved around

use crate::services::{ExtractStats, MirrorStats};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for a single install run
///
/// Uses atomics so the counters can be recorded through a shared reference.
#[derive(Debug)]
pub struct InstallMetrics {
    /// Bytes written by the package download
    pub bytes_downloaded: AtomicU64,

    /// Files copied from the original install
    pub files_mirrored: AtomicUsize,

    /// Bytes copied from the original install
    pub bytes_mirrored: AtomicU64,

    /// Files written from the mod package
    pub files_extracted: AtomicUsize,

    /// Bytes written from the mod package
    pub bytes_extracted: AtomicU64,

    /// Pipeline steps finished
    pub steps_completed: AtomicUsize,

    /// Wall time spent inside steps, in milliseconds
    pub step_time_ms: AtomicU64,

    start_time: Instant,
}

impl InstallMetrics {
    pub fn new() -> Self {
        Self {
            bytes_downloaded: AtomicU64::new(0),
            files_mirrored: AtomicUsize::new(0),
            bytes_mirrored: AtomicU64::new(0),
            files_extracted: AtomicUsize::new(0),
            bytes_extracted: AtomicU64::new(0),
            steps_completed: AtomicUsize::new(0),
            step_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_download(&self, bytes: u64) {
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_mirror(&self, stats: &MirrorStats) {
        self.files_mirrored.fetch_add(stats.files, Ordering::Relaxed);
        self.bytes_mirrored.fetch_add(stats.bytes, Ordering::Relaxed);
    }

    pub fn record_extract(&self, stats: &ExtractStats) {
        self.files_extracted.fetch_add(stats.files, Ordering::Relaxed);
        self.bytes_extracted.fetch_add(stats.bytes, Ordering::Relaxed);
    }

    /// Record a finished step and how long it took
    pub fn record_step(&self, duration: Duration) {
        self.steps_completed.fetch_add(1, Ordering::Relaxed);
        self.step_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Install Summary ===");
        tracing::info!(
            "Steps: {} completed in {:.2}s",
            self.steps_completed.load(Ordering::Relaxed),
            self.elapsed().as_secs_f64()
        );
        tracing::info!(
            "Downloaded: {:.2} MiB",
            self.bytes_downloaded.load(Ordering::Relaxed) as f64 / (1024.0 * 1024.0)
        );
        tracing::info!(
            "Mirrored: {} files ({:.2} MiB)",
            self.files_mirrored.load(Ordering::Relaxed),
            self.bytes_mirrored.load(Ordering::Relaxed) as f64 / (1024.0 * 1024.0)
        );
        tracing::info!(
            "Extracted: {} files ({:.2} MiB)",
            self.files_extracted.load(Ordering::Relaxed),
            self.bytes_extracted.load(Ordering::Relaxed) as f64 / (1024.0 * 1024.0)
        );
    }
}

impl Default for InstallMetrics {
    fn default() -> Self {
        Self::new()
    }
}
