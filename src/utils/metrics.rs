//! Observability and Metrics
//!
//! Counters for decode and encode activity across the process.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Surface files decoded
    pub meshes_decoded: AtomicU64,
    /// Surface files encoded
    pub meshes_encoded: AtomicU64,
    /// Scalar volumes decoded
    pub volumes_decoded: AtomicU64,
    /// Total bytes read from decoded files
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
    /// Failed decodes
    pub decode_failures: AtomicU64,
    /// Failed encodes or writes
    pub encode_failures: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl CodecMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            meshes_decoded: AtomicU64::new(0),
            meshes_encoded: AtomicU64::new(0),
            volumes_decoded: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a decoded surface
    pub fn mesh_decoded(&self, byte_count: u64) {
        self.meshes_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an encoded surface
    pub fn mesh_encoded(&self, byte_count: u64) {
        self.meshes_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded volume
    pub fn volume_decoded(&self, byte_count: u64) {
        self.volumes_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            meshes_decoded: self.meshes_decoded.load(Ordering::Relaxed),
            meshes_encoded: self.meshes_encoded.load(Ordering::Relaxed),
            volumes_decoded: self.volumes_decoded.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            meshes_decoded = snapshot.meshes_decoded,
            meshes_encoded = snapshot.meshes_encoded,
            volumes_decoded = snapshot.volumes_decoded,
            bytes_read = snapshot.bytes_read,
            bytes_written = snapshot.bytes_written,
            decode_failures = snapshot.decode_failures,
            encode_failures = snapshot.encode_failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub meshes_decoded: u64,
    pub meshes_encoded: u64,
    pub volumes_decoded: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub decode_failures: u64,
    pub encode_failures: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<CodecMetrics> = once_cell::sync::Lazy::new(CodecMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static CodecMetrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
