//! Lightweight run counters (feature `metrics`).
//!
//! Covers what a single-threaded row engine actually wants to report:
//! how many rows each operator saw, and how long a run took.
//! Gauges/histograms have no caller in this crate and aren't provided.
//!
//! # Example
//!
//! ```
//! use tabflow::metrics::MetricsCollector;
//!
//! let metrics = MetricsCollector::new();
//! metrics.record_start();
//! metrics.increment_counter("rows_read", 3);
//! metrics.record_end();
//! assert_eq!(metrics.snapshot().get("rows_read"), Some(&3));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct MetricsCollectorInner {
    counters: HashMap<String, u64>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

/// Thread-safe container for collecting run-time counters. `Clone`able
/// handles share the same underlying counters (an `Arc<Mutex<_>>`), so
/// the executor and a caller holding on to the collector after `run`
/// observe the same counts.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsCollectorInner>>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        MetricsCollector {
            inner: Arc::new(Mutex::new(MetricsCollectorInner::default())),
        }
    }

    pub fn record_start(&self) {
        self.inner.lock().unwrap().start_time = Some(Instant::now());
    }

    pub fn record_end(&self) {
        self.inner.lock().unwrap().end_time = Some(Instant::now());
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.inner.lock().unwrap();
        match (inner.start_time, inner.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    pub fn increment_counter(&self, name: &str, by: u64) {
        let mut inner = self.inner.lock().unwrap();
        *inner.counters.entry(name.to_string()).or_insert(0) += by;
    }

    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.inner.lock().unwrap().counters.clone()
    }

    /// Prints counters to stdout, sorted by name, the way a CLI
    /// binary's `--verbose` flag would.
    pub fn print(&self) {
        let inner = self.inner.lock().unwrap();
        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            println!("run time: {:.3}s", end.duration_since(start).as_secs_f64());
        }
        let mut counters: Vec<_> = inner.counters.iter().collect();
        counters.sort_by_key(|(name, _)| name.clone());
        for (name, value) in counters {
            println!("{name}: {value}");
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
