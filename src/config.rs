//! Engine-wide runtime configuration.

use std::path::PathBuf;

/// Knobs that affect how a graph is executed, but never what it computes.
///
/// A plain `Clone + Debug` struct with a sensible `Default`, no external
/// config-file format imposed on callers.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum number of rows `Sort` holds in memory per run before it
    /// spills the accumulated run to a temporary file. Lower values
    /// exercise the external-sort spill path more readily (useful in
    /// tests); higher values favor throughput on small inputs.
    pub spill_threshold: usize,
    /// Directory spill files are created under. `None` uses the
    /// platform temp directory (`std::env::temp_dir`).
    pub temp_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            spill_threshold: 100_000,
            temp_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn with_spill_threshold(mut self, threshold: usize) -> Self {
        self.spill_threshold = threshold;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}
