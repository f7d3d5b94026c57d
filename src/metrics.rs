//! Observability metrics for cache reads.
//!
//! Tracks how long the engine call and the local copy took for the most
//! recent read. Metrics are serde-serializable so a host layer can export
//! them without this crate taking on an exporter dependency.

use serde::{Deserialize, Serialize};

/// Snapshot of the most recent read operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadMetrics {
    /// Time spent inside the engine call, in microseconds
    pub engine_time_micros: u64,

    /// Time spent copying the foreign buffer into owned memory, in
    /// microseconds (0 for a zero-length read)
    pub materialize_time_micros: u64,

    /// Number of bytes the read produced
    pub bytes_read: u64,

    /// Whether the read carried XTEA key material
    pub keyed: bool,
}

impl ReadMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        ReadMetrics {
            engine_time_micros: 0,
            materialize_time_micros: 0,
            bytes_read: 0,
            keyed: false,
        }
    }

    /// Set engine call metrics
    pub fn with_engine_call(mut self, time_micros: u64, bytes_read: usize, keyed: bool) -> Self {
        self.engine_time_micros = time_micros;
        self.bytes_read = bytes_read as u64;
        self.keyed = keyed;
        self
    }

    /// Set materialization metrics
    pub fn with_materialize(mut self, time_micros: u64) -> Self {
        self.materialize_time_micros = time_micros;
        self
    }

    /// Total read time in microseconds
    pub fn total_time_micros(&self) -> u64 {
        self.engine_time_micros + self.materialize_time_micros
    }
}

impl Default for ReadMetrics {
    fn default() -> Self {
        Self::new()
    }
}
