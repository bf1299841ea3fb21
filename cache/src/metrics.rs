use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_utils::CachePadded;

/// Lock-free counters for the read-through engine's events.
/// All fields are atomic to allow updates from any task without locking.
#[derive(Debug)]
pub(crate) struct Metrics {
  /// Backend reads that returned a value.
  pub(crate) hits: CachePadded<AtomicU64>,
  /// Backend reads that failed for any reason.
  pub(crate) misses: CachePadded<AtomicU64>,
  /// Calls that skipped the backend because `should_cache` was false.
  pub(crate) bypasses: CachePadded<AtomicU64>,

  /// Loader invocations (one per flight, regardless of caller count).
  pub(crate) loads: CachePadded<AtomicU64>,
  pub(crate) load_failures: CachePadded<AtomicU64>,
  /// Callers that joined an already in-flight load instead of starting one.
  pub(crate) coalesced: CachePadded<AtomicU64>,

  pub(crate) write_backs: CachePadded<AtomicU64>,
  pub(crate) write_back_failures: CachePadded<AtomicU64>,

  created_at: Instant,
}

// Manual implementation of Default to handle the non-default `Instant`.
impl Default for Metrics {
  fn default() -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      bypasses: CachePadded::new(AtomicU64::new(0)),
      loads: CachePadded::new(AtomicU64::new(0)),
      load_failures: CachePadded::new(AtomicU64::new(0)),
      coalesced: CachePadded::new(AtomicU64::new(0)),
      write_backs: CachePadded::new(AtomicU64::new(0)),
      write_back_failures: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Takes a consistent-enough snapshot of all counters. Individual loads
  /// are relaxed; this is a monitoring surface, not a synchronization one.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    MetricsSnapshot {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
      bypasses: self.bypasses.load(Ordering::Relaxed),
      loads: self.loads.load(Ordering::Relaxed),
      load_failures: self.load_failures.load(Ordering::Relaxed),
      coalesced: self.coalesced.load(Ordering::Relaxed),
      write_backs: self.write_backs.load(Ordering::Relaxed),
      write_back_failures: self.write_back_failures.load(Ordering::Relaxed),
      uptime: self.created_at.elapsed(),
    }
  }
}

/// A point-in-time view of the engine's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
  pub hits: u64,
  pub misses: u64,
  pub bypasses: u64,
  pub loads: u64,
  pub load_failures: u64,
  pub coalesced: u64,
  pub write_backs: u64,
  pub write_back_failures: u64,
  pub uptime: Duration,
}
