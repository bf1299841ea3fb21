//! Per-call configuration and its functional options.
//!
//! A fresh [`Config`] is built for every engine call from the engine's
//! default TTL, then overridden by an ordered list of [`ConfigOption`]s.
//! Later options win on the same field. The config is never validated
//! beyond its types: a zero TTL is passed through to the backend
//! uninterpreted, and the backend decides what it means.

use std::time::Duration;

/// Resolved per-call settings. Created fresh for each call, mutated only
/// while options are applied, then read-only for the rest of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Config {
  pub(crate) should_cache: bool,
  pub(crate) ttl: Duration,
}

impl Config {
  pub(crate) fn new(default_ttl: Duration) -> Self {
    Self {
      should_cache: true,
      ttl: default_ttl,
    }
  }

  /// Applies options left-to-right and returns the resolved config.
  pub(crate) fn apply(mut self, options: &[ConfigOption]) -> Self {
    for option in options {
      option.apply_to(&mut self);
    }
    self
  }
}

/// A single field override for one engine call.
///
/// Construct these with [`with_should_cache`] and [`with_ttl`] and pass them
/// to `Cache::get_or_load`. Options are applied in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
  /// Whether this call may read from and write to the backend. `false`
  /// selects bypass mode: the loader runs every time and the backend is
  /// never touched.
  ShouldCache(bool),
  /// Time-to-live for a value written back by this call.
  Ttl(Duration),
}

impl ConfigOption {
  fn apply_to(&self, config: &mut Config) {
    match *self {
      ConfigOption::ShouldCache(should_cache) => config.should_cache = should_cache,
      ConfigOption::Ttl(ttl) => config.ttl = ttl,
    }
  }
}

/// Overrides whether the call reads from and writes to the backend.
pub fn with_should_cache(should_cache: bool) -> ConfigOption {
  ConfigOption::ShouldCache(should_cache)
}

/// Overrides the TTL used if this call writes a loaded value back.
pub fn with_ttl(ttl: Duration) -> ConfigOption {
  ConfigOption::Ttl(ttl)
}
