use std::{future::Future, pin::Pin};

/// A trait for spawning a future onto an asynchronous runtime.
///
/// The engine runs every load as a detached task so that a caller going
/// away cannot abandon a flight other callers are parked on. This trait is
/// the seam between the engine and whichever runtime hosts those tasks.
pub trait TaskSpawner: Send + Sync + 'static {
  /// Spawns a type-erased future.
  fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>);
}

/// A [`TaskSpawner`] backed by a Tokio runtime handle.
#[cfg(feature = "tokio")]
pub struct TokioSpawner(tokio::runtime::Handle);

#[cfg(feature = "tokio")]
impl TokioSpawner {
  /// Creates a spawner that uses the current Tokio runtime context.
  /// Panics if called outside of a Tokio runtime.
  pub fn new() -> Self {
    Self(tokio::runtime::Handle::current())
  }

  /// Creates a spawner bound to an explicit runtime handle.
  pub fn from_handle(handle: tokio::runtime::Handle) -> Self {
    Self(handle)
  }
}

#[cfg(feature = "tokio")]
impl Default for TokioSpawner {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(feature = "tokio")]
impl TaskSpawner for TokioSpawner {
  fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
    self.0.spawn(future);
  }
}
