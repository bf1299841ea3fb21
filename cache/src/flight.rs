//! Per-key coalescing of in-flight loads.
//!
//! [`FlightGroup`] is a deduplication mechanism, not a cache: it holds a
//! result cell only while a load is in progress. The first caller to miss
//! on a key becomes the leader and spawns the load; everyone else arriving
//! before completion parks on the same cell and receives the same outcome.
//! The key is evicted from the table before waiters wake, so a subsequent
//! miss starts a fresh load.

use crate::error::Error;

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

/// What a finished load hands to every caller parked on it: the loaded
/// value with its concrete type erased, or the shared error.
pub(crate) type FlightOutcome = Result<Arc<dyn Any + Send + Sync>, Error>;

enum State {
  Computing,
  Complete(FlightOutcome),
}

struct Inner {
  state: State,
  waiters: Vec<Waker>,
}

/// The shared result cell for one in-flight load. It can be awaited by any
/// number of tasks simultaneously; completion wakes them all.
pub(crate) struct FlightFuture {
  inner: Mutex<Inner>,
}

impl FlightFuture {
  fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        state: State::Computing,
        waiters: Vec::new(),
      }),
    }
  }

  /// Completes the flight, waking every parked task.
  pub(crate) fn complete(&self, outcome: FlightOutcome) {
    let mut inner = self.inner.lock();
    inner.state = State::Complete(outcome);
    for waker in inner.waiters.drain(..) {
      waker.wake();
    }
  }
}

impl Future for &FlightFuture {
  type Output = FlightOutcome;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut inner = self.inner.lock();
    match &inner.state {
      State::Complete(outcome) => Poll::Ready(outcome.clone()),
      State::Computing => {
        inner.waiters.push(cx.waker().clone());
        Poll::Pending
      }
    }
  }
}

/// How a caller entered a flight.
pub(crate) enum FlightRole {
  /// This caller created the flight and must run the load.
  Leader(Arc<FlightFuture>),
  /// Another caller's load is already in progress; wait on it.
  Waiter(Arc<FlightFuture>),
}

/// The keyed in-flight table. The lock is held only for map operations,
/// never across an await, so unrelated keys do not serialize on it in any
/// observable way.
#[derive(Default)]
pub(crate) struct FlightGroup {
  flights: Mutex<HashMap<String, Arc<FlightFuture>, ahash::RandomState>>,
}

impl FlightGroup {
  /// Joins the flight for `key`, creating it if none is in progress.
  pub(crate) fn join(&self, key: &str) -> FlightRole {
    let mut flights = self.flights.lock();
    if let Some(flight) = flights.get(key) {
      return FlightRole::Waiter(flight.clone());
    }
    let flight = Arc::new(FlightFuture::new());
    flights.insert(key.to_owned(), flight.clone());
    FlightRole::Leader(flight)
  }

  /// Evicts the flight for `key`. Called by the leader once its load has
  /// finished, before the cell completes.
  pub(crate) fn finish(&self, key: &str) {
    self.flights.lock().remove(key);
  }
}
