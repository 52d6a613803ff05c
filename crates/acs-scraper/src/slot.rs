//! Per-extractor in-memory TTL cache with in-flight request sharing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};

/// Which tier of the fallback chain produced a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Tier<T> {
    Live(T),
    Cache(T),
    Fallback(T),
}

type InFlight<T> = Shared<BoxFuture<'static, Tier<T>>>;

struct SlotState<T: Clone> {
    fresh: Option<(T, Instant)>,
    in_flight: Option<InFlight<T>>,
}

/// Holds the last live payload for `ttl` and at most one pending load.
///
/// Callers arriving while a load is pending await that same load. The load
/// runs on its own task, so it finishes and records its result even when
/// every caller stops waiting. Only [`Tier::Live`] results are kept;
/// degraded results are returned to every waiter but the next caller after
/// them starts a fresh load.
pub(crate) struct CacheSlot<T: Clone> {
    ttl: Duration,
    state: Arc<Mutex<SlotState<T>>>,
}

impl<T> CacheSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Arc::new(Mutex::new(SlotState {
                fresh: None,
                in_flight: None,
            })),
        }
    }

    /// Must be called from within a tokio runtime.
    pub(crate) async fn get_or_load<F>(&self, load: F) -> Tier<T>
    where
        F: FnOnce() -> BoxFuture<'static, Tier<T>>,
    {
        let pending = {
            let mut state = lock(&self.state);
            if let Some((payload, expires_at)) = &state.fresh {
                if Instant::now() < *expires_at {
                    return Tier::Live(payload.clone());
                }
            }
            match &state.in_flight {
                Some(pending) => pending.clone(),
                None => {
                    let pending = self.start(load());
                    state.in_flight = Some(pending.clone());
                    tokio::spawn(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Wraps `load` so that finishing it clears the in-flight entry and
    /// stores a live result.
    fn start(&self, load: BoxFuture<'static, Tier<T>>) -> InFlight<T> {
        let state = Arc::clone(&self.state);
        let ttl = self.ttl;
        async move {
            let result = load.await;
            let mut guard = lock(&state);
            guard.in_flight = None;
            if let Tier::Live(payload) = &result {
                guard.fresh = Some((payload.clone(), Instant::now() + ttl));
            }
            drop(guard);
            result
        }
        .boxed()
        .shared()
    }
}

fn lock<T: Clone>(state: &Mutex<SlotState<T>>) -> MutexGuard<'_, SlotState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
