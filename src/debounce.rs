//! Coalescing wrapper around an expensive asynchronous builder.
//!
//! At most one build runs at a time. Calls made while a build is in flight
//! replace the waiting input; when the build finishes, the newest waiting
//! input is built next and the superseded result is dropped. The final call
//! is never lost.
//!
//! Every delivered result carries a [`RequestToken`]. Callers check
//! [`RequestToken::is_current`] right before applying the result: the token
//! goes stale when a newer call arrives, when [`Debouncer::invalidate`] is
//! called, or for good after [`Debouncer::cancel_all`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tracing::trace;

struct Queue<I> {
    pending: Option<(u64, I)>,
    running: bool,
}

struct TokenState {
    latest: AtomicU64,
    cancelled: AtomicBool,
}

impl TokenState {
    fn bump(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }
}

struct Shared<I> {
    queue: Mutex<Queue<I>>,
    tokens: Arc<TokenState>,
}

/// Validity handle for one delivered result.
#[derive(Clone)]
pub struct RequestToken {
    generation: u64,
    state: Arc<TokenState>,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no newer request exists and the owner is still live.
    pub fn is_current(&self) -> bool {
        !self.state.cancelled.load(Ordering::Acquire)
            && self.state.latest.load(Ordering::Acquire) == self.generation
    }
}

impl std::fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestToken")
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish()
    }
}

#[derive(Debug)]
pub struct Debounced<O> {
    pub output: O,
    pub token: RequestToken,
}

/// Resets the running flag if a driver future is dropped before it
/// finishes.
struct RunningGuard<I> {
    shared: Arc<Shared<I>>,
    armed: bool,
}

impl<I> Drop for RunningGuard<I> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.queue.lock().running = false;
        }
    }
}

type BuildFn<I, O> = dyn Fn(I) -> BoxFuture<'static, O> + Send + Sync;

pub struct Debouncer<I, O> {
    build: Arc<BuildFn<I, O>>,
    shared: Arc<Shared<I>>,
}

impl<I, O> Clone for Debouncer<I, O> {
    fn clone(&self) -> Self {
        Self {
            build: self.build.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<I, O> Debouncer<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, O> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    pending: None,
                    running: false,
                }),
                tokens: Arc::new(TokenState {
                    latest: AtomicU64::new(0),
                    cancelled: AtomicBool::new(false),
                }),
            }),
        }
    }

    /// Registers `input` as the newest request.
    ///
    /// Returns the driver future when no build was running; the caller must
    /// poll it to completion (usually by spawning it). Returns None when the
    /// input was folded into the build already in flight.
    pub fn call(&self, input: I) -> Option<BoxFuture<'static, Option<Debounced<O>>>> {
        if self.is_cancelled() {
            return None;
        }
        {
            let mut queue = self.shared.queue.lock();
            let generation = self.shared.tokens.bump();
            queue.pending = Some((generation, input));
            if queue.running {
                trace!(generation, "request coalesced");
                return None;
            }
            queue.running = true;
        }
        Some(self.drive().boxed())
    }

    fn drive(&self) -> impl std::future::Future<Output = Option<Debounced<O>>> + Send + 'static {
        let build = self.build.clone();
        let shared = self.shared.clone();
        let mut guard = RunningGuard {
            shared: shared.clone(),
            armed: true,
        };
        async move {
            loop {
                let (generation, input) = {
                    let mut queue = shared.queue.lock();
                    match queue.pending.take() {
                        Some(next) => next,
                        None => {
                            guard.armed = false;
                            queue.running = false;
                            return None;
                        }
                    }
                };

                let output = build(input).await;

                let mut queue = shared.queue.lock();
                if queue.pending.is_some() {
                    trace!(generation, "superseded result dropped");
                    continue;
                }
                guard.armed = false;
                queue.running = false;
                drop(queue);

                return Some(Debounced {
                    output,
                    token: RequestToken {
                        generation,
                        state: shared.tokens.clone(),
                    },
                });
            }
        }
    }

    /// Makes every outstanding token stale without stopping future calls.
    pub fn invalidate(&self) {
        let _queue = self.shared.queue.lock();
        self.shared.tokens.bump();
    }

    /// Permanently stops the debouncer: waiting input is dropped, every
    /// token goes stale and later calls are ignored.
    pub fn cancel_all(&self) {
        let mut queue = self.shared.queue.lock();
        queue.pending = None;
        self.shared.tokens.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.tokens.cancelled.load(Ordering::Acquire)
    }

    /// True when no build is in flight.
    pub fn is_idle(&self) -> bool {
        !self.shared.queue.lock().running
    }
}
