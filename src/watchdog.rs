//! Bounded-wait invocation of measured routines.
//!
//! With a per-call limit armed, each invocation runs on a dedicated scoped
//! worker thread while the measuring thread waits on a channel with the
//! limit as its deadline. A deadline miss is reported to stderr right away;
//! the worker is then joined and the exact measured elapsed time decides the
//! final classification. The worker never outlives the invocation, so a
//! limit can never fire against a later call.
//!
//! A routine that blocks forever cannot be preempted from safe code: the
//! overrun is detected and reported at the deadline, but the join still has
//! to wait for the call to return. Callers who need hard preemption must
//! build it into the routine itself.
//!
//! Without a limit the routine is invoked inline, with no thread overhead.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of a single watched invocation.
#[derive(Debug)]
pub(crate) enum Invocation {
    /// The routine returned within the limit (or no limit was armed).
    Completed(Duration),
    /// The routine returned, but only after the limit had expired.
    Overran(Duration),
    /// The routine panicked; the payload is rendered as text.
    Panicked(String),
}

/// Invoke `routine` once, timing it and enforcing `limit` when non-zero.
///
/// Timing starts inside the worker immediately before the call, so thread
/// spawn overhead never pollutes the measured duration.
pub(crate) fn invoke_watched<T, F>(routine: &mut F, limit: Duration) -> Invocation
where
    F: FnMut() -> T + Send,
{
    if limit.is_zero() {
        return invoke_inline(routine);
    }

    let (finished_tx, finished_rx) = mpsc::channel::<()>();
    thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let started = Instant::now();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                std::hint::black_box(routine());
            }));
            let elapsed = started.elapsed();
            // The receiver only disappears if the waiter is already gone.
            let _ = finished_tx.send(());
            outcome.map(|_| elapsed).map_err(|payload| panic_message(payload.as_ref()))
        });

        if finished_rx.recv_timeout(limit).is_err() {
            eprintln!(
                "[time-trial] watchdog: call still running after {limit:?}, waiting for it to return"
            );
        }

        match worker.join() {
            Ok(Ok(elapsed)) if elapsed > limit => Invocation::Overran(elapsed),
            Ok(Ok(elapsed)) => Invocation::Completed(elapsed),
            Ok(Err(message)) => Invocation::Panicked(message),
            // catch_unwind means the worker closure itself cannot unwind.
            Err(_) => Invocation::Panicked("worker thread died outside the measured call".into()),
        }
    })
}

fn invoke_inline<T, F>(routine: &mut F) -> Invocation
where
    F: FnMut() -> T,
{
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        std::hint::black_box(routine());
    }));
    let elapsed = started.elapsed();
    match outcome {
        Ok(_) => Invocation::Completed(elapsed),
        Err(payload) => Invocation::Panicked(panic_message(payload.as_ref())),
    }
}

/// Render a panic payload as text; `panic!` produces `&str` or `String`
/// payloads, anything else gets a placeholder.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
