//! Tokio plumbing for the synchronous CLI entry point.

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};

/// Lazily built runtime shared by every `block_on` call in the process.
/// The CLI performs a single sequential fetch, so one worker thread is
/// plenty alongside the reactor.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("tokio runtime construction failed")
});

/// Drive a future to completion from non-async code.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    RUNTIME.block_on(future)
}
