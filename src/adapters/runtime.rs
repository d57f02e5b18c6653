// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared tokio runtime for the remote fetchers.
//!
//! The fetcher port is synchronous. Remote adapters create their clients and
//! run every request on this runtime so that connections outlive whatever
//! runtime the caller happens to be on.

use once_cell::sync::Lazy;
use std::future::Future;

/// Shared runtime for remote fetch operations to avoid creating one per request
static FETCH_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Runtime::new().expect("Failed to create fetch runtime for remote adapters")
});

/// Runs a future to completion on the shared runtime.
///
/// When called from inside another runtime the future is driven from a helper
/// thread, since blocking that runtime's worker is not allowed.
pub(crate) fn block_on<F>(future: F) -> F::Output
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        let handle = std::thread::spawn(move || FETCH_RUNTIME.block_on(future));
        match handle.join() {
            Ok(output) => output,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    } else {
        FETCH_RUNTIME.block_on(future)
    }
}
