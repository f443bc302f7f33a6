//! Bounded concurrent scanner
//!
//! A scan runs one operation per number in `[1, upper]` on the tokio
//! runtime, keeping at most `concurrency` operations in flight. Numbers are
//! submitted through a sliding window as earlier operations finish, so the
//! number of spawned tasks never exceeds the limit.
//!
//! | Operation outcome | Effect on the stream |
//! |-------------------|----------------------|
//! | `Ok(Some(item))`  | `item` is yielded    |
//! | `Ok(None)`        | nothing              |
//! | `Err(_)`          | logged, nothing      |
//! | panic             | logged, nothing      |
//!
//! Items arrive in completion order. The stream ends once every number has
//! been processed, the scan's token is cancelled, or the stream is dropped.

use crate::scan::ScanOptions;
use crate::Result;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Stream of scan matches
///
/// Dropping the stream cancels the scan: no further numbers are submitted
/// and in-flight operations are aborted.
pub struct ScanStream<T> {
    inner: ReceiverStream<T>,
    token: CancellationToken,
    _guard: DropGuard,
}

impl<T> ScanStream<T> {
    /// Stops the scan; items already delivered stay readable
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl<T> Stream for ScanStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

/// Starts a scan over `[1, upper]`
///
/// Must be called from within a tokio runtime.
///
/// # Arguments
///
/// * `upper` - Highest number to process, usually the latest published one
/// * `operation` - Per-number fetch and predicate
/// * `options` - Concurrency limit and cancellation token
///
/// # Returns
///
/// * `Ok(ScanStream)` - The running scan
/// * `Err(XkcdError::Validation)` - `options.concurrency` is zero
pub fn scan<T, F, Fut>(upper: u32, operation: F, options: &ScanOptions) -> Result<ScanStream<T>>
where
    T: Send + 'static,
    F: Fn(u32) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<T>>> + Send + 'static,
{
    options.validate()?;

    // A child token lets the stream cancel itself without cancelling the caller's token
    let token = options.cancel.child_token();
    let (tx, rx) = mpsc::channel(options.concurrency);

    tokio::spawn(drive(upper, operation, options.concurrency, token.clone(), tx));

    Ok(ScanStream {
        inner: ReceiverStream::new(rx),
        token: token.clone(),
        _guard: token.drop_guard(),
    })
}

/// Submits numbers, collects outcomes, and forwards matches
async fn drive<T, F, Fut>(
    upper: u32,
    operation: F,
    concurrency: usize,
    token: CancellationToken,
    tx: mpsc::Sender<T>,
) where
    T: Send + 'static,
    F: Fn(u32) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<T>>> + Send + 'static,
{
    let start_time = Instant::now();
    let mut pending = 1..=upper;
    let mut tasks = JoinSet::new();
    let mut completed = 0usize;
    let mut matched = 0usize;
    let mut failed = 0usize;

    tracing::debug!("Scanning 1..={} with concurrency {}", upper, concurrency);

    loop {
        while tasks.len() < concurrency {
            let Some(number) = pending.next() else {
                break;
            };
            let future = operation(number);
            tasks.spawn(async move { (number, future.await) });
        }

        let joined = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Scan cancelled after {} of {} numbers", completed, upper);
                break;
            }
            _ = tx.closed() => {
                tracing::debug!("Scan consumer went away after {} of {} numbers", completed, upper);
                break;
            }
            joined = tasks.join_next() => joined,
        };

        // No tasks left and nothing pending
        let Some(joined) = joined else {
            break;
        };
        completed += 1;

        match joined {
            Ok((_, Ok(Some(item)))) => {
                matched += 1;
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    sent = tx.send(item) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            Ok((_, Ok(None))) => {}
            Ok((number, Err(e))) => {
                failed += 1;
                tracing::debug!("Scan skipped {}: {}", number, e);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("Scan task did not complete: {}", e);
            }
        }
    }

    tasks.abort_all();

    tracing::info!(
        "Scan finished: {} of {} numbers processed, {} matched, {} failed in {:?}",
        completed,
        upper,
        matched,
        failed,
        start_time.elapsed()
    );
}
