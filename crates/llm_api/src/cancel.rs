use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmApiError;

/// Optional cancellation signal shared across request and stream loops.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub(crate) fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|signal| signal.load(Ordering::SeqCst))
}

/// Awaits `future`, polling the cancellation flag so a cancelled stream
/// stops within one poll interval instead of waiting out the transport.
pub(crate) async fn await_or_cancel<F>(
    future: F,
    cancel: Option<&CancellationSignal>,
) -> Result<F::Output, LlmApiError>
where
    F: Future,
{
    let Some(signal) = cancel else {
        return Ok(future.await);
    };

    tokio::pin!(future);
    loop {
        if signal.load(Ordering::SeqCst) {
            return Err(LlmApiError::Cancelled);
        }
        tokio::select! {
            result = &mut future => return Ok(result),
            () = tokio::time::sleep(CANCEL_POLL_INTERVAL) => {}
        }
    }
}
