//! Cancellable background actions.

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use qrscan_core::error::{Result, ScanError};

/// Handle to a spawned user action.
///
/// Cancelling resolves the action with `ScanError::Cancelled` unless it has
/// already started mutating the session, in which case it runs to completion.
#[derive(Debug)]
pub struct ActionTask<T> {
    handle: JoinHandle<Result<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> ActionTask<T> {
    /// Spawns `make(token)` on the current runtime.
    pub fn spawn<F, Fut>(make: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(make(token.clone()));
        Self { handle, token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the action's result.
    pub async fn join(self) -> Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ScanError::Cancelled),
            Err(e) => Err(ScanError::internal(format!("Action task failed: {}", e))),
        }
    }
}

/// Runs `fut` unless `token` is cancelled first.
pub(crate) async fn until_cancelled<T>(
    token: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ScanError::Cancelled),
        result = fut => result,
    }
}
