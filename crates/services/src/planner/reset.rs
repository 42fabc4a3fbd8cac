use std::time::Duration;

use tokio::task::JoinHandle;

/// A deferred callback that can be cancelled before it fires.
///
/// Dropping the handle cancels it.
#[derive(Debug, Default)]
pub(crate) struct ResetTimer {
    pending: Option<JoinHandle<()>>,
}

impl ResetTimer {
    /// Run `callback` after `delay`, replacing any pending callback.
    pub(crate) fn schedule<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
