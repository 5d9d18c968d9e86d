use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::TaskFailed;

/// Submits blocking scan work to a runtime's blocking pool.
///
/// The pool size is fixed when the runtime is built; excess submissions
/// queue.
#[derive(Clone, Debug)]
pub struct ScanExecutor {
    handle: Handle,
}

impl ScanExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Executor on the runtime driving the current task.
    ///
    /// Panics outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn submit<F, T>(&self, label: &'static str, work: F) -> ScanTask<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let span = tracing::debug_span!("scan", task = label);
        let join = self.handle.spawn_blocking(move || {
            let _entered = span.enter();
            work()
        });
        ScanTask { join, label }
    }
}

/// Pending result of a submitted scan.
#[must_use = "a scan task does nothing useful unless awaited"]
pub struct ScanTask<T> {
    join: JoinHandle<T>,
    label: &'static str,
}

impl<T> ScanTask<T> {
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<T> Future for ScanTask<T> {
    type Output = Result<T, TaskFailed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let label = this.label;
        Pin::new(&mut this.join).poll(cx).map_err(|e| TaskFailed {
            label,
            reason: e.to_string(),
        })
    }
}
