use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Trailing-edge debounce: `call` schedules `action` after `wait`, and a
/// newer call cancels the pending one.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    wait: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            wait,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, value: T) {
        let action = Arc::clone(&self.action);
        let wait = self.wait;
        let next = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action(value);
        });
        if let Some(previous) = self.pending.lock().replace(next) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}

impl<T> Debouncer<T> {
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_call_fires() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer =
            Debouncer::new(Duration::from_millis(300), move |query: &'static str| {
                sink.lock().push(query)
            });

        debouncer.call("r");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("ru");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("rust");
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(*seen.lock(), vec!["rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let seen = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&seen);
        let debouncer =
            Debouncer::new(Duration::from_millis(50), move |_: ()| *sink.lock() += 1);

        debouncer.call(());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock(), 0);
    }
}
