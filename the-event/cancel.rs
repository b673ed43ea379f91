//! Cancellation for background tasks whose results may go stale.
//!
//! A [`TaskController`] owns at most one live [`TaskHandle`]. Restarting the
//! controller cancels the previous handle, so a superseded request never gets
//! to deliver its result.

use std::{
  future::Future,
  pin::pin,
  sync::{
    Arc,
    atomic::{
      AtomicBool,
      Ordering,
    },
  },
};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Shared {
  canceled: AtomicBool,
  notify:   Notify,
}

/// Handle given to a spawned task. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TaskHandle {
  shared: Arc<Shared>,
}

impl TaskHandle {
  pub fn is_canceled(&self) -> bool {
    self.shared.canceled.load(Ordering::Acquire)
  }

  /// Resolves once the owning controller cancels or restarts.
  pub async fn canceled(&self) {
    let mut notified = pin!(self.shared.notify.notified());
    notified.as_mut().enable();
    if self.is_canceled() {
      return;
    }
    notified.await;
  }

  fn cancel(&self) {
    self.shared.canceled.store(true, Ordering::Release);
    self.shared.notify.notify_waiters();
  }
}

#[derive(Debug, Default)]
pub struct TaskController {
  current: Option<TaskHandle>,
}

impl TaskController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cancels the running task, if any, and hands out a fresh handle.
  pub fn restart(&mut self) -> TaskHandle {
    self.cancel();
    let handle = TaskHandle {
      shared: Arc::default(),
    };
    self.current = Some(handle.clone());
    handle
  }

  pub fn cancel(&mut self) {
    if let Some(handle) = self.current.take() {
      handle.cancel();
    }
  }

  /// Whether a task started by the last `restart` still holds its handle.
  pub fn is_running(&self) -> bool {
    self
      .current
      .as_ref()
      .is_some_and(|handle| !handle.is_canceled() && Arc::strong_count(&handle.shared) > 1)
  }
}

impl Drop for TaskController {
  fn drop(&mut self) {
    self.cancel();
  }
}

/// Runs `future` until it finishes or `handle` is canceled, whichever comes
/// first. Returns `None` on cancellation.
pub async fn cancelable_future<T>(future: impl Future<Output = T>, handle: TaskHandle) -> Option<T> {
  tokio::select! {
    biased;
    _ = handle.canceled() => None,
    res = future => Some(res),
  }
}
