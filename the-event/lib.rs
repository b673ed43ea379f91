//! Event plumbing shared by the composer: debounced async hooks and
//! cancellable background tasks.

mod cancel;
mod debounce;

pub use cancel::{
  TaskController,
  TaskHandle,
  cancelable_future,
};
pub use debounce::{
  AsyncHook,
  send_blocking,
};
