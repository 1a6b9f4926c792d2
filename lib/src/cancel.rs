//! Provides a broadcast cancellation signal shared between scanning threads

use std::{
    mem,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[derive(Debug, Default)]
struct State {
    cancelled: bool,
    children: Vec<CancelToken>,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<State>,
    cancelled: Condvar,
}

/// A cancellation flag observable by any number of threads
///
/// Clones share the same flag. Cancelling is idempotent and wakes every
/// thread blocked in [`CancelToken::wait`] or [`CancelToken::wait_timeout`];
/// observing the flag never consumes it. Cancelling a token also cancels
/// every token derived from it with [`CancelToken::child`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Returns a new token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a token that is cancelled along with this one but can also be
    /// cancelled on its own without affecting this one
    pub fn child(&self) -> CancelToken {
        let child = CancelToken::new();
        let mut state = self.state();

        if state.cancelled {
            drop(state);
            child.cancel();
        } else {
            state.children.push(child.clone());
        }

        child
    }

    /// Cancels the token and its children. Returns true only for the call
    /// that flipped it
    pub fn cancel(&self) -> bool {
        let children = {
            let mut state = self.state();

            if state.cancelled {
                return false;
            }

            state.cancelled = true;
            self.inner.cancelled.notify_all();

            mem::take(&mut state.children)
        };

        for child in children {
            child.cancel();
        }

        true
    }

    /// Returns true once the token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.state().cancelled
    }

    /// Blocks until the token is cancelled or `timeout` elapses. Returns true
    /// if the token was cancelled
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.state();

        let (state, _) = self
            .inner
            .cancelled
            .wait_timeout_while(guard, timeout, |state| !state.cancelled)
            .unwrap_or_else(PoisonError::into_inner);

        state.cancelled
    }

    /// Blocks until the token is cancelled
    pub fn wait(&self) {
        let guard = self.state();

        let _state = self
            .inner
            .cancelled
            .wait_while(guard, |state| !state.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

#[cfg(test)]
#[path = "./cancel_tests.rs"]
mod tests;
