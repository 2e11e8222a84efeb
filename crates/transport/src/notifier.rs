//! This module contains the [Notifier] struct.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::task::Context;
use std::task::Poll;

struct NotifierState<T> {
    /// The value the notifier settled with, if any.
    value: Option<T>,

    /// The wakers associated with State.
    wakers: Vec<std::task::Waker>,
}

impl<T> Default for NotifierState<T> {
    fn default() -> Self {
        Self {
            value: None,
            wakers: Vec::new(),
        }
    }
}

/// A one-shot settlement cell. `settle` stores a value exactly once and wakes
/// every awaiter; later calls are ignored. Awaiting any clone yields a copy of
/// the settled value, no matter whether it was settled before or after the
/// await started.
pub struct Notifier<T>(Arc<Mutex<NotifierState<T>>>);

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(NotifierState::default())))
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone> Notifier<T> {
    /// Settle the notifier with `value` and wake all awaiters.
    /// Returns false if it was already settled, in which case `value` is
    /// discarded.
    pub fn settle(&self, value: T) -> bool {
        let mut state = self.0.lock().unwrap();
        if state.value.is_some() {
            return false;
        }
        state.value = Some(value);
        for waker in state.wakers.drain(..) {
            waker.wake();
        }
        true
    }

    /// Whether the notifier has been settled.
    pub fn is_settled(&self) -> bool {
        self.0.lock().unwrap().value.is_some()
    }
}

impl<T: Clone> Future for Notifier<T> {
    type Output = T;
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.0.lock().unwrap();

        if let Some(value) = state.value.as_ref() {
            return Poll::Ready(value.clone());
        }

        state.wakers.push(cx.waker().clone());
        Poll::Pending
    }
}
