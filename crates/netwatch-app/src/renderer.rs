//! Live-replaceable rendering function
//!
//! [`Renderer`] holds the one current `State -> O` function. Replacing it is a
//! single pointer swap inside a `watch` channel, and every live
//! [`Subscription`] is woken so the streaming loop can re-render with the new
//! function. Several replacements in quick succession may wake a subscriber
//! only once; it then sees the latest function.

use std::fmt;
use std::sync::Arc;

use netwatch_core::prelude::*;
use netwatch_core::State;
use tokio::sync::watch;

/// Shared rendering function
pub type RenderFn<O> = Arc<dyn Fn(State) -> O + Send + Sync>;

/// Concurrency-safe slot holding the current rendering function.
///
/// Clones share the same slot, so any clone may call [`Renderer::set`] from
/// any task or thread.
pub struct Renderer<O> {
    slot: Arc<watch::Sender<RenderFn<O>>>,
}

impl<O> Clone for Renderer<O> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<O> fmt::Debug for Renderer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Bootstrap renderer: the raw textual form of the state.
impl<O: From<String> + 'static> Default for Renderer<O> {
    fn default() -> Self {
        Self::new(|state: State| O::from(state.to_string()))
    }
}

impl<O: 'static> Renderer<O> {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(State) -> O + Send + Sync + 'static,
    {
        let (slot, _) = watch::channel(Arc::new(render) as RenderFn<O>);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Replace the current function and wake every subscriber.
    pub fn set<F>(&self, render: F)
    where
        F: Fn(State) -> O + Send + Sync + 'static,
    {
        self.set_shared(Arc::new(render));
    }

    /// Replace the current function with an already shared one.
    pub fn set_shared(&self, render: RenderFn<O>) {
        // send_replace stores the value even when nobody is subscribed
        let _previous = self.slot.send_replace(render);
        trace!(
            "Renderer replaced ({} subscriber(s))",
            self.slot.receiver_count()
        );
    }
}

impl<O> Renderer<O> {
    /// Current function; never waits on a writer beyond the pointer swap.
    pub fn get(&self) -> RenderFn<O> {
        Arc::clone(&self.slot.borrow())
    }

    /// Render a state with the current function
    pub fn render(&self, state: State) -> O {
        let render = self.get();
        render(state)
    }

    /// Register a watcher for replacements.
    ///
    /// Only replacements made after this call wake the subscription. The
    /// registration is released when the returned handle is dropped.
    pub fn subscribe(&self) -> Subscription<O> {
        Subscription {
            rx: self.slot.subscribe(),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.slot.receiver_count()
    }
}

/// Registration for renderer replacement notifications.
///
/// Dropping it unregisters the watcher.
pub struct Subscription<O> {
    rx: watch::Receiver<RenderFn<O>>,
}

impl<O> Subscription<O> {
    /// Wait until the renderer has been replaced since the last
    /// [`Subscription::current`] call.
    ///
    /// Returns `false` once every [`Renderer`] handle is gone; no further
    /// replacement can happen then. Cancel safe.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Latest function, marking the replacement as seen
    pub fn current(&mut self) -> RenderFn<O> {
        Arc::clone(&self.rx.borrow_and_update())
    }

    /// Whether a replacement has happened that [`Subscription::current`] has not seen
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}

impl<O> Drop for Subscription<O> {
    fn drop(&mut self) {
        trace!("Renderer subscription released");
    }
}

impl<O> fmt::Debug for Subscription<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("has_changed", &self.has_changed())
            .finish()
    }
}
