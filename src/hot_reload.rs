//! Hot-reload notifications.
//!
//! Developer tooling tells the navigation stack that a component's source
//! changed. The stack subscribes once per page through a
//! [`HotReloadSource`] and disposes the [`Subscription`] when the page is
//! torn down.
//!
//! [`HotReloadHub`] is an in-process source: tooling calls
//! [`notify`](HotReloadHub::notify) with the descriptor that changed.
//!
//! ```
//! use gpui_stack_navigator::hot_reload::{HotReloadHub, HotReloadSource};
//! use gpui_stack_navigator::ComponentPath;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let hub = HotReloadHub::new();
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! let subscription = hub.subscribe(&ComponentPath::new("/home"), Rc::new(move || h.set(h.get() + 1)));
//!
//! assert_eq!(hub.notify(&ComponentPath::new("/home")), 1);
//! drop(subscription);
//! assert_eq!(hub.notify(&ComponentPath::new("/home")), 0);
//! assert_eq!(hits.get(), 1);
//! ```

use crate::page::ComponentPath;
use crate::{debug_log, trace_log};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked when a subscribed component changes.
pub type ReloadCallback = Rc<dyn Fn()>;

/// Source of "this component changed" notifications.
pub trait HotReloadSource {
    /// Call `on_change` whenever `path` changes, until the subscription is disposed.
    fn subscribe(&self, path: &ComponentPath, on_change: ReloadCallback) -> Subscription;
}

/// Live registration with a [`HotReloadSource`]. Disposed on drop.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `dispose` once.
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { dispose: None }
    }

    /// Release the registration now.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.dispose.is_some())
            .finish()
    }
}

#[derive(Default)]
struct HubState {
    next_id: Cell<u64>,
    subscribers: RefCell<HashMap<ComponentPath, Vec<(u64, ReloadCallback)>>>,
}

/// In-process hot-reload notifier.
#[derive(Clone, Default)]
pub struct HotReloadHub {
    state: Rc<HubState>,
}

impl HotReloadHub {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify subscribers of `path`. Returns how many were called.
    pub fn notify(&self, path: &ComponentPath) -> usize {
        // Callbacks may subscribe or dispose, so call them on a copy.
        let callbacks: Vec<ReloadCallback> = self
            .state
            .subscribers
            .borrow()
            .get(path)
            .map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        debug_log!(
            "Hot reload: '{}' changed ({} subscribers)",
            path,
            callbacks.len()
        );
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Number of live subscriptions for `path`.
    pub fn subscriber_count(&self, path: &ComponentPath) -> usize {
        self.state
            .subscribers
            .borrow()
            .get(path)
            .map_or(0, Vec::len)
    }
}

impl HotReloadSource for HotReloadHub {
    fn subscribe(&self, path: &ComponentPath, on_change: ReloadCallback) -> Subscription {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state
            .subscribers
            .borrow_mut()
            .entry(path.clone())
            .or_default()
            .push((id, on_change));
        trace_log!("Hot reload: subscription {} for '{}'", id, path);

        let state: Weak<HubState> = Rc::downgrade(&self.state);
        let path = path.clone();
        Subscription::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            let mut subscribers = state.subscribers.borrow_mut();
            if let Some(subs) = subscribers.get_mut(&path) {
                subs.retain(|(sub_id, _)| *sub_id != id);
                if subs.is_empty() {
                    subscribers.remove(&path);
                }
            }
        })
    }
}

impl fmt::Debug for HotReloadHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotReloadHub")
            .field("paths", &self.state.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_only_matching_path() {
        let hub = HotReloadHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = hub.subscribe(
            &ComponentPath::new("/a"),
            Rc::new(move || h.set(h.get() + 1)),
        );

        assert_eq!(hub.notify(&ComponentPath::new("/b")), 0);
        assert_eq!(hub.notify(&ComponentPath::new("/a")), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_dispose_removes_subscriber() {
        let hub = HotReloadHub::new();
        let path = ComponentPath::new("/a");
        let first = hub.subscribe(&path, Rc::new(|| {}));
        let _second = hub.subscribe(&path, Rc::new(|| {}));
        assert_eq!(hub.subscriber_count(&path), 2);

        first.dispose();
        assert_eq!(hub.subscriber_count(&path), 1);
    }

    #[test]
    fn test_detached_subscription() {
        let sub = Subscription::detached();
        sub.dispose();
    }

    #[test]
    fn test_dispose_runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        sub.dispose();
        assert_eq!(count.get(), 1);
    }
}
