//! Per-page navigator handles.
//!
//! Every page gets its own [`Navigator`], created by the stack before the
//! page itself and injected into the page's
//! [`PageContext`](crate::page::PageContext). It is the only navigation
//! capability page code holds.
//!
//! A navigator is a thin forwarding façade: it keeps a weak back-reference
//! to the [`NavigationBackend`] that created it and the [`NavigatorSlot`]
//! reserved for its page, and forwards every call. The backend decides what
//! the call means; the production
//! [`NavigationController`](crate::controller::NavigationController) queues
//! it, [`MockNavigation`](crate::mock::MockNavigation) applies it on the spot.
//!
//! # Example
//!
//! ```ignore
//! fn on_row_clicked(navigator: &Navigator) -> Result<()> {
//!     navigator.push(PageRequest::new("/details/42").title("Details"))
//! }
//!
//! fn on_close_clicked(navigator: &Navigator) -> Result<()> {
//!     navigator.without_animation().pop()
//! }
//! ```

use crate::error::{NavigationError, Result};
use crate::lifecycle::NavigationAction;
use crate::page::{PageKey, PageRequest};
use crate::warn_log;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Position reserved for a page when its navigator was created.
///
/// `layer` and `index` are where the page was about to be inserted; `key`
/// is the identity it was about to receive. Backends that track pages by
/// identity use `key`, index-based backends use `layer`/`index` and check
/// `key` to reject stale handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigatorSlot {
    pub key: PageKey,
    pub layer: usize,
    pub index: usize,
}

// ============================================================================
// NavigationBackend
// ============================================================================

/// A stack implementation navigators forward to.
///
/// `push` and `pop_to_navigator` are required. Backends without support
/// for an operation keep the default, which fails with
/// [`NavigationError::NotImplemented`] so integration mistakes surface
/// immediately. The two hook methods default to doing nothing.
pub trait NavigationBackend {
    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Append a page to the top layer.
    fn push(&self, request: PageRequest, animated: bool) -> Result<()>;

    /// Remove the slot's page and everything above it.
    ///
    /// Unknown slots and slots at the bottom of their layer are no-ops.
    fn pop_to_navigator(&self, slot: NavigatorSlot, animated: bool) -> Result<()>;

    /// Remove everything above the bottom page of the top layer.
    fn pop_to_root(&self, _animated: bool) -> Result<()> {
        Err(NavigationError::not_implemented(
            "pop_to_root",
            self.backend_name(),
        ))
    }

    /// Remove everything above the slot's page.
    fn pop_to_self(&self, _slot: NavigatorSlot, _animated: bool) -> Result<()> {
        Err(NavigationError::not_implemented(
            "pop_to_self",
            self.backend_name(),
        ))
    }

    /// Open a new layer holding one page.
    fn present(&self, _request: PageRequest, _animated: bool) -> Result<()> {
        Err(NavigationError::not_implemented(
            "present",
            self.backend_name(),
        ))
    }

    /// Close the top layer.
    fn dismiss(&self, _animated: bool) -> Result<()> {
        Err(NavigationError::not_implemented(
            "dismiss",
            self.backend_name(),
        ))
    }

    /// Disable (or re-enable) interactive dismissal for the slot's page.
    fn set_dismiss_gesture_disabled(&self, _slot: NavigatorSlot, _disabled: bool) {}

    /// Wait `delay` before the slot's page pops itself.
    fn set_auto_pop_delay(&self, _slot: NavigatorSlot, _delay: Option<Duration>) {}
}

// ============================================================================
// Navigator
// ============================================================================

/// Navigation capability bound to one page.
#[derive(Clone)]
pub struct Navigator {
    backend: Weak<dyn NavigationBackend>,
    slot: NavigatorSlot,
    animated: bool,
}

impl Navigator {
    /// Create a navigator for `slot`.
    pub fn new(backend: Weak<dyn NavigationBackend>, slot: NavigatorSlot, animated: bool) -> Self {
        Self {
            backend,
            slot,
            animated,
        }
    }

    /// Slot reserved for this navigator's page.
    pub fn slot(&self) -> NavigatorSlot {
        self.slot
    }

    /// Key of this navigator's page.
    pub fn key(&self) -> PageKey {
        self.slot.key
    }

    /// Check if the backend is still alive.
    pub fn is_attached(&self) -> bool {
        self.backend.strong_count() > 0
    }

    /// Whether operations through this navigator animate.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// A copy of this navigator with animation turned on or off.
    pub fn with_animation(&self, animated: bool) -> Self {
        Self {
            animated,
            ..self.clone()
        }
    }

    /// A copy of this navigator that never animates.
    pub fn without_animation(&self) -> Self {
        self.with_animation(false)
    }

    fn backend(&self) -> Result<Rc<dyn NavigationBackend>> {
        self.backend.upgrade().ok_or(NavigationError::BackendReleased)
    }

    /// Push a page on top of the current layer.
    pub fn push(&self, request: PageRequest) -> Result<()> {
        self.backend()?.push(request, self.animated)
    }

    /// Pop this navigator's page (and anything above it).
    pub fn pop(&self) -> Result<()> {
        self.backend()?.pop_to_navigator(self.slot, self.animated)
    }

    /// Pop back to the bottom page of the current layer.
    pub fn pop_to_root(&self) -> Result<()> {
        self.backend()?.pop_to_root(self.animated)
    }

    /// Pop every page above this navigator's page.
    pub fn pop_to_self(&self) -> Result<()> {
        self.backend()?.pop_to_self(self.slot, self.animated)
    }

    /// Present a page in a new layer.
    pub fn present(&self, request: PageRequest) -> Result<()> {
        self.backend()?.present(request, self.animated)
    }

    /// Dismiss the top layer.
    pub fn dismiss(&self, animated: bool) -> Result<()> {
        self.backend()?.dismiss(animated)
    }

    /// Disable interactive dismissal of this page. Never fails.
    pub fn force_disable_dismissal_gesture(&self, disabled: bool) {
        match self.backend.upgrade() {
            Some(backend) => backend.set_dismiss_gesture_disabled(self.slot, disabled),
            None => {
                warn_log!("Gesture hook on detached navigator {}", self.slot.key);
            }
        }
    }

    /// Delay the next self-pop of this page. Never fails.
    pub fn set_auto_pop_delay(&self, delay: Option<Duration>) {
        match self.backend.upgrade() {
            Some(backend) => backend.set_auto_pop_delay(self.slot, delay),
            None => {
                warn_log!("Pop delay hook on detached navigator {}", self.slot.key);
            }
        }
    }

    /// Dispatch a [`NavigationAction`].
    pub fn perform(&self, action: NavigationAction) -> Result<()> {
        match action {
            NavigationAction::Push(request) => self.push(request),
            NavigationAction::Pop => self.pop(),
            NavigationAction::PopToRoot => self.pop_to_root(),
            NavigationAction::PopToSelf => self.pop_to_self(),
            NavigationAction::Present(request) => self.present(request),
            NavigationAction::Dismiss => self.dismiss(self.animated),
        }
    }
}

impl PartialEq for Navigator {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && Weak::ptr_eq(&self.backend, &other.backend)
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("slot", &self.slot)
            .field("animated", &self.animated)
            .field("attached", &self.is_attached())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
