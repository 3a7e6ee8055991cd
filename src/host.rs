//! Render collaborator interface.
//!
//! The controller never draws anything itself. It asks a [`RenderHost`] to
//! create and destroy opaque page containers, writes transforms to them in
//! batched [`Transaction`]s, and awaits the host's animation of a
//! transaction over a [`TransitionTiming`].

use crate::component::ComponentParams;
use crate::page::{ComponentPath, PageContext, PageKey, ViewModel};
use crate::transition::{PageTransform, TransitionTiming, Viewport};
use futures::future::LocalBoxFuture;
use std::fmt;

/// Opaque handle to a page container owned by a [`RenderHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageHandle(u64);

impl PageHandle {
    /// Wrap a host-assigned id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-assigned id.
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Everything a host needs to build a page container.
#[derive(Clone)]
pub struct PageMount<C> {
    pub key: PageKey,
    pub path: ComponentPath,
    pub component: C,
    pub params: ComponentParams,
    pub view_model: Option<ViewModel>,
    pub context: PageContext,
    pub title: Option<String>,
    /// Transform to apply before the page is first shown.
    pub initial_transform: PageTransform,
}

impl<C> fmt::Debug for PageMount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageMount")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("title", &self.title)
            .field("initial_transform", &self.initial_transform)
            .finish_non_exhaustive()
    }
}

/// A batch of transform writes applied as one visual update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    updates: Vec<(PageHandle, PageTransform)>,
}

impl Transaction {
    /// Create an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a write. A later write to the same page replaces an earlier one.
    pub fn set(mut self, page: PageHandle, transform: PageTransform) -> Self {
        self.insert(page, transform);
        self
    }

    /// Add a write in place.
    pub fn insert(&mut self, page: PageHandle, transform: PageTransform) {
        if let Some(existing) = self.updates.iter_mut().find(|(p, _)| *p == page) {
            existing.1 = transform;
        } else {
            self.updates.push((page, transform));
        }
    }

    /// Target transform for `page`, if the transaction touches it.
    pub fn get(&self, page: PageHandle) -> Option<PageTransform> {
        self.updates
            .iter()
            .find(|(p, _)| *p == page)
            .map(|(_, transform)| *transform)
    }

    /// Iterate over the writes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(PageHandle, PageTransform)> {
        self.updates.iter()
    }

    /// Number of pages touched.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Check if the transaction touches no page.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// The visual engine pages are rendered by.
///
/// All methods are called on the UI thread from within a queued unit, so
/// implementations may use interior mutability freely.
pub trait RenderHost: 'static {
    /// Resolved component type this host knows how to instantiate.
    type Component: Clone + 'static;

    /// Current size of the page container.
    fn viewport(&self) -> Viewport;

    /// Create a page container.
    fn create_page(&self, mount: PageMount<Self::Component>) -> PageHandle;

    /// Destroy a page container and release anything it holds.
    fn destroy_page(&self, page: PageHandle);

    /// Apply all writes in one visual update, without animation.
    fn apply(&self, transaction: &Transaction);

    /// Animate from the current transforms to the transaction's targets.
    ///
    /// The returned future resolves once the animation finished and the
    /// targets are in place. An empty transaction is a plain wait.
    fn animate(
        &self,
        transaction: Transaction,
        timing: TransitionTiming,
    ) -> LocalBoxFuture<'static, ()>;

    /// Set the z-order of all live pages, bottom first.
    fn restack(&self, _order: &[PageHandle]) {}

    /// Route user interaction to `page` only.
    fn set_active_page(&self, _page: Option<PageHandle>) {}
}
