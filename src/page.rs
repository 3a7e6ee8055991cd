//! Page entries and the values that describe them.
//!
//! A page is requested with a [`PageRequest`] (component descriptor,
//! view-model, caller context, presentation flags). When a backend accepts
//! the request it reserves a fresh [`PageKey`], creates the page's
//! [`Navigator`], wraps both into the page's [`PageContext`] and only then
//! builds the [`PageEntry`].
//!
//! Keys come from one process-wide counter, so they are unique and strictly
//! increasing in creation order for every stack in the process.

use crate::component::{ComponentParams, ComponentResolver, ResolvedComponent};
use crate::error::Result;
use crate::host::PageHandle;
use crate::hot_reload::Subscription;
use crate::navigator::Navigator;
use crate::transition::PageTransform;
use std::any::Any;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Opaque view-model handed to a page's component.
pub type ViewModel = Rc<dyn Any>;

/// Opaque caller data carried in a page's context.
pub type ContextData = Rc<dyn Any>;

static NEXT_PAGE_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of one page entry. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey(u64);

impl PageKey {
    /// Reserve the next key.
    pub fn next() -> Self {
        Self(NEXT_PAGE_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value. Intended for tests and diagnostics.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw key value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Descriptor naming a page component, e.g. `/settings/privacy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentPath(String);

impl ComponentPath {
    /// Create a descriptor.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The descriptor as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ComponentPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<&ComponentPath> for ComponentPath {
    fn from(path: &ComponentPath) -> Self {
        path.clone()
    }
}

/// A component reference resolved on first use and cached afterwards.
pub struct ComponentSource<C> {
    path: ComponentPath,
    resolved: OnceCell<ResolvedComponent<C>>,
}

impl<C> ComponentSource<C> {
    /// Create an unresolved source.
    pub fn new(path: ComponentPath) -> Self {
        Self {
            path,
            resolved: OnceCell::new(),
        }
    }

    /// The descriptor this source resolves.
    pub fn path(&self) -> &ComponentPath {
        &self.path
    }

    /// Check if the component has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Resolve through `resolver` unless already resolved.
    pub fn resolve(&self, resolver: &dyn ComponentResolver<C>) -> Result<&ResolvedComponent<C>> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let resolved = resolver.resolve(&self.path)?;
        Ok(self.resolved.get_or_init(|| resolved))
    }
}

impl<C> fmt::Debug for ComponentSource<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSource")
            .field("path", &self.path)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Everything needed to create a page.
///
/// # Example
///
/// ```
/// use gpui_stack_navigator::PageRequest;
///
/// let request = PageRequest::new("/settings")
///     .title("Settings")
///     .transparent(true);
/// assert_eq!(request.component.as_str(), "/settings");
/// assert!(request.is_transparent);
/// assert!(!request.is_modal);
/// ```
#[derive(Clone)]
pub struct PageRequest {
    /// Component descriptor
    pub component: ComponentPath,
    /// View-model passed to the component
    pub view_model: Option<ViewModel>,
    /// Caller data merged into the page context
    pub context: Option<ContextData>,
    /// Display title
    pub title: Option<String>,
    /// Whether the page slides in vertically as a modal
    pub is_modal: bool,
    /// Whether pages beneath stay visible
    pub is_transparent: bool,
}

impl PageRequest {
    /// Create a request for the given component.
    pub fn new(component: impl Into<ComponentPath>) -> Self {
        Self {
            component: component.into(),
            view_model: None,
            context: None,
            title: None,
            is_modal: false,
            is_transparent: false,
        }
    }

    /// Attach a view-model.
    pub fn view_model<T: Any>(mut self, view_model: T) -> Self {
        self.view_model = Some(Rc::new(view_model));
        self
    }

    /// Attach caller context data.
    pub fn context<T: Any>(mut self, data: T) -> Self {
        self.context = Some(Rc::new(data));
        self
    }

    /// Set the display title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark the page as modal.
    pub fn modal(mut self, is_modal: bool) -> Self {
        self.is_modal = is_modal;
        self
    }

    /// Mark the page as transparent.
    pub fn transparent(mut self, is_transparent: bool) -> Self {
        self.is_transparent = is_transparent;
        self
    }
}

impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("component", &self.component)
            .field("title", &self.title)
            .field("is_modal", &self.is_modal)
            .field("is_transparent", &self.is_transparent)
            .finish_non_exhaustive()
    }
}

/// Context handed to a page's component: its own navigator plus caller data.
#[derive(Clone)]
pub struct PageContext {
    navigator: Navigator,
    data: Option<ContextData>,
}

impl PageContext {
    /// Combine a navigator with caller data.
    pub fn new(navigator: Navigator, data: Option<ContextData>) -> Self {
        Self { navigator, data }
    }

    /// The navigator owned by this page.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Raw caller data.
    pub fn data(&self) -> Option<&ContextData> {
        self.data.as_ref()
    }

    /// Caller data downcast to `T`.
    pub fn data_as<T: Any>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("navigator", &self.navigator)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

/// One slot in a navigation stack.
///
/// Owned exclusively by the controller. Only the title, the transform and
/// the navigator hook settings change after creation.
pub(crate) struct PageEntry<C> {
    pub(crate) key: PageKey,
    pub(crate) component: ComponentSource<C>,
    pub(crate) params: ComponentParams,
    pub(crate) view_model: Option<ViewModel>,
    pub(crate) context: PageContext,
    pub(crate) title: Option<String>,
    pub(crate) is_modal: bool,
    pub(crate) is_transparent: bool,
    pub(crate) handle: PageHandle,
    pub(crate) transform: PageTransform,
    pub(crate) hot_reload: Option<Subscription>,
    pub(crate) dismiss_gesture_disabled: bool,
    pub(crate) auto_pop_delay: Option<Duration>,
}

impl<C> PageEntry<C> {
    /// The request that would recreate this page.
    pub(crate) fn to_request(&self) -> PageRequest {
        PageRequest {
            component: self.component.path().clone(),
            view_model: self.view_model.clone(),
            context: self.context.data().cloned(),
            title: self.title.clone(),
            is_modal: self.is_modal,
            is_transparent: self.is_transparent,
        }
    }

    pub(crate) fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            key: self.key,
            component: self.component.path().clone(),
            params: self.params.clone(),
            title: self.title.clone(),
            is_modal: self.is_modal,
            is_transparent: self.is_transparent,
            handle: self.handle,
            transform: self.transform,
            navigator: self.context.navigator().clone(),
            dismiss_gesture_disabled: self.dismiss_gesture_disabled,
            auto_pop_delay: self.auto_pop_delay,
        }
    }
}

/// Read-only copy of a page entry.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub key: PageKey,
    pub component: ComponentPath,
    pub params: ComponentParams,
    pub title: Option<String>,
    pub is_modal: bool,
    pub is_transparent: bool,
    pub handle: PageHandle,
    pub transform: PageTransform,
    pub navigator: Navigator,
    pub dismiss_gesture_disabled: bool,
    pub auto_pop_delay: Option<Duration>,
}
