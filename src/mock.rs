//! Deterministic navigation stack for tests.
//!
//! [`MockNavigation`] keeps the same stack-of-layers shape as
//! [`NavigationController`](crate::controller::NavigationController) and
//! honors the same ordering and teardown rules, but applies every operation
//! synchronously and renders nothing. Flows written against it hold for the
//! animated controller too.
//!
//! # Example
//!
//! ```
//! use gpui_stack_navigator::{MockNavigation, PageRequest};
//!
//! let nav = MockNavigation::new();
//! nav.set_root_page(PageRequest::new("/home"));
//!
//! let root = nav.root_navigator().unwrap();
//! root.push(PageRequest::new("/details")).unwrap();
//! assert_eq!(nav.current_stack().len(), 2);
//!
//! nav.current_page().unwrap().navigator().pop().unwrap();
//! assert_eq!(nav.current_component().unwrap().as_str(), "/home");
//! ```

use crate::error::{NavigationError, Result};
use crate::navigator::{NavigationBackend, Navigator, NavigatorSlot};
use crate::page::{ComponentPath, PageContext, PageKey, PageRequest, ViewModel};
use crate::{debug_log, info_log, trace_log};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A page held by [`MockNavigation`].
#[derive(Clone)]
pub struct MockPage {
    pub key: PageKey,
    pub component: ComponentPath,
    pub view_model: Option<ViewModel>,
    pub context: PageContext,
    pub title: Option<String>,
    pub is_modal: bool,
    pub is_transparent: bool,
}

impl MockPage {
    /// The navigator injected into this page.
    pub fn navigator(&self) -> &Navigator {
        self.context.navigator()
    }
}

impl fmt::Debug for MockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPage")
            .field("key", &self.key)
            .field("component", &self.component)
            .field("title", &self.title)
            .field("is_modal", &self.is_modal)
            .finish_non_exhaustive()
    }
}

/// Synchronous, render-free navigation stack.
pub struct MockNavigation {
    weak_self: Weak<Self>,
    stacks: RefCell<Vec<Vec<MockPage>>>,
    destroyed: RefCell<Vec<PageKey>>,
}

impl MockNavigation {
    /// Create an empty stack. Call [`set_root_page`](Self::set_root_page) next.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            stacks: RefCell::new(vec![Vec::new()]),
            destroyed: RefCell::new(Vec::new()),
        })
    }

    /// Replace everything with a single root page.
    pub fn set_root_page(&self, request: PageRequest) -> Navigator {
        self.clear();
        let navigator = self.create_navigator();
        let page = Self::make_page(request, navigator.clone());
        info_log!("Mock: root page {} ('{}')", page.key, page.component);
        if let Some(root) = self.stacks.borrow_mut().first_mut() {
            root.push(page);
        }
        navigator
    }

    /// Navigator of the absolute root page.
    pub fn root_navigator(&self) -> Result<Navigator> {
        self.stacks
            .borrow()
            .first()
            .and_then(|layer| layer.first())
            .map(|page| page.navigator().clone())
            .ok_or(NavigationError::NoRootPage)
    }

    /// Create the navigator for the next page pushed onto the top layer.
    ///
    /// The slot is captured now, before the page exists.
    pub fn create_navigator(&self) -> Navigator {
        let (layer, index) = {
            let stacks = self.stacks.borrow();
            let layer = stacks.len() - 1;
            (layer, stacks[layer].len())
        };
        self.navigator_at(layer, index)
    }

    fn navigator_at(&self, layer: usize, index: usize) -> Navigator {
        let backend: Weak<dyn NavigationBackend> = self.weak_self.clone();
        Navigator::new(
            backend,
            NavigatorSlot {
                key: PageKey::next(),
                layer,
                index,
            },
            false,
        )
    }

    fn make_page(request: PageRequest, navigator: Navigator) -> MockPage {
        MockPage {
            key: navigator.key(),
            component: request.component,
            view_model: request.view_model,
            context: PageContext::new(navigator, request.context),
            title: request.title,
            is_modal: request.is_modal,
            is_transparent: request.is_transparent,
        }
    }

    /// Pages of the top layer, bottom first.
    pub fn current_stack(&self) -> Vec<MockPage> {
        self.stacks.borrow().last().cloned().unwrap_or_default()
    }

    /// Every layer, root layer first.
    pub fn stacks(&self) -> Vec<Vec<MockPage>> {
        self.stacks.borrow().clone()
    }

    /// Top page of the top layer.
    pub fn current_page(&self) -> Option<MockPage> {
        self.stacks
            .borrow()
            .last()
            .and_then(|layer| layer.last())
            .cloned()
    }

    /// Descriptor of the current page.
    ///
    /// Fails with [`NavigationError::NoRootPage`] before a root page is set.
    pub fn current_component(&self) -> Result<ComponentPath> {
        self.current_page()
            .map(|page| page.component)
            .ok_or(NavigationError::NoRootPage)
    }

    /// Destroy `key`'s page and everything above it in its layer.
    ///
    /// The root page of the root layer cannot be destroyed. Destroying the
    /// bottom page of a presented layer closes that layer. Unknown keys are
    /// ignored.
    pub fn destroy_page(&self, key: PageKey) -> Result<()> {
        let removed = {
            let mut stacks = self.stacks.borrow_mut();
            let Some((layer, index)) = stacks.iter().enumerate().find_map(|(layer, pages)| {
                pages
                    .iter()
                    .position(|page| page.key == key)
                    .map(|index| (layer, index))
            }) else {
                return Ok(());
            };
            if layer == 0 && index == 0 {
                return Err(NavigationError::RootPageRemoval { key });
            }
            let mut removed: Vec<MockPage> = stacks[layer].drain(index..).collect();
            // Layers above a destroyed page go with it, as does an emptied layer.
            removed.extend(stacks.drain(layer + 1..).flatten());
            if stacks[layer].is_empty() {
                stacks.truncate(layer);
            }
            removed
        };
        self.teardown(removed);
        Ok(())
    }

    /// Tear everything down, root page included.
    pub fn clear(&self) {
        let removed: Vec<MockPage> = {
            let mut stacks = self.stacks.borrow_mut();
            std::mem::replace(&mut *stacks, vec![Vec::new()])
                .into_iter()
                .flatten()
                .collect()
        };
        self.teardown(removed);
    }

    /// Keys of torn-down pages, in teardown order.
    pub fn destroyed_pages(&self) -> Vec<PageKey> {
        self.destroyed.borrow().clone()
    }

    /// Tear down pages given bottom first, so the topmost goes first.
    fn teardown(&self, removed: Vec<MockPage>) {
        let mut destroyed = self.destroyed.borrow_mut();
        for page in removed.into_iter().rev() {
            trace_log!("Mock: tore down {} ('{}')", page.key, page.component);
            destroyed.push(page.key);
        }
    }

    /// Remove the top layer's pages from `from` upward.
    fn truncate_top_layer(&self, from: Option<usize>) {
        let removed: Vec<MockPage> = {
            let mut stacks = self.stacks.borrow_mut();
            let Some(layer) = stacks.last_mut() else {
                return;
            };
            match from {
                Some(from) if from > 0 && from < layer.len() => layer.drain(from..).collect(),
                _ => Vec::new(),
            }
        };
        if removed.is_empty() {
            debug_log!("Mock: pop ignored, nothing to remove");
            return;
        }
        info_log!("Mock: popped {} page(s)", removed.len());
        self.teardown(removed);
    }

    /// Current index of the slot's page in the top layer, if it is still there.
    fn position(&self, slot: NavigatorSlot) -> Option<usize> {
        let stacks = self.stacks.borrow();
        if slot.layer + 1 != stacks.len() {
            return None;
        }
        let layer = stacks.last()?;
        match layer.get(slot.index) {
            Some(page) if page.key == slot.key => Some(slot.index),
            _ => None,
        }
    }
}

impl NavigationBackend for MockNavigation {
    fn backend_name(&self) -> &'static str {
        "MockNavigation"
    }

    fn push(&self, request: PageRequest, _animated: bool) -> Result<()> {
        let navigator = self.create_navigator();
        let page = Self::make_page(request, navigator);
        info_log!("Mock: pushed {} ('{}')", page.key, page.component);
        if let Some(layer) = self.stacks.borrow_mut().last_mut() {
            layer.push(page);
        }
        Ok(())
    }

    fn pop_to_navigator(&self, slot: NavigatorSlot, _animated: bool) -> Result<()> {
        self.truncate_top_layer(self.position(slot));
        Ok(())
    }

    fn pop_to_root(&self, _animated: bool) -> Result<()> {
        self.truncate_top_layer(Some(1));
        Ok(())
    }

    fn pop_to_self(&self, slot: NavigatorSlot, _animated: bool) -> Result<()> {
        self.truncate_top_layer(self.position(slot).map(|index| index + 1));
        Ok(())
    }

    fn present(&self, mut request: PageRequest, _animated: bool) -> Result<()> {
        request.is_modal = true;
        let layer = self.stacks.borrow().len();
        let page = Self::make_page(request, self.navigator_at(layer, 0));
        info_log!("Mock: presented {} ('{}')", page.key, page.component);
        self.stacks.borrow_mut().push(vec![page]);
        Ok(())
    }

    fn dismiss(&self, _animated: bool) -> Result<()> {
        let removed = {
            let mut stacks = self.stacks.borrow_mut();
            if stacks.len() <= 1 {
                None
            } else {
                stacks.pop()
            }
        };
        match removed {
            Some(layer) => {
                info_log!("Mock: dismissed a layer of {} page(s)", layer.len());
                self.teardown(layer);
            }
            None => {
                debug_log!("Mock: dismiss ignored, only the root layer is left");
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MockNavigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape: Vec<usize> = self.stacks.borrow().iter().map(Vec::len).collect();
        f.debug_struct("MockNavigation")
            .field("layers", &shape)
            .finish()
    }
}
