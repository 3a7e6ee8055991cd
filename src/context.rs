//! Global navigation state for GPUI apps.
//!
//! [`init_navigation`] wires a [`NavigationController`] to a [`GpuiHost`],
//! runs its queued units on the foreground executor, subscribes pages to an
//! in-process [`HotReloadHub`] and stores all of it as the
//! [`GlobalNavigation`] global.
//!
//! ```ignore
//! use gpui_stack_navigator::*;
//!
//! let mut registry = ComponentRegistry::new();
//! registry
//!     .register("/", page_builder(|_, _, _| div().child("Home").into_any_element()))
//!     .register("/users/{id}", page_builder(|props, _, _| {
//!         div().child(format!("User {}", props.params.get("id").unwrap_or("?")))
//!             .into_any_element()
//!     }));
//!
//! init_navigation(cx, NavigationConfig::new(), registry, PageRequest::new("/"));
//! let view = navigation_view(cx);
//! ```

use crate::component::ComponentRegistry;
use crate::config::NavigationConfig;
use crate::controller::NavigationController;
use crate::error::{NavigationError, Result};
use crate::hot_reload::HotReloadHub;
use crate::lifecycle::NavigationAction;
use crate::navigator::Navigator;
use crate::page::PageRequest;
use crate::surface::{GpuiHost, GpuiSpawner, NavigationStackView, PageBuilder};
use crate::info_log;
use gpui::*;
use std::rc::Rc;

/// Navigation state shared by the whole app.
pub struct GlobalNavigation {
    controller: Rc<NavigationController<GpuiHost>>,
    hot_reload: HotReloadHub,
}

impl GlobalNavigation {
    pub fn controller(&self) -> &Rc<NavigationController<GpuiHost>> {
        &self.controller
    }

    /// Navigator of the root page, once it has been mounted.
    pub fn root_navigator(&self) -> Option<Navigator> {
        self.controller.root_navigator()
    }

    /// Navigator of the page currently receiving interaction.
    pub fn current_navigator(&self) -> Option<Navigator> {
        self.controller.current_page().map(|page| page.navigator)
    }

    /// Notifier pages are subscribed to for hot reload.
    pub fn hot_reload(&self) -> &HotReloadHub {
        &self.hot_reload
    }

    /// A view drawing the stack.
    pub fn stack_view(&self) -> NavigationStackView {
        self.controller.host().view()
    }
}

impl Global for GlobalNavigation {}

/// Trait for accessing the global navigation state from context.
pub trait UseNavigation {
    /// Get the global navigation state.
    ///
    /// # Panics
    ///
    /// Panics if [`init_navigation`] has not been called.
    fn navigation(&self) -> &GlobalNavigation;

    /// Get the global navigation state, if initialized.
    fn try_navigation(&self) -> Option<&GlobalNavigation>;
}

impl UseNavigation for App {
    fn navigation(&self) -> &GlobalNavigation {
        self.global::<GlobalNavigation>()
    }

    fn try_navigation(&self) -> Option<&GlobalNavigation> {
        self.try_global::<GlobalNavigation>()
    }
}

/// Initialize global navigation and queue the root page.
pub fn init_navigation(
    cx: &mut App,
    config: NavigationConfig,
    registry: ComponentRegistry<PageBuilder>,
    root: PageRequest,
) {
    let host = Rc::new(GpuiHost::new(cx.to_async()));
    let spawner = Rc::new(GpuiSpawner::new(cx.foreground_executor().clone()));
    let hot_reload = HotReloadHub::new();
    let controller = NavigationController::new(host, Rc::new(registry), spawner, config)
        .with_hot_reload(Rc::new(hot_reload.clone()));

    info_log!("Navigation initialized with root '{}'", root.component);
    controller.push(root, false);
    cx.set_global(GlobalNavigation {
        controller,
        hot_reload,
    });
}

/// Create an entity drawing the global navigation stack.
pub fn navigation_view(cx: &mut App) -> Entity<NavigationStackView> {
    let view = cx.navigation().stack_view();
    cx.new(|_| view)
}

/// Perform `action` on behalf of the current page.
pub fn navigate(cx: &App, action: NavigationAction) -> Result<()> {
    cx.try_navigation()
        .and_then(GlobalNavigation::current_navigator)
        .ok_or(NavigationError::NoRootPage)?
        .perform(action)
}
