//! # gpui-stack-navigator
//!
//! Page stack navigation for [GPUI](https://gpui.rs): an ordered stack of
//! pages with animated push/pop transitions, modal presentation layers and
//! a deterministic test double.
//!
//! ## Model
//!
//! The stack is a sequence of **layers**, each an ordered list of pages.
//! Layer 0 is the root layer and always exists; [`Navigator::present`]
//! opens a new layer and [`Navigator::dismiss`] closes it. The top page of
//! the top layer is the only one receiving interaction.
//!
//! Every page gets its own [`Navigator`], injected into its
//! [`PageContext`]. Navigators forward to a [`NavigationBackend`]:
//!
//! - [`NavigationController`] is the production stack. Operations are queued
//!   on a [`SerialTaskQueue`](queue::SerialTaskQueue) and run one at a time,
//!   each together with its transition, in submission order.
//! - [`MockNavigation`] applies the same operations synchronously, for
//!   tests.
//!
//! ## Quick start
//!
//! ```ignore
//! use gpui::*;
//! use gpui_stack_navigator::*;
//!
//! fn main() {
//!     Application::new().run(|cx: &mut App| {
//!         let mut registry = ComponentRegistry::new();
//!         registry
//!             .register("/", page_builder(|props, _, _| {
//!                 let navigator = props.navigator().clone();
//!                 div()
//!                     .child("Home")
//!                     .on_mouse_down(MouseButton::Left, move |_, _, _| {
//!                         let _ = navigator.push(PageRequest::new("/users/42"));
//!                     })
//!                     .into_any_element()
//!             }))
//!             .register("/users/{id}", page_builder(|props, _, _| {
//!                 div()
//!                     .child(format!("User {}", props.params.get("id").unwrap_or("?")))
//!                     .into_any_element()
//!             }));
//!
//!         init_navigation(cx, NavigationConfig::new(), registry, PageRequest::new("/"));
//!         cx.open_window(WindowOptions::default(), |_, cx| navigation_view(cx))
//!             .unwrap();
//!     });
//! }
//! ```
//!
//! ## Testing flows
//!
//! ```
//! use gpui_stack_navigator::{MockNavigation, PageRequest};
//!
//! let nav = MockNavigation::new();
//! let root = nav.set_root_page(PageRequest::new("/"));
//! root.present(PageRequest::new("/compose")).unwrap();
//! assert_eq!(nav.stacks().len(), 2);
//!
//! nav.current_page().unwrap().navigator().dismiss(false).unwrap();
//! assert_eq!(nav.current_component().unwrap().as_str(), "/");
//! ```
//!
//! ## Features
//!
//! - `log` (default) / `tracing`: logging backend, see [`logging`].
//! - `cache` (default): LRU cache of component resolutions, see [`cache`].

#[macro_use]
pub mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod component;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod host;
pub mod hot_reload;
pub mod lifecycle;
pub mod mock;
pub mod navigator;
pub mod page;
pub mod queue;
mod stack;
pub mod surface;
pub mod transition;

// Re-exports
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ComponentCache};
pub use component::{ComponentParams, ComponentRegistry, ComponentResolver, ResolvedComponent};
pub use config::NavigationConfig;
pub use context::{
    init_navigation, navigate, navigation_view, GlobalNavigation, UseNavigation,
};
pub use controller::NavigationController;
pub use error::{NavigationError, Result};
pub use host::{PageHandle, PageMount, RenderHost, Transaction};
pub use hot_reload::{HotReloadHub, HotReloadSource, Subscription};
pub use lifecycle::{ActionKind, MutationPhase, NavigationAction, UnknownAction};
pub use mock::{MockNavigation, MockPage};
pub use navigator::{NavigationBackend, Navigator, NavigatorSlot};
pub use page::{ComponentPath, PageContext, PageKey, PageRequest, PageSnapshot};
pub use queue::{SerialTaskQueue, TaskCompletion};
pub use surface::{page_builder, GpuiHost, GpuiSpawner, NavigationStackView, PageBuilder, PageProps};
pub use transition::{Easing, PageTransform, SlideDirection, TransitionTiming, Viewport};
