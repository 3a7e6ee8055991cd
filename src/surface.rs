//! GPUI rendering of the navigation stack.
//!
//! - [`GpuiHost`]: the [`RenderHost`] used in a GPUI app. It keeps a small
//!   surface model (live pages, their transforms and running motions) that
//!   the controller writes to.
//! - [`NavigationStackView`]: the element drawing the surface. Pages that
//!   are not hidden are stacked bottom to top and positioned by their
//!   transform as a fraction of the container.
//! - [`GpuiSpawner`]: runs the controller's queued units on the GPUI
//!   foreground executor.
//!
//! Transforms are interpolated per frame while a motion runs; the view asks
//! for another animation frame until every motion has settled. A motion ends
//! on a GPUI executor timer, which is what the controller awaits.

use crate::component::ComponentParams;
use crate::host::{PageHandle, PageMount, RenderHost, Transaction};
use crate::navigator::Navigator;
use crate::page::{ComponentPath, PageContext, PageKey, ViewModel};
use crate::transition::{PageTransform, TransitionTiming, Viewport};
use crate::{trace_log, warn_log};
use futures::future::LocalBoxFuture;
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use futures::FutureExt;
use gpui::*;
use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Builds a page's content. Registered in a
/// [`ComponentRegistry`](crate::component::ComponentRegistry) under a
/// descriptor pattern.
pub type PageBuilder = Rc<dyn Fn(&PageProps, &mut Window, &mut App) -> AnyElement>;

/// Wrap a closure as a [`PageBuilder`].
///
/// ```ignore
/// registry.register("/profile/{id}", page_builder(|props, _window, _cx| {
///     div().child(format!("Profile {}", props.params.get("id").unwrap_or("?")))
///         .into_any_element()
/// }));
/// ```
pub fn page_builder<F>(build: F) -> PageBuilder
where
    F: Fn(&PageProps, &mut Window, &mut App) -> AnyElement + 'static,
{
    Rc::new(build)
}

/// What a page builder receives on every render.
#[derive(Clone)]
pub struct PageProps {
    pub key: PageKey,
    pub path: ComponentPath,
    pub params: ComponentParams,
    pub view_model: Option<ViewModel>,
    pub context: PageContext,
    pub title: Option<String>,
}

impl PageProps {
    /// The page's own navigator.
    pub fn navigator(&self) -> &Navigator {
        self.context.navigator()
    }

    /// The view-model downcast to `T`.
    pub fn view_model_as<T: Any>(&self) -> Option<&T> {
        self.view_model.as_ref()?.downcast_ref::<T>()
    }
}

// ============================================================================
// Surface model
// ============================================================================

struct Motion {
    from: PageTransform,
    to: PageTransform,
    timing: TransitionTiming,
    started: Instant,
    generation: u64,
}

impl Motion {
    fn at(&self, now: Instant) -> (PageTransform, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        let progress = self.timing.progress(elapsed);
        (self.from.lerp(&self.to, progress), elapsed < self.timing.duration)
    }
}

struct SurfacePage {
    handle: PageHandle,
    props: PageProps,
    builder: PageBuilder,
    transform: PageTransform,
    motion: Option<Motion>,
}

impl SurfacePage {
    fn transform_at(&self, now: Instant) -> (PageTransform, bool) {
        self.motion
            .as_ref()
            .map_or((self.transform, false), |motion| motion.at(now))
    }
}

/// One page to draw this frame.
struct Frame {
    props: PageProps,
    builder: PageBuilder,
    transform: PageTransform,
    is_active: bool,
}

#[derive(Default)]
struct Surface {
    pages: Vec<SurfacePage>,
    active: Option<PageHandle>,
    next_id: u64,
    next_generation: u64,
}

impl Surface {
    fn page_mut(&mut self, handle: PageHandle) -> Option<&mut SurfacePage> {
        self.pages.iter_mut().find(|page| page.handle == handle)
    }

    fn insert(&mut self, mount: PageMount<PageBuilder>) -> PageHandle {
        self.next_id += 1;
        let handle = PageHandle::new(self.next_id);
        self.pages.push(SurfacePage {
            handle,
            props: PageProps {
                key: mount.key,
                path: mount.path,
                params: mount.params,
                view_model: mount.view_model,
                context: mount.context,
                title: mount.title,
            },
            builder: mount.component,
            transform: mount.initial_transform,
            motion: None,
        });
        handle
    }

    fn remove(&mut self, handle: PageHandle) {
        self.pages.retain(|page| page.handle != handle);
        if self.active == Some(handle) {
            self.active = None;
        }
    }

    fn apply(&mut self, transaction: &Transaction) {
        for (handle, transform) in transaction.iter() {
            if let Some(page) = self.page_mut(*handle) {
                page.transform = *transform;
                page.motion = None;
            }
        }
    }

    /// Start moving every page in `transaction` from where it is now.
    fn start_motion(
        &mut self,
        transaction: &Transaction,
        timing: TransitionTiming,
        now: Instant,
    ) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        for (handle, target) in transaction.iter() {
            if let Some(page) = self.page_mut(*handle) {
                let (from, _) = page.transform_at(now);
                page.transform = *target;
                page.motion = Some(Motion {
                    from,
                    to: *target,
                    timing,
                    started: now,
                    generation,
                });
            }
        }
        generation
    }

    fn finish_motion(&mut self, generation: u64) {
        for page in &mut self.pages {
            if page.motion.as_ref().is_some_and(|m| m.generation == generation) {
                page.motion = None;
            }
        }
    }

    fn restack(&mut self, order: &[PageHandle]) {
        self.pages.sort_by_key(|page| {
            order
                .iter()
                .position(|handle| *handle == page.handle)
                .unwrap_or(usize::MAX)
        });
    }

    /// Visible pages bottom to top, and whether any motion is still running.
    fn frame(&self, now: Instant) -> (Vec<Frame>, bool) {
        let mut animating = false;
        let frames = self
            .pages
            .iter()
            .filter_map(|page| {
                let (transform, moving) = page.transform_at(now);
                animating |= moving;
                (!transform.is_hidden()).then(|| Frame {
                    props: page.props.clone(),
                    builder: Rc::clone(&page.builder),
                    transform,
                    is_active: self.active == Some(page.handle),
                })
            })
            .collect();
        (frames, animating)
    }
}

// ============================================================================
// GpuiHost
// ============================================================================

/// [`RenderHost`] drawing pages through [`NavigationStackView`].
///
/// Pages are laid out in fractions of the container, so the reported
/// viewport is always `1 × 1`.
pub struct GpuiHost {
    surface: Rc<RefCell<Surface>>,
    cx: AsyncApp,
}

impl GpuiHost {
    pub fn new(cx: AsyncApp) -> Self {
        Self {
            surface: Rc::new(RefCell::new(Surface::default())),
            cx,
        }
    }

    /// A view drawing this host's pages.
    pub fn view(&self) -> NavigationStackView {
        NavigationStackView {
            surface: Rc::clone(&self.surface),
        }
    }

    /// Number of live page containers.
    pub fn page_count(&self) -> usize {
        self.surface.borrow().pages.len()
    }

    /// Redraw on the next turn of the foreground executor.
    fn refresh(&self) {
        schedule_refresh(&self.cx);
    }
}

fn schedule_refresh(cx: &AsyncApp) {
    let app = cx.clone();
    cx.foreground_executor()
        .spawn(async move {
            // Fails only once the app is gone, when there is nothing to redraw.
            let _ = app.update(|cx| cx.refresh_windows());
        })
        .detach();
}

impl RenderHost for GpuiHost {
    type Component = PageBuilder;

    fn viewport(&self) -> Viewport {
        Viewport::unit()
    }

    fn create_page(&self, mount: PageMount<PageBuilder>) -> PageHandle {
        let handle = self.surface.borrow_mut().insert(mount);
        trace_log!("Surface: mounted page container {}", handle.id());
        self.refresh();
        handle
    }

    fn destroy_page(&self, page: PageHandle) {
        self.surface.borrow_mut().remove(page);
        trace_log!("Surface: removed page container {}", page.id());
        self.refresh();
    }

    fn apply(&self, transaction: &Transaction) {
        self.surface.borrow_mut().apply(transaction);
        self.refresh();
    }

    fn animate(
        &self,
        transaction: Transaction,
        timing: TransitionTiming,
    ) -> LocalBoxFuture<'static, ()> {
        let generation =
            self.surface
                .borrow_mut()
                .start_motion(&transaction, timing, Instant::now());
        self.refresh();

        let timer = self.cx.background_executor().timer(timing.duration);
        let surface: Weak<RefCell<Surface>> = Rc::downgrade(&self.surface);
        let cx = self.cx.clone();
        async move {
            timer.await;
            match surface.upgrade() {
                Some(surface) => surface.borrow_mut().finish_motion(generation),
                None => {
                    warn_log!("Surface released during a transition");
                }
            }
            schedule_refresh(&cx);
        }
        .boxed_local()
    }

    fn restack(&self, order: &[PageHandle]) {
        self.surface.borrow_mut().restack(order);
    }

    fn set_active_page(&self, page: Option<PageHandle>) {
        self.surface.borrow_mut().active = page;
        self.refresh();
    }
}

// ============================================================================
// NavigationStackView
// ============================================================================

/// Draws the pages of a [`GpuiHost`].
pub struct NavigationStackView {
    surface: Rc<RefCell<Surface>>,
}

impl Render for NavigationStackView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let (frames, animating) = self.surface.borrow().frame(Instant::now());
        if animating {
            window.request_animation_frame();
        }

        let mut container = div().relative().w_full().h_full().overflow_hidden();
        for frame in frames {
            let content = (frame.builder)(&frame.props, window, cx);
            let mut page = div()
                .absolute()
                .w_full()
                .h_full()
                .left(relative(frame.transform.translate_x))
                .top(relative(frame.transform.translate_y))
                .opacity(frame.transform.opacity);
            // Only the active page takes input; it shields the pages beneath.
            if frame.is_active {
                page = page.occlude();
            }
            container = container.child(page.child(content));
        }
        container
    }
}

// ============================================================================
// GpuiSpawner
// ============================================================================

/// [`LocalSpawn`] over the GPUI foreground executor.
#[derive(Clone)]
pub struct GpuiSpawner {
    executor: ForegroundExecutor,
}

impl GpuiSpawner {
    pub fn new(executor: ForegroundExecutor) -> Self {
        Self { executor }
    }
}

impl LocalSpawn for GpuiSpawner {
    fn spawn_local_obj(
        &self,
        future: LocalFutureObj<'static, ()>,
    ) -> std::result::Result<(), SpawnError> {
        self.executor.spawn(future).detach();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::rust_2021::test;
    use crate::navigator::{NavigationBackend, NavigatorSlot};
    use std::time::Duration;

    fn mount(surface: &mut Surface, initial: PageTransform) -> PageHandle {
        let backend: Weak<dyn NavigationBackend> = Weak::<crate::mock::MockNavigation>::new();
        let key = PageKey::next();
        let navigator = Navigator::new(
            backend,
            NavigatorSlot {
                key,
                layer: 0,
                index: 0,
            },
            false,
        );
        surface.insert(PageMount {
            key,
            path: ComponentPath::new("/test"),
            component: page_builder(|_, _, _| div().into_any_element()),
            params: ComponentParams::new(),
            view_model: None,
            context: PageContext::new(navigator, None),
            title: None,
            initial_transform: initial,
        })
    }

    #[test]
    fn test_hidden_pages_are_not_drawn() {
        let mut surface = Surface::default();
        mount(&mut surface, PageTransform::IDENTITY);
        mount(&mut surface, PageTransform::translated(10.0, 0.0).with_opacity(0.0));
        let (frames, animating) = surface.frame(Instant::now());
        assert_eq!(frames.len(), 1);
        assert!(!animating);
    }

    #[test]
    fn test_motion_interpolates_then_settles() {
        let mut surface = Surface::default();
        let page = mount(&mut surface, PageTransform::translated(1.0, 0.0));
        let start = Instant::now();
        let timing = TransitionTiming::from_millis(100).with_easing(crate::transition::Easing::Linear);
        let generation = surface.start_motion(
            &Transaction::new().set(page, PageTransform::IDENTITY),
            timing,
            start,
        );

        let (frames, animating) = surface.frame(start + Duration::from_millis(50));
        assert!(animating);
        assert!((frames[0].transform.translate_x - 0.5).abs() < 0.001);

        surface.finish_motion(generation);
        let (frames, animating) = surface.frame(start);
        assert!(!animating);
        assert_eq!(frames[0].transform, PageTransform::IDENTITY);
    }

    #[test]
    fn test_restack_and_active_page() {
        let mut surface = Surface::default();
        let a = mount(&mut surface, PageTransform::IDENTITY);
        let b = mount(&mut surface, PageTransform::IDENTITY);
        surface.restack(&[b, a]);
        surface.active = Some(a);
        let (frames, _) = surface.frame(Instant::now());
        assert!(!frames[0].is_active);
        assert!(frames[1].is_active);

        surface.remove(a);
        assert_eq!(surface.active, None);
        assert_eq!(surface.pages.len(), 1);
    }
}
