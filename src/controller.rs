//! Animated navigation stack controller.
//!
//! [`NavigationController`] owns the layered page stack. Every structural
//! operation (push, pop, pop-to-root, pop-to-self, present, dismiss and the
//! hot-reload rebuild pass) is submitted to one [`SerialTaskQueue`] and runs
//! as a single unit: the unit mutates the stack, awaits the host's
//! transition, tears down removed pages, applies the resting transforms and
//! only then lets the next unit start.
//!
//! ```text
//! push / pop / …  ──► SerialTaskQueue ──► spawn(async body) ──► done.complete()
//!                                            │
//!                       Mutating ─► Animating{In,Out} ─► Reconciled ─► Idle
//! ```
//!
//! The async bodies run on a [`LocalSpawn`] executor. In a gpui app that is
//! the foreground executor; headless tests use a `LocalPool`.
//!
//! Calls never fail for bad input. A pop with nothing to remove or a handle
//! whose page is gone completes without touching the stack, and a component
//! that cannot be resolved is logged and skipped.

use crate::component::ComponentResolver;
use crate::config::NavigationConfig;
use crate::host::{PageHandle, PageMount, RenderHost, Transaction};
use crate::hot_reload::{HotReloadSource, Subscription};
use crate::lifecycle::MutationPhase;
use crate::navigator::{NavigationBackend, Navigator, NavigatorSlot};
use crate::page::{ComponentSource, PageContext, PageEntry, PageKey, PageRequest, PageSnapshot};
use crate::queue::SerialTaskQueue;
use crate::stack::{resting_visibility, PageStack};
use crate::transition::{PageTransform, SlideDirection, TransitionTiming, Viewport};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use futures::task::{LocalFutureObj, LocalSpawn};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Which pages a pop removes, relative to the top layer.
#[derive(Debug, Clone, Copy)]
enum PopTarget {
    /// The top page only.
    Top,
    /// Everything above the layer's bottom page.
    Root,
    /// The slot's page and everything above it.
    Through(NavigatorSlot),
    /// Everything above the slot's page.
    Above(NavigatorSlot),
}

struct ControllerState<C> {
    stack: PageStack<PageEntry<C>>,
    phase: MutationPhase,
    dirty: BTreeSet<PageKey>,
    rebuild_scheduled: bool,
}

/// Production navigation stack.
///
/// Created with [`NavigationController::new`], which returns an `Rc` because
/// every page's [`Navigator`] keeps a weak reference back to it.
pub struct NavigationController<H: RenderHost> {
    weak_self: Weak<Self>,
    host: Rc<H>,
    resolver: Rc<dyn ComponentResolver<H::Component>>,
    hot_reload: RefCell<Option<Rc<dyn HotReloadSource>>>,
    spawner: Rc<dyn LocalSpawn>,
    queue: SerialTaskQueue,
    config: NavigationConfig,
    state: RefCell<ControllerState<H::Component>>,
}

impl<H: RenderHost> NavigationController<H> {
    /// Create a controller with an empty root layer.
    ///
    /// The first page pushed becomes the root page.
    pub fn new(
        host: Rc<H>,
        resolver: Rc<dyn ComponentResolver<H::Component>>,
        spawner: Rc<dyn LocalSpawn>,
        config: NavigationConfig,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            host,
            resolver,
            hot_reload: RefCell::new(None),
            spawner,
            queue: SerialTaskQueue::new(),
            config,
            state: RefCell::new(ControllerState {
                stack: PageStack::new(),
                phase: MutationPhase::Idle,
                dirty: BTreeSet::new(),
                rebuild_scheduled: false,
            }),
        })
    }

    /// Subscribe every page created from now on to `source`.
    pub fn with_hot_reload(self: Rc<Self>, source: Rc<dyn HotReloadSource>) -> Rc<Self> {
        *self.hot_reload.borrow_mut() = Some(source);
        self
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// The queue every mutation runs on.
    pub fn queue(&self) -> &SerialTaskQueue {
        &self.queue
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Append a page to the top layer.
    pub fn push(&self, request: PageRequest, animated: bool) {
        self.enqueue_push(request, animated);
    }

    /// Remove the top page of the top layer.
    pub fn pop(&self, animated: bool) {
        self.enqueue_pop(PopTarget::Top, animated);
    }

    /// Remove `navigator`'s page and everything above it.
    pub fn pop_to_navigator(&self, navigator: &Navigator, animated: bool) {
        self.enqueue_pop(PopTarget::Through(navigator.slot()), animated);
    }

    /// Remove everything above the bottom page of the top layer.
    pub fn pop_to_root(&self, animated: bool) {
        self.enqueue_pop(PopTarget::Root, animated);
    }

    /// Remove everything above `navigator`'s page.
    pub fn pop_to_self(&self, navigator: &Navigator, animated: bool) {
        self.enqueue_pop(PopTarget::Above(navigator.slot()), animated);
    }

    /// Open a new layer holding one modal page.
    pub fn present(&self, request: PageRequest, animated: bool) {
        self.enqueue_present(request, animated);
    }

    /// Close the top layer. Does nothing when only the root layer exists.
    pub fn dismiss(&self, animated: bool) {
        self.enqueue_dismiss(animated);
    }

    /// Change a page's title. Returns `false` if the page is gone.
    pub fn set_title(&self, key: PageKey, title: Option<String>) -> bool {
        let mut state = self.state.borrow_mut();
        match state.stack.get_mut(key) {
            Some(entry) => {
                entry.title = title;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Keys of every layer, root layer first.
    pub fn layers(&self) -> Vec<Vec<PageKey>> {
        self.state.borrow().stack.layers().to_vec()
    }

    /// Pages of the top layer, bottom first.
    pub fn current_stack(&self) -> Vec<PageSnapshot> {
        let state = self.state.borrow();
        state
            .stack
            .top_layer()
            .iter()
            .filter_map(|key| state.stack.get(*key))
            .map(PageEntry::snapshot)
            .collect()
    }

    /// The page receiving interaction.
    pub fn current_page(&self) -> Option<PageSnapshot> {
        let state = self.state.borrow();
        let key = state.stack.current()?;
        state.stack.get(key).map(PageEntry::snapshot)
    }

    pub fn entry(&self, key: PageKey) -> Option<PageSnapshot> {
        self.state.borrow().stack.get(key).map(PageEntry::snapshot)
    }

    /// Navigator of the root page.
    pub fn root_navigator(&self) -> Option<Navigator> {
        let state = self.state.borrow();
        let key = state.stack.root()?;
        state
            .stack
            .get(key)
            .map(|entry| entry.context.navigator().clone())
    }

    /// Phase of the mutation in flight.
    pub fn phase(&self) -> MutationPhase {
        self.state.borrow().phase
    }

    /// Check if nothing is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.phase() == MutationPhase::Idle && !self.queue.is_busy() && self.queue.pending() == 0
    }

    // ------------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------------

    fn backend(&self) -> Weak<dyn NavigationBackend> {
        self.weak_self.clone()
    }

    /// Queue `body` as one unit. The unit completes when the body's future does.
    fn submit<F, Fut>(&self, operation: &'static str, body: F)
    where
        F: FnOnce(Rc<Self>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let weak = self.weak_self.clone();
        let spawner = self.spawner.clone();
        self.queue.enqueue(move |done| {
            let Some(this) = weak.upgrade() else {
                warn_log!("Dropping queued {}: controller released", operation);
                return;
            };
            let unit = async move {
                body(this).await;
                done.complete();
            };
            if let Err(err) = spawner.spawn_local_obj(LocalFutureObj::new(Box::pin(unit))) {
                warn_log!("Failed to spawn {}: {:?}", operation, err);
            }
        });
    }

    fn enqueue_push(&self, request: PageRequest, animated: bool) {
        self.submit("push", move |this| this.run_push(request, animated));
    }

    fn enqueue_pop(&self, target: PopTarget, animated: bool) {
        self.submit("pop", move |this| this.run_pop(target, animated));
    }

    fn enqueue_present(&self, request: PageRequest, animated: bool) {
        self.submit("present", move |this| this.run_present(request, animated));
    }

    fn enqueue_dismiss(&self, animated: bool) {
        self.submit("dismiss", move |this| this.run_dismiss(animated));
    }

    /// Run a synchronous, non-structural update in queue order.
    fn enqueue_update(&self, update: impl FnOnce(&mut ControllerState<H::Component>) + 'static) {
        let weak = self.weak_self.clone();
        self.queue.enqueue(move |done| {
            if let Some(this) = weak.upgrade() {
                update(&mut *this.state.borrow_mut());
            }
            done.complete();
        });
    }

    fn schedule_rebuild(&self, key: PageKey) {
        let first = {
            let mut state = self.state.borrow_mut();
            state.dirty.insert(key);
            !std::mem::replace(&mut state.rebuild_scheduled, true)
        };
        if first {
            debug_log!("Hot reload: rebuild scheduled ({} dirty)", key);
            self.submit("rebuild", |this| this.run_rebuild());
        }
    }

    // ------------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------------

    async fn run_push(self: Rc<Self>, request: PageRequest, animated: bool) {
        self.set_phase(MutationPhase::Mutating);
        let (layer, index) = self.state.borrow().stack.next_push_slot();
        let previous = index
            .checked_sub(1)
            .and_then(|i| self.state.borrow().stack.top_layer().get(i).copied());
        let animate = animated && previous.is_some();

        let viewport = self.host.viewport();
        let initial = if animate {
            offscreen(request.is_modal, viewport)
        } else {
            PageTransform::IDENTITY
        };
        let is_modal = request.is_modal;
        let Some(entry) = self.build_entry(request, layer, index, initial) else {
            self.set_phase(MutationPhase::Idle);
            return;
        };
        let key = entry.key;
        info_log!(
            "Pushed {} ('{}') at layer {} index {}",
            key,
            entry.component.path(),
            layer,
            index
        );
        self.state.borrow_mut().stack.push(key, entry);

        if let (true, Some(previous)) = (animate, previous) {
            let transaction = self.write_transforms(&[
                (key, PageTransform::IDENTITY),
                (previous, self.covered(is_modal, viewport)),
            ]);
            self.set_phase(MutationPhase::AnimatingIn);
            self.host.animate(transaction, self.config.transition).await;
        }
        self.reconcile();
    }

    async fn run_pop(self: Rc<Self>, target: PopTarget, animated: bool) {
        if let PopTarget::Through(slot) = target {
            self.wait_auto_pop_delay(slot).await;
        }

        self.set_phase(MutationPhase::Mutating);
        let (removed, exposed) = {
            let mut state = self.state.borrow_mut();
            let layer_len = state.stack.top_layer().len();
            let from = match target {
                PopTarget::Top => layer_len.checked_sub(1),
                PopTarget::Root => Some(1),
                PopTarget::Through(slot) => state.stack.position_in_top_layer(slot.key),
                PopTarget::Above(slot) => state
                    .stack
                    .position_in_top_layer(slot.key)
                    .map(|index| index + 1),
            };
            let removed = from
                .map(|index| state.stack.truncate_top_layer(index))
                .unwrap_or_default();
            (removed, state.stack.current())
        };

        let (Some((_, leaving)), Some(exposed)) = (removed.first(), exposed) else {
            debug_log!("Pop ignored: nothing to remove for {:?}", target);
            self.set_phase(MutationPhase::Idle);
            return;
        };

        if animated {
            let viewport = self.host.viewport();
            let setup = self.write_transforms(&[(exposed, self.covered(leaving.is_modal, viewport))]);
            self.host.apply(&setup);

            let mut transaction = self.write_transforms(&[(exposed, PageTransform::IDENTITY)]);
            transaction.insert(leaving.handle, offscreen(leaving.is_modal, viewport));
            self.set_phase(MutationPhase::AnimatingOut);
            self.host.animate(transaction, self.config.transition).await;
        }

        let count = removed.len();
        self.teardown(removed);
        info_log!("Popped {} page(s), {} is on top", count, exposed);
        self.reconcile();
    }

    async fn run_present(self: Rc<Self>, mut request: PageRequest, animated: bool) {
        self.set_phase(MutationPhase::Mutating);
        request.is_modal = true;
        let layer = self.state.borrow().stack.layer_count();
        let initial = if animated {
            offscreen(true, self.host.viewport())
        } else {
            PageTransform::IDENTITY
        };
        let Some(entry) = self.build_entry(request, layer, 0, initial) else {
            self.set_phase(MutationPhase::Idle);
            return;
        };
        let key = entry.key;
        info_log!(
            "Presented {} ('{}') in layer {}",
            key,
            entry.component.path(),
            layer
        );
        self.state.borrow_mut().stack.push_layer(key, entry);

        if animated {
            let transaction = self.write_transforms(&[(key, PageTransform::IDENTITY)]);
            self.set_phase(MutationPhase::AnimatingIn);
            self.host.animate(transaction, self.config.transition).await;
        }
        self.reconcile();
    }

    async fn run_dismiss(self: Rc<Self>, animated: bool) {
        self.set_phase(MutationPhase::Mutating);
        let (removed, exposed) = {
            let mut state = self.state.borrow_mut();
            let removed = state.stack.pop_layer();
            (removed, state.stack.current())
        };
        if removed.is_empty() {
            debug_log!("Dismiss ignored: only the root layer is left");
            self.set_phase(MutationPhase::Idle);
            return;
        }

        if animated {
            let viewport = self.host.viewport();
            if let Some(exposed) = exposed {
                let setup = self.write_transforms(&[(exposed, PageTransform::IDENTITY)]);
                self.host.apply(&setup);
            }
            let mut transaction = Transaction::new();
            for (_, entry) in &removed {
                transaction.insert(entry.handle, offscreen(true, viewport));
            }
            self.set_phase(MutationPhase::AnimatingOut);
            self.host.animate(transaction, self.config.transition).await;
        }

        let count = removed.len();
        self.teardown(removed);
        info_log!("Dismissed a layer of {} page(s)", count);
        self.reconcile();
    }

    /// Recreate every dirty page in place with a fresh key and resolution.
    async fn run_rebuild(self: Rc<Self>) {
        self.set_phase(MutationPhase::Mutating);
        let dirty = {
            let mut state = self.state.borrow_mut();
            state.rebuild_scheduled = false;
            std::mem::take(&mut state.dirty)
        };

        for old_key in dirty {
            let found = {
                let state = self.state.borrow();
                state.stack.locate(old_key).and_then(|(layer, index)| {
                    state.stack.get(old_key).map(|entry| {
                        (
                            layer,
                            index,
                            entry.to_request(),
                            entry.dismiss_gesture_disabled,
                            entry.auto_pop_delay,
                        )
                    })
                })
            };
            let Some((layer, index, request, gesture_disabled, pop_delay)) = found else {
                continue;
            };

            self.resolver.invalidate(&request.component);
            let Some(mut entry) = self.build_entry(request, layer, index, PageTransform::IDENTITY)
            else {
                continue;
            };
            entry.dismiss_gesture_disabled = gesture_disabled;
            entry.auto_pop_delay = pop_delay;
            let new_key = entry.key;

            let previous = self.state.borrow_mut().stack.replace(old_key, new_key, entry);
            if let Some(previous) = previous {
                self.teardown(vec![(old_key, previous)]);
            }
            info_log!("Hot reload: rebuilt {} as {}", old_key, new_key);
        }

        self.reconcile();
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn set_phase(&self, next: MutationPhase) {
        let mut state = self.state.borrow_mut();
        debug_assert!(
            state.phase.can_transition_to(next),
            "illegal phase change {} -> {}",
            state.phase,
            next
        );
        debug_log!("Mutation phase {} -> {}", state.phase, next);
        state.phase = next;
    }

    /// Reserve a key and slot, create the navigator, then the page.
    fn build_entry(
        &self,
        request: PageRequest,
        layer: usize,
        index: usize,
        initial: PageTransform,
    ) -> Option<PageEntry<H::Component>> {
        let key = PageKey::next();
        let navigator = Navigator::new(
            self.backend(),
            NavigatorSlot { key, layer, index },
            self.config.animated,
        );
        let context = PageContext::new(navigator, request.context.clone());

        let source = ComponentSource::new(request.component.clone());
        let resolved = match source.resolve(self.resolver.as_ref()) {
            Ok(resolved) => resolved.clone(),
            Err(err) => {
                error_log!("Cannot create {}: {}", key, err);
                return None;
            }
        };

        let handle = self.host.create_page(PageMount {
            key,
            path: request.component.clone(),
            component: resolved.component,
            params: resolved.params.clone(),
            view_model: request.view_model.clone(),
            context: context.clone(),
            title: request.title.clone(),
            initial_transform: initial,
        });
        let hot_reload = self.subscribe(key, &source);

        Some(PageEntry {
            key,
            component: source,
            params: resolved.params,
            view_model: request.view_model,
            context,
            title: request.title,
            is_modal: request.is_modal,
            is_transparent: request.is_transparent,
            handle,
            transform: initial,
            hot_reload,
            dismiss_gesture_disabled: false,
            auto_pop_delay: None,
        })
    }

    fn subscribe(
        &self,
        key: PageKey,
        source: &ComponentSource<H::Component>,
    ) -> Option<Subscription> {
        let hot_reload = self.hot_reload.borrow().clone()?;
        let weak = self.weak_self.clone();
        Some(hot_reload.subscribe(
            source.path(),
            Rc::new(move || {
                if let Some(this) = weak.upgrade() {
                    this.schedule_rebuild(key);
                }
            }),
        ))
    }

    /// Record target transforms on the entries and batch them.
    fn write_transforms(&self, writes: &[(PageKey, PageTransform)]) -> Transaction {
        let mut state = self.state.borrow_mut();
        let mut transaction = Transaction::new();
        for (key, transform) in writes {
            if let Some(entry) = state.stack.get_mut(*key) {
                entry.transform = *transform;
                transaction.insert(entry.handle, *transform);
            }
        }
        transaction
    }

    /// Release removed pages, topmost first.
    fn teardown(&self, removed: Vec<(PageKey, PageEntry<H::Component>)>) {
        for (key, mut entry) in removed {
            if let Some(subscription) = entry.hot_reload.take() {
                subscription.dispose();
            }
            self.state.borrow_mut().dirty.remove(&key);
            self.host.destroy_page(entry.handle);
            trace_log!("Tore down {} ('{}')", key, entry.component.path());
        }
    }

    /// Apply resting transforms to every page and hand interaction to the top one.
    fn reconcile(&self) {
        self.set_phase(MutationPhase::Reconciled);
        let viewport = self.host.viewport();
        let hidden = PageTransform::translated(
            viewport.width * self.config.hidden_offset_factor,
            0.0,
        )
        .with_opacity(0.0);

        let (transaction, order, active) = {
            let state = &mut *self.state.borrow_mut();
            let keys = state.stack.flattened();
            let transparent: Vec<bool> = keys
                .iter()
                .map(|key| state.stack.get(*key).is_some_and(|e| e.is_transparent))
                .collect();
            let mut transaction = Transaction::new();
            let mut order: Vec<PageHandle> = Vec::with_capacity(keys.len());
            for (key, visible) in keys.iter().zip(resting_visibility(&transparent)) {
                if let Some(entry) = state.stack.get_mut(*key) {
                    entry.transform = if visible {
                        PageTransform::IDENTITY
                    } else {
                        hidden
                    };
                    trace_log!("Resting transform for {}: {:?}", key, entry.transform);
                    transaction.insert(entry.handle, entry.transform);
                    order.push(entry.handle);
                }
            }
            let active = state
                .stack
                .current()
                .and_then(|key| state.stack.get(key))
                .map(|entry| entry.handle);
            (transaction, order, active)
        };

        self.host.apply(&transaction);
        self.host.restack(&order);
        self.host.set_active_page(active);
        self.set_phase(MutationPhase::Idle);
    }

    fn covered(&self, arriving_is_modal: bool, viewport: Viewport) -> PageTransform {
        if arriving_is_modal {
            PageTransform::IDENTITY
        } else {
            PageTransform::translated(-viewport.width * self.config.covered_parallax, 0.0)
        }
    }

    async fn wait_auto_pop_delay(&self, slot: NavigatorSlot) {
        let delay = self
            .state
            .borrow()
            .stack
            .get(slot.key)
            .and_then(|entry| entry.auto_pop_delay);
        if let Some(delay) = delay {
            debug_log!("Waiting {:?} before popping {}", delay, slot.key);
            self.host
                .animate(Transaction::new(), TransitionTiming::delay(delay))
                .await;
        }
    }
}

/// Where a page enters from and leaves to.
fn offscreen(is_modal: bool, viewport: Viewport) -> PageTransform {
    let (x, y) = SlideDirection::for_page(is_modal).offscreen(viewport);
    PageTransform::translated(x, y).with_opacity(0.0)
}

impl<H: RenderHost> NavigationBackend for NavigationController<H> {
    fn backend_name(&self) -> &'static str {
        "NavigationController"
    }

    fn push(&self, request: PageRequest, animated: bool) -> crate::Result<()> {
        self.enqueue_push(request, animated);
        Ok(())
    }

    fn pop_to_navigator(&self, slot: NavigatorSlot, animated: bool) -> crate::Result<()> {
        self.enqueue_pop(PopTarget::Through(slot), animated);
        Ok(())
    }

    fn pop_to_root(&self, animated: bool) -> crate::Result<()> {
        self.enqueue_pop(PopTarget::Root, animated);
        Ok(())
    }

    fn pop_to_self(&self, slot: NavigatorSlot, animated: bool) -> crate::Result<()> {
        self.enqueue_pop(PopTarget::Above(slot), animated);
        Ok(())
    }

    fn present(&self, request: PageRequest, animated: bool) -> crate::Result<()> {
        self.enqueue_present(request, animated);
        Ok(())
    }

    fn dismiss(&self, animated: bool) -> crate::Result<()> {
        self.enqueue_dismiss(animated);
        Ok(())
    }

    fn set_dismiss_gesture_disabled(&self, slot: NavigatorSlot, disabled: bool) {
        self.enqueue_update(move |state| {
            if let Some(entry) = state.stack.get_mut(slot.key) {
                entry.dismiss_gesture_disabled = disabled;
            }
        });
    }

    fn set_auto_pop_delay(&self, slot: NavigatorSlot, delay: Option<Duration>) {
        self.enqueue_update(move |state| {
            if let Some(entry) = state.stack.get_mut(slot.key) {
                entry.auto_pop_delay = delay;
            }
        });
    }
}

impl<H: RenderHost> fmt::Debug for NavigationController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("NavigationController")
            .field("layers", &state.stack.layers())
            .field("phase", &state.phase)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
