//! Test utilities for navigation stack tests
//!
//! Provides a headless recording render host, a component registry fixture
//! and a harness driving a controller on a `LocalPool`.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use gpui_stack_navigator::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Initialize env_logger once for test output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the controller asked the host to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Create {
        key: PageKey,
        path: String,
        handle: PageHandle,
    },
    Destroy(PageHandle),
    Apply(Transaction),
    Animate(Transaction, TransitionTiming),
    Restack(Vec<PageHandle>),
    Active(Option<PageHandle>),
}

/// How the host finishes animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animations {
    /// Every animation finishes immediately.
    Instant,
    /// Animations wait for [`TestHost::release_animations`].
    Manual,
}

/// Headless host recording every call.
pub struct TestHost {
    mode: Animations,
    next_id: Cell<u64>,
    events: RefCell<Vec<HostEvent>>,
    live: RefCell<HashMap<PageHandle, PageKey>>,
    transforms: RefCell<HashMap<PageHandle, PageTransform>>,
    gates: RefCell<Vec<oneshot::Sender<()>>>,
}

impl TestHost {
    pub fn new(mode: Animations) -> Self {
        Self {
            mode,
            next_id: Cell::new(0),
            events: RefCell::new(Vec::new()),
            live: RefCell::new(HashMap::new()),
            transforms: RefCell::new(HashMap::new()),
            gates: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Handles destroyed since the last `clear_events`, in order.
    pub fn destroyed(&self) -> Vec<PageHandle> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Destroy(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    /// Animations requested since the last `clear_events`.
    pub fn animations(&self) -> Vec<(Transaction, TransitionTiming)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Animate(transaction, timing) => Some((transaction.clone(), *timing)),
                _ => None,
            })
            .collect()
    }

    pub fn live_pages(&self) -> usize {
        self.live.borrow().len()
    }

    /// Last transform written to `handle`.
    pub fn transform(&self, handle: PageHandle) -> Option<PageTransform> {
        self.transforms.borrow().get(&handle).copied()
    }

    pub fn pending_animations(&self) -> usize {
        self.gates.borrow().len()
    }

    /// Let every waiting animation finish.
    pub fn release_animations(&self) {
        for gate in self.gates.borrow_mut().drain(..) {
            let _ = gate.send(());
        }
    }

    fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }

    fn write(&self, transaction: &Transaction) {
        let mut transforms = self.transforms.borrow_mut();
        for (handle, transform) in transaction.iter() {
            transforms.insert(*handle, *transform);
        }
    }
}

impl RenderHost for TestHost {
    type Component = &'static str;

    fn viewport(&self) -> Viewport {
        Viewport::new(400.0, 800.0)
    }

    fn create_page(&self, mount: PageMount<&'static str>) -> PageHandle {
        self.next_id.set(self.next_id.get() + 1);
        let handle = PageHandle::new(self.next_id.get());
        self.live.borrow_mut().insert(handle, mount.key);
        self.transforms
            .borrow_mut()
            .insert(handle, mount.initial_transform);
        self.record(HostEvent::Create {
            key: mount.key,
            path: mount.path.to_string(),
            handle,
        });
        handle
    }

    fn destroy_page(&self, page: PageHandle) {
        self.live.borrow_mut().remove(&page);
        self.transforms.borrow_mut().remove(&page);
        self.record(HostEvent::Destroy(page));
    }

    fn apply(&self, transaction: &Transaction) {
        self.write(transaction);
        self.record(HostEvent::Apply(transaction.clone()));
    }

    fn animate(
        &self,
        transaction: Transaction,
        timing: TransitionTiming,
    ) -> LocalBoxFuture<'static, ()> {
        self.write(&transaction);
        self.record(HostEvent::Animate(transaction, timing));
        match self.mode {
            Animations::Instant => future::ready(()).boxed_local(),
            Animations::Manual => {
                let (tx, rx) = oneshot::channel();
                self.gates.borrow_mut().push(tx);
                async move {
                    let _ = rx.await;
                }
                .boxed_local()
            }
        }
    }

    fn restack(&self, order: &[PageHandle]) {
        self.record(HostEvent::Restack(order.to_vec()));
    }

    fn set_active_page(&self, page: Option<PageHandle>) {
        self.record(HostEvent::Active(page));
    }
}

/// Registry with the descriptors tests push.
pub fn registry() -> ComponentRegistry<&'static str> {
    let mut registry = ComponentRegistry::new();
    registry
        .register("/", "home")
        .register("/a", "a")
        .register("/b", "b")
        .register("/c", "c")
        .register("/details/{id}", "details")
        .register("/modal", "modal")
        .register("/overlay", "overlay");
    registry
}

/// A controller over a [`TestHost`], driven by a `LocalPool`.
pub struct Harness {
    pub pool: LocalPool,
    pub host: Rc<TestHost>,
    pub registry: Rc<ComponentRegistry<&'static str>>,
    pub hot_reload: HotReloadHub,
    pub controller: Rc<NavigationController<TestHost>>,
}

impl Harness {
    pub fn new(mode: Animations) -> Self {
        Self::with_config(mode, NavigationConfig::new())
    }

    pub fn with_config(mode: Animations, config: NavigationConfig) -> Self {
        init_logging();
        let pool = LocalPool::new();
        let host = Rc::new(TestHost::new(mode));
        let registry = Rc::new(registry());
        let hot_reload = HotReloadHub::new();
        let controller = NavigationController::new(
            host.clone(),
            registry.clone(),
            Rc::new(pool.spawner()),
            config,
        )
        .with_hot_reload(Rc::new(hot_reload.clone()));
        Self {
            pool,
            host,
            registry,
            hot_reload,
            controller,
        }
    }

    /// A harness whose stack holds the root page `/`.
    pub fn with_root(mode: Animations) -> Self {
        let mut harness = Self::new(mode);
        harness.controller.push(PageRequest::new("/"), false);
        harness.run();
        harness
    }

    /// Run queued units until they all wait on something.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Finish the running animations and run what follows.
    pub fn release(&mut self) {
        self.host.release_animations();
        self.run();
    }

    /// Release animations until the controller is idle.
    pub fn settle(&mut self) {
        self.run();
        while self.host.pending_animations() > 0 {
            self.release();
        }
    }

    pub fn root(&self) -> Navigator {
        self.controller
            .root_navigator()
            .expect("root page should be mounted")
    }

    pub fn top(&self) -> Navigator {
        self.controller
            .current_page()
            .expect("stack should not be empty")
            .navigator
    }

    /// Descriptors of the top layer, bottom first.
    pub fn components(&self) -> Vec<String> {
        self.controller
            .current_stack()
            .iter()
            .map(|page| page.component.to_string())
            .collect()
    }

    /// Descriptors of every layer.
    pub fn shape(&self) -> Vec<Vec<String>> {
        self.controller
            .layers()
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .filter_map(|key| self.controller.entry(*key))
                    .map(|page| page.component.to_string())
                    .collect()
            })
            .collect()
    }
}

/// Build a request for `path`.
pub fn page(path: &str) -> PageRequest {
    PageRequest::new(path)
}
