//! Both backends must leave the stack in the same shape
//!
//! Each flow runs once against the animated controller and once against the
//! mock; the resulting layer shapes are compared.

mod common;

use common::{init_logging, page, Animations, Harness};
use gpui_stack_navigator::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// What a flow needs from a backend under test.
trait StackUnderTest {
    fn root(&self) -> Navigator;
    fn top(&self) -> Navigator;
    /// Let queued work finish.
    fn settle(&mut self);
    fn shape(&self) -> Vec<Vec<String>>;
}

impl StackUnderTest for Harness {
    fn root(&self) -> Navigator {
        Harness::root(self)
    }

    fn top(&self) -> Navigator {
        Harness::top(self)
    }

    fn settle(&mut self) {
        Harness::settle(self)
    }

    fn shape(&self) -> Vec<Vec<String>> {
        Harness::shape(self)
    }
}

struct MockStack(Rc<MockNavigation>);

impl StackUnderTest for MockStack {
    fn root(&self) -> Navigator {
        self.0.root_navigator().unwrap()
    }

    fn top(&self) -> Navigator {
        self.0.current_page().unwrap().navigator().clone()
    }

    fn settle(&mut self) {}

    fn shape(&self) -> Vec<Vec<String>> {
        self.0
            .stacks()
            .iter()
            .map(|layer| layer.iter().map(|page| page.component.to_string()).collect())
            .collect()
    }
}

fn backends() -> Vec<Box<dyn StackUnderTest>> {
    init_logging();
    let mock = MockNavigation::new();
    mock.set_root_page(page("/"));
    vec![
        Box::new(Harness::with_root(Animations::Manual)),
        Box::new(MockStack(mock)),
    ]
}

/// Run `flow` on every backend and return the final shapes.
fn run(flow: impl Fn(&mut dyn StackUnderTest)) -> Vec<Vec<Vec<String>>> {
    backends()
        .into_iter()
        .map(|mut backend| {
            flow(backend.as_mut());
            backend.settle();
            backend.shape()
        })
        .collect()
}

fn assert_same(shapes: &[Vec<Vec<String>>], expected: Vec<Vec<&str>>) {
    for shape in shapes {
        assert_eq!(shape, &expected);
    }
}

#[test]
fn test_push_pop_to_self_flow() {
    let shapes = run(|s| {
        let root = s.root();
        root.push(page("/a")).unwrap();
        s.settle();
        let a = s.top();
        a.push(page("/b")).unwrap();
        a.push(page("/c")).unwrap();
        s.settle();
        a.pop_to_self().unwrap();
    });
    assert_same(&shapes, vec![vec!["/", "/a"]]);
}

#[test]
fn test_pop_to_root_flow() {
    let shapes = run(|s| {
        s.root().push(page("/a")).unwrap();
        s.root().push(page("/b")).unwrap();
        s.settle();
        s.top().pop_to_root().unwrap();
    });
    assert_same(&shapes, vec![vec!["/"]]);
}

#[test]
fn test_present_flow() {
    let shapes = run(|s| {
        s.root().present(page("/modal")).unwrap();
        s.settle();
        let modal = s.top();
        modal.push(page("/b")).unwrap();
        modal.push(page("/c")).unwrap();
    });
    assert_same(&shapes, vec![vec!["/"], vec!["/modal", "/b", "/c"]]);

    let shapes = run(|s| {
        s.root().present(page("/modal")).unwrap();
        s.settle();
        s.top().push(page("/b")).unwrap();
        s.settle();
        s.top().dismiss(true).unwrap();
    });
    assert_same(&shapes, vec![vec!["/"]]);
}

#[test]
fn test_root_pop_flow() {
    let shapes = run(|s| {
        s.root().pop().unwrap();
        s.root().pop_to_root().unwrap();
        s.root().dismiss(false).unwrap();
    });
    assert_same(&shapes, vec![vec!["/"]]);
}

#[test]
fn test_double_pop_flow() {
    let shapes = run(|s| {
        s.root().push(page("/a")).unwrap();
        s.root().push(page("/b")).unwrap();
        s.settle();
        let b = s.top();
        b.pop().unwrap();
        b.pop().unwrap();
    });
    assert_same(&shapes, vec![vec!["/", "/a"]]);
}

#[test]
fn test_lower_layer_handle_flow() {
    let shapes = run(|s| {
        s.root().push(page("/a")).unwrap();
        s.settle();
        let a = s.top();
        a.present(page("/modal")).unwrap();
        s.settle();
        a.pop().unwrap();
        a.pop_to_self().unwrap();
    });
    assert_same(&shapes, vec![vec!["/", "/a"], vec!["/modal"]]);
}

// ---- partial backends ----

/// Backend implementing only the required operations.
struct PushOnly {
    pushed: RefCell<Vec<ComponentPath>>,
}

impl NavigationBackend for PushOnly {
    fn backend_name(&self) -> &'static str {
        "PushOnly"
    }

    fn push(&self, request: PageRequest, _animated: bool) -> Result<()> {
        self.pushed.borrow_mut().push(request.component);
        Ok(())
    }

    fn pop_to_navigator(&self, _slot: NavigatorSlot, _animated: bool) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_missing_operations_report_not_implemented() {
    let backend = Rc::new(PushOnly {
        pushed: RefCell::new(Vec::new()),
    });
    let weak: Weak<dyn NavigationBackend> = Rc::downgrade(&(backend.clone() as Rc<dyn NavigationBackend>));
    let navigator = Navigator::new(
        weak,
        NavigatorSlot {
            key: PageKey::next(),
            layer: 0,
            index: 0,
        },
        true,
    );

    navigator.push(page("/a")).unwrap();
    navigator.pop().unwrap();
    assert_eq!(backend.pushed.borrow().len(), 1);

    let err = navigator.present(page("/modal")).unwrap_err();
    assert!(err.is_not_implemented());
    assert_eq!(err, NavigationError::not_implemented("present", "PushOnly"));
    assert!(navigator.pop_to_root().unwrap_err().is_not_implemented());
    assert!(navigator.pop_to_self().unwrap_err().is_not_implemented());
    assert!(navigator.dismiss(false).unwrap_err().is_not_implemented());

    navigator.force_disable_dismissal_gesture(true);
    navigator.set_auto_pop_delay(None);
}
