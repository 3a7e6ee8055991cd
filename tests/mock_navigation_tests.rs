//! Integration tests for the synchronous mock navigation stack

mod common;

use common::{init_logging, page};
use gpui_stack_navigator::*;
use std::rc::Rc;

fn mock_with_root() -> (Rc<MockNavigation>, Navigator) {
    init_logging();
    let nav = MockNavigation::new();
    let root = nav.set_root_page(page("/"));
    (nav, root)
}

fn components(nav: &MockNavigation) -> Vec<String> {
    nav.current_stack()
        .iter()
        .map(|page| page.component.to_string())
        .collect()
}

#[test]
fn test_pop_to_self() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();
    let a = nav.current_page().unwrap().navigator().clone();
    a.push(page("/b")).unwrap();
    a.push(page("/c")).unwrap();
    assert_eq!(nav.current_stack().len(), 4);

    a.pop_to_self().unwrap();

    assert_eq!(components(&nav), ["/", "/a"]);
    assert_eq!(nav.current_component().unwrap(), ComponentPath::new("/a"));
}

#[test]
fn test_pop_to_root() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();
    root.push(page("/b")).unwrap();

    nav.current_page().unwrap().navigator().pop_to_root().unwrap();

    assert_eq!(components(&nav), ["/"]);
    assert_eq!(nav.destroyed_pages().len(), 2);
}

#[test]
fn test_present_and_dismiss_layer() {
    let (nav, root) = mock_with_root();
    root.present(page("/modal")).unwrap();
    let modal = nav.current_page().unwrap();
    assert!(modal.is_modal);
    modal.navigator().push(page("/b")).unwrap();
    modal.navigator().push(page("/c")).unwrap();
    assert_eq!(nav.stacks().len(), 2);
    assert_eq!(components(&nav), ["/modal", "/b", "/c"]);

    nav.current_page().unwrap().navigator().dismiss(true).unwrap();

    assert_eq!(nav.stacks().len(), 1);
    assert_eq!(components(&nav), ["/"]);
}

#[test]
fn test_destroying_root_page_fails() {
    let (nav, root) = mock_with_root();
    let result = nav.destroy_page(root.key());
    assert_eq!(
        result,
        Err(NavigationError::RootPageRemoval { key: root.key() })
    );
    assert_eq!(components(&nav), ["/"]);
}

#[test]
fn test_destroy_page_removes_everything_above() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();
    root.push(page("/b")).unwrap();
    root.present(page("/modal")).unwrap();
    let a = nav.stacks()[0][1].key;

    nav.destroy_page(a).unwrap();

    assert_eq!(nav.stacks().len(), 1);
    assert_eq!(components(&nav), ["/"]);
    assert_eq!(nav.destroyed_pages().len(), 3);
    assert!(nav.destroy_page(a).is_ok());
}

#[test]
fn test_rapid_double_pop() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();
    let a = nav.current_page().unwrap().navigator().clone();

    a.pop().unwrap();
    a.pop().unwrap();

    assert_eq!(components(&nav), ["/"]);
    assert_eq!(nav.destroyed_pages().len(), 1);
}

#[test]
fn test_teardown_order_is_topmost_first() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();
    root.push(page("/b")).unwrap();
    let keys: Vec<PageKey> = nav.current_stack().iter().map(|page| page.key).collect();

    root.pop_to_self().unwrap();

    assert_eq!(nav.destroyed_pages(), vec![keys[2], keys[1]]);
}

#[test]
fn test_root_navigator_requires_root() {
    init_logging();
    let nav = MockNavigation::new();
    assert_eq!(nav.root_navigator(), Err(NavigationError::NoRootPage));
    assert_eq!(nav.current_component(), Err(NavigationError::NoRootPage));
}

#[test]
fn test_set_root_page_replaces_stack() {
    let (nav, root) = mock_with_root();
    root.push(page("/a")).unwrap();

    let new_root = nav.set_root_page(page("/b"));

    assert_eq!(components(&nav), ["/b"]);
    assert_eq!(nav.root_navigator().unwrap(), new_root);
    assert_ne!(new_root, root);
}

#[test]
fn test_mock_pages_carry_payload() {
    let (nav, root) = mock_with_root();
    root.push(
        page("/details/1")
            .view_model(String::from("vm"))
            .context(5i32)
            .title("Details"),
    )
    .unwrap();

    let current = nav.current_page().unwrap();
    assert_eq!(current.title.as_deref(), Some("Details"));
    assert_eq!(current.context.data_as::<i32>(), Some(&5));
    let view_model = current.view_model.unwrap();
    assert_eq!(view_model.downcast_ref::<String>().map(String::as_str), Some("vm"));
}

#[test]
fn test_hooks_do_nothing_on_mock() {
    let (nav, root) = mock_with_root();
    root.force_disable_dismissal_gesture(true);
    root.set_auto_pop_delay(Some(std::time::Duration::from_millis(10)));
    assert_eq!(components(&nav), ["/"]);
}
