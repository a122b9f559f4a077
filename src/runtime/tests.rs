//! Tests for mounting and coalesced re-rendering

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::host::{Host, HostError, MemoryHost, NodeId};
use crate::runtime::{Runtime, RuntimeConfig};
use crate::state::{HookError, StateSetter};
use crate::vnode::{Child, Component};
use crate::{h, Error};

type Setters = Rc<RefCell<Vec<StateSetter<i32>>>>;

/// Three independent counters rendered as `a,b,c` into a `<p>`
fn triple(setters: &Setters) -> Component {
    let setters = setters.clone();
    Component::new("Triple", move |_, hooks| {
        let (a, set_a) = hooks.use_state(0);
        let (b, set_b) = hooks.use_state(0);
        let (c, set_c) = hooks.use_state(0);
        *setters.borrow_mut() = vec![set_a, set_b, set_c];
        h!("p", [format!("{},{},{}", a.get(), b.get(), c.get())]).into()
    })
}

fn setup() -> (Rc<MemoryHost>, Runtime, NodeId) {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");
    (host, runtime, root)
}

#[test]
fn test_mount_renders_synchronously() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();

    runtime.mount(h!(triple(&setters)), root).unwrap();

    assert_eq!(host.text_content(root), "0,0,0");
    assert!(runtime.is_mounted());
    assert_eq!(runtime.root(), Some(root));
    assert_eq!(runtime.slot_count(), 3);
    assert_eq!(runtime.stats().passes, 1);
    assert_eq!(host.pending_frames(), 0);
}

#[test]
fn test_mount_clears_existing_content() {
    let (host, runtime, root) = setup();
    let stale = host.create_text("loading...");
    host.append_child(root, stale);

    runtime.mount(h!("main", ["ready"]), root).unwrap();

    assert_eq!(host.text_content(root), "ready");
    assert!(!host.contains(stale));
}

#[test]
fn test_mount_into_missing_root_fails() {
    let (_host, runtime, _root) = setup();

    let result = runtime.mount(h!("div"), NodeId::new(9_999));

    assert!(matches!(result, Err(Error::RootNotFound(_))));
    assert!(!runtime.is_mounted());
}

#[test]
fn test_mount_by_id() {
    let (host, runtime, root) = setup();

    runtime.mount_by_id(h!("div", ["hi"]), "app").unwrap();
    assert_eq!(host.text_content(root), "hi");

    let missing = runtime.mount_by_id(h!("div"), "nope");
    assert!(matches!(missing, Err(Error::RootNotFound(id)) if id == "nope"));
}

#[test]
fn test_setters_coalesce_into_one_pass() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    runtime.mount(h!(triple(&setters)), root).unwrap();

    {
        let s = setters.borrow().clone();
        s[0].set(1);
        s[1].set(2);
        s[2].set(3);
    }

    assert_eq!(host.text_content(root), "0,0,0");
    assert!(runtime.is_render_pending());
    assert_eq!(host.pending_frames(), 1);

    host.run_frame();

    assert_eq!(host.text_content(root), "1,2,3");
    let stats = runtime.stats();
    assert_eq!(stats.passes, 2);
    assert_eq!(stats.frames_requested, 1);
    assert_eq!(stats.coalesced_requests, 2);
}

#[test]
fn test_last_write_per_slot_wins() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    runtime.mount(h!(triple(&setters)), root).unwrap();

    let s = setters.borrow().clone();
    s[1].set(5);
    s[1].set(7);
    host.run_frame();

    assert_eq!(host.text_content(root), "0,7,0");
}

#[test]
fn test_state_survives_many_rerenders() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    runtime.mount(h!(triple(&setters)), root).unwrap();

    for n in 1..=5 {
        let set_c = setters.borrow()[2].clone();
        set_c.set(n * 10);
        host.run_frame();
        assert_eq!(host.text_content(root), format!("0,0,{}", n * 10));
    }
    assert_eq!(runtime.stats().passes, 6);
    assert_eq!(runtime.slot_count(), 3);
}

#[test]
fn test_rerender_rebuilds_every_node() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    let tree = h!("section", [h!("h1", ["title"]), h!(triple(&setters)), 3]);
    runtime.mount(tree, root).unwrap();

    let before: HashSet<NodeId> = host.descendants(root).into_iter().collect();
    let newest_before = before.iter().max().copied().unwrap();

    runtime.rerender().unwrap();

    let after = host.descendants(root);
    assert_eq!(after.len(), before.len());
    assert!(after.iter().all(|id| !before.contains(id)));
    assert!(after.iter().all(|id| *id > newest_before));
    assert!(before.iter().all(|id| !host.contains(*id)));
}

#[test]
fn test_rerender_before_mount_is_noop() {
    let (_host, runtime, _root) = setup();

    runtime.rerender().unwrap();

    assert_eq!(runtime.stats().passes, 0);
}

#[test]
fn test_scheduled_render_without_state_change() {
    let (host, runtime, root) = setup();
    runtime.mount(h!("div", ["static"]), root).unwrap();

    runtime.schedule_render();
    runtime.schedule_render();
    assert_eq!(host.run_frame(), 1);

    assert_eq!(runtime.stats().passes, 2);
    assert_eq!(host.text_content(root), "static");
}

#[test]
fn test_remount_keeps_hook_slots() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    runtime.mount(h!(triple(&setters)), root).unwrap();
    let set_a = setters.borrow()[0].clone();
    set_a.set(4);

    runtime.mount(h!(triple(&setters)), root).unwrap();

    assert_eq!(host.text_content(root), "4,0,0");
}

#[test]
fn test_setter_during_render_books_one_more_frame() {
    let (host, runtime, root) = setup();
    let passes = Rc::new(RefCell::new(0));

    let seen = passes.clone();
    let settle = Component::new("Settle", move |_, hooks| {
        let (n, set_n) = hooks.use_state(0_u32);
        *seen.borrow_mut() += 1;
        if n.get() < 2 {
            set_n.set(n.get() + 1);
            set_n.set(n.get() + 1);
        }
        Child::from(n.get())
    });
    runtime.mount(h!(settle), root).unwrap();

    assert_eq!(host.pending_frames(), 1);
    host.run_frame();
    assert_eq!(host.pending_frames(), 1);
    host.run_frame();
    assert_eq!(host.pending_frames(), 0);

    assert_eq!(host.text_content(root), "2");
    assert_eq!(*passes.borrow(), 3);
}

#[test]
fn test_frame_after_runtime_drop_is_noop() {
    let (host, runtime, root) = setup();
    let setters = Setters::default();
    runtime.mount(h!(triple(&setters)), root).unwrap();
    let set_a = setters.borrow()[0].clone();
    set_a.set(1);
    drop(runtime);

    assert_eq!(host.run_frame(), 1);
    assert_eq!(host.text_content(root), "0,0,0");
}

#[test]
fn test_render_errors_are_returned_from_mount() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::with_config(host.clone(), RuntimeConfig::new().with_max_depth(2));
    let root = host.create_root("app");

    let result = runtime.mount(h!("a", [h!("b", [h!("c", [h!("d")])])]), root);

    assert!(matches!(result, Err(Error::DepthExceeded { limit: 2 })));
}

#[test]
fn test_failed_mounts_leave_no_host_nodes_behind() {
    let (host, runtime, root) = setup();
    let before = host.node_count();

    for _ in 0..3 {
        let tree = h!("div", [h!("p", ["x"]), h!("bad tag")]);
        let result = runtime.mount(tree, root);
        assert!(matches!(result, Err(Error::Host(HostError::InvalidTag(_)))));
    }

    assert_eq!(host.node_count(), before);
    assert!(host.children(root).is_empty());
    assert_eq!(runtime.stats().passes, 0);
}

#[test]
fn test_hook_failure_fails_the_rerender() {
    let (host, runtime, root) = setup();
    let swapped = Rc::new(Cell::new(false));

    let flag = swapped.clone();
    let widget = Component::new("Widget", move |_, hooks| {
        if flag.get() {
            match hooks.try_use_state(String::new()) {
                Ok((label, _)) => Child::from(label.get()),
                Err(_) => Child::from("unavailable"),
            }
        } else {
            let (n, _) = hooks.use_state(0_i32);
            Child::from(n.get())
        }
    });
    runtime
        .mount(h!("main", [h!("h1", ["title"]), h!(widget)]), root)
        .unwrap();
    assert_eq!(host.text_content(root), "title0");

    swapped.set(true);
    let result = runtime.rerender();

    assert!(matches!(
        result,
        Err(Error::Hook(HookError::TypeMismatch { index: 0, .. }))
    ));
    assert_eq!(host.node_count(), 1);
    assert_eq!(runtime.stats().passes, 1);
}
