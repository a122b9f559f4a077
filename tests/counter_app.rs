// End-to-end tests driving small applications through the in-memory host

use std::collections::HashSet;
use std::rc::Rc;

use jsxless::prelude::*;

fn button() -> Component {
    Component::new("Button", |props, _| {
        let mut attrs = Props::new().with(
            "style",
            StyleMap::new()
                .set("backgroundColor", "#4f46e5")
                .set("borderRadius", "6px"),
        );
        if let Some(on_click) = props.get_handler("onClick") {
            attrs.insert("onClick", on_click.clone());
        }
        attrs.insert("className", props.get("className").cloned());
        create_element(
            "button",
            Some(attrs),
            props.children().iter().cloned().map(ChildInput::from),
        )
        .into()
    })
}

fn counter() -> Component {
    let button = button();
    Component::new("Counter", move |props, hooks| {
        let initial = props.get_number("initialCount").unwrap_or(0.0) as i64;
        let (count, set_count) = hooks.use_state(initial);

        let increment = {
            let (count, set_count) = (count.clone(), set_count.clone());
            handler(move |_| set_count.set(count.get() + 1))
        };
        let decrement = {
            let (count, set_count) = (count.clone(), set_count.clone());
            handler(move |_| set_count.set(count.get() - 1))
        };
        let reset = handler(move |_| set_count.set(initial));

        h!("div", { "className" => "counter" }, [
            h!("h2", { "id" => "display" }, [count.get()]),
            h!("div", { "className" => "buttons" }, [
                h!(button.clone(), { "onClick" => increment }, ["Plus"]),
                h!(button.clone(), { "onClick" => decrement }, ["Minus"]),
                h!(button.clone(), { "onClick" => reset }, ["Reset"]),
            ]),
        ])
        .into()
    })
}

fn find_button(host: &MemoryHost, root: NodeId, label: &str) -> NodeId {
    host.find_by_tag(root, "button")
        .into_iter()
        .find(|b| host.text_content(*b) == label)
        .unwrap_or_else(|| panic!("no button labelled {label}"))
}

fn display(host: &MemoryHost, root: NodeId) -> String {
    let h2 = host.find_by_tag(root, "h2")[0];
    host.text_content(h2)
}

#[test]
fn counter_settles_after_coalesced_rerender() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");

    runtime
        .mount(h!(counter(), { "initialCount" => 0 }), root)
        .unwrap();
    assert_eq!(display(&host, root), "0");

    host.dispatch(find_button(&host, root, "Plus"), "click");
    host.dispatch(find_button(&host, root, "Plus"), "click");
    host.dispatch(find_button(&host, root, "Minus"), "click");

    assert_eq!(display(&host, root), "0");
    assert_eq!(host.run_frame(), 1);

    assert_eq!(display(&host, root), "1");
    assert_eq!(runtime.stats().passes, 2);
}

#[test]
fn counter_reset_and_markup() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");
    runtime
        .mount(h!(counter(), { "initialCount" => 5 }), root)
        .unwrap();

    host.dispatch(find_button(&host, root, "Plus"), "click");
    host.run_frame();
    assert_eq!(display(&host, root), "6");

    host.dispatch(find_button(&host, root, "Reset"), "click");
    host.run_frame();
    assert_eq!(display(&host, root), "5");

    let plus = find_button(&host, root, "Plus");
    assert_eq!(
        host.attribute(plus, "style").as_deref(),
        Some("background-color:#4f46e5;border-radius:6px")
    );
    assert_eq!(host.attribute(plus, "className"), None);
    assert_eq!(host.attribute(plus, "class"), None);
}

#[test]
fn handlers_from_a_discarded_tree_still_update_state() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");
    runtime.mount(h!(counter()), root).unwrap();

    let stale_plus = find_button(&host, root, "Plus");
    host.dispatch(stale_plus, "click");
    host.run_frame();

    // The old button is gone with its listeners.
    assert!(!host.contains(stale_plus));
    assert_eq!(host.dispatch(stale_plus, "click"), 0);
    assert_eq!(display(&host, root), "1");
}

#[test]
fn rerender_replaces_every_node() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");
    runtime.mount(h!(counter()), root).unwrap();

    let before: HashSet<NodeId> = host.descendants(root).into_iter().collect();
    host.dispatch(find_button(&host, root, "Plus"), "click");
    host.run_frame();
    let after = host.descendants(root);

    assert!(!after.is_empty());
    assert!(after.iter().all(|id| !before.contains(id)));
}

#[test]
fn router_switches_pages_with_positional_slots() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());
    let root = host.create_root("app");
    let counter = counter();

    let router = Component::new("Router", move |_, hooks| {
        let (page, set_page) = hooks.use_state("home");
        let go = |target: &'static str| {
            let set_page = set_page.clone();
            handler(move |_| set_page.set(target))
        };
        let content = match page.get() {
            "counter" => h!(counter.clone(), { "initialCount" => 3 }),
            _ => h!("h1", ["JSX Without React"]),
        };
        h!("div", [
            (page.get() != "home").then(|| h!("nav", [h!("a", { "onClick" => go("home") }, ["Home"])])),
            h!("a", { "id" => "to-counter", "onClick" => go("counter") }, ["Counter"]),
            h!("div", [content]),
        ])
        .into()
    });

    runtime.mount(h!(router), root).unwrap();
    assert!(host.find_by_tag(root, "nav").is_empty());
    assert_eq!(runtime.slot_count(), 1);

    let link = host.find_by_id("to-counter").unwrap();
    host.dispatch(link, "click");
    host.run_frame();

    assert_eq!(host.find_by_tag(root, "nav").len(), 1);
    assert_eq!(display(&host, root), "3");
    assert_eq!(runtime.slot_count(), 2);
}

#[test]
fn mounting_into_missing_target_is_fatal() {
    let host = Rc::new(MemoryHost::new());
    let runtime = Runtime::new(host.clone());

    let err = runtime.mount_by_id(h!(counter()), "app").unwrap_err();

    assert_eq!(err.to_string(), "Root target not found: app");
}
