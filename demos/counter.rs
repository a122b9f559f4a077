// Counter and router demo driven through the in-memory host
//
// Run with `cargo run --example counter`.

use std::rc::Rc;

use jsxless::prelude::*;

fn counter() -> Component {
    Component::new("Counter", |props, hooks| {
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
            h!("h2", [count.get()]),
            h!("button", { "id" => "plus", "onClick" => increment }, ["+"]),
            h!("button", { "id" => "minus", "onClick" => decrement }, ["-"]),
            h!("button", { "id" => "reset", "onClick" => reset }, ["Reset"]),
        ])
        .into()
    })
}

fn app() -> Component {
    let counter = counter();
    Component::new("App", move |_, hooks| {
        let (page, set_page) = hooks.use_state("home");
        let link = |target: &'static str, label: &'static str| {
            let set_page = set_page.clone();
            h!("a", { "id" => format!("to-{target}"), "onClick" => handler(move |_| set_page.set(target)) }, [label])
        };
        let content = match page.get() {
            "counter" => h!(counter.clone(), { "initialCount" => 10 }),
            _ => h!("p", ["Pick a page above."]),
        };
        h!("main", [
            h!("nav", [link("home", "Home"), link("counter", "Counter")]),
            h!("section", { "style" => StyleMap::new().set("paddingTop", "8px") }, [content]),
        ])
        .into()
    })
}

fn click(host: &MemoryHost, id: &str) -> anyhow::Result<()> {
    let node = host
        .find_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("no element with id {id}"))?;
    host.dispatch(node, "click");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let host = Rc::new(MemoryHost::new());
    host.create_root("app");
    let runtime = Runtime::new(host.clone());

    runtime.mount_by_id(h!(app()), "app")?;
    let root = runtime
        .root()
        .ok_or_else(|| anyhow::anyhow!("runtime is not mounted"))?;
    println!("{}", host.to_html(root));

    click(&host, "to-counter")?;
    host.run_frame();
    println!("{}", host.to_html(root));

    click(&host, "plus")?;
    click(&host, "plus")?;
    click(&host, "minus")?;
    host.run_frame();
    println!("{}", host.to_html(root));

    click(&host, "reset")?;
    host.run_frame();
    println!("{}", host.to_html(root));

    let stats = runtime.stats();
    println!(
        "{} passes, {} frames, {} coalesced requests, {} nodes created",
        stats.passes, stats.frames_requested, stats.coalesced_requests, stats.nodes_created
    );
    Ok(())
}
