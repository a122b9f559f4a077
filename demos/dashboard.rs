// Live dashboard fed by a random producer
//
// Each tick pushes a batch of readings through state setters; the batch is
// painted by a single frame. Run with `cargo run --example dashboard`.

use std::cell::RefCell;
use std::rc::Rc;

use jsxless::prelude::*;
use rand::Rng;

const SENSORS: [&str; 3] = ["cpu", "memory", "network"];
const TICKS: usize = 5;

type Feeds = Rc<RefCell<Vec<StateSetter<f64>>>>;

fn gauge(label: &'static str, value: f64) -> VirtualNode {
    let width = format!("{}%", value.round());
    h!("li", [
        h!("span", [label]),
        h!("div", { "style" => StyleMap::new().set("width", width.as_str()) }),
        h!("b", [value.round()]),
    ])
}

fn dashboard(feeds: &Feeds) -> Component {
    let feeds = feeds.clone();
    Component::new("Dashboard", move |_, hooks| {
        let mut setters = Vec::new();
        let mut rows = Vec::new();
        for label in SENSORS {
            let (value, set_value) = hooks.use_state(0.0_f64);
            setters.push(set_value);
            rows.push(gauge(label, value.get()));
        }
        *feeds.borrow_mut() = setters;
        h!("ul", { "className" => "dashboard" }, [rows]).into()
    })
}

fn main() -> anyhow::Result<()> {
    let host = Rc::new(MemoryHost::new());
    let root = host.create_root("dashboard");
    let runtime = Runtime::with_config(host.clone(), RuntimeConfig::from_json(r#"{"max_depth": 64}"#)?);
    let feeds = Feeds::default();

    runtime.mount(h!(dashboard(&feeds)), root)?;

    let mut rng = rand::thread_rng();
    for tick in 1..=TICKS {
        let setters = feeds.borrow().clone();
        for set_value in &setters {
            set_value.set(rng.gen_range(0.0..100.0));
        }
        let frames = host.run_frame();
        println!("tick {tick} ({frames} frame): {}", host.text_content(root));
    }

    println!("{}", host.to_html(root));
    let stats = runtime.stats();
    println!(
        "{} passes for {} setter calls",
        stats.passes,
        TICKS * SENSORS.len()
    );
    Ok(())
}
