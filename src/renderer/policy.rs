//! Property application policy
//!
//! Every `(key, value)` entry of an element's property bag maps to exactly one
//! [`PropAction`]. The mapping is a pure function so it can be audited and
//! tested without a host tree; the renderer only executes the actions.
//!
//! | key / value                       | action                              |
//! |-----------------------------------|-------------------------------------|
//! | `children`, `Null`, `false`       | skip                                |
//! | `ref`                             | attach the created node             |
//! | `on<Event>` with a handler        | listen for `<event>` (lowercased)   |
//! | `className`                       | `class` attribute                   |
//! | `style` string / mapping          | `style` attribute                   |
//! | `true`                            | attribute present, empty value      |
//! | string / number                   | stringified attribute               |
//! | anything else                     | skip                                |

use crate::events::EventHandler;
use crate::vnode::{PropValue, RefTarget, StyleMap, CHILDREN};

/// What to do with one property entry
#[derive(Debug, Clone)]
pub enum PropAction<'a> {
    /// Ignore the entry
    Skip,
    /// Hand the created node to a ref
    Ref(&'a RefTarget),
    /// Register an event listener
    Listen {
        event: String,
        handler: &'a EventHandler,
    },
    /// Write a host attribute
    SetAttribute { name: String, value: String },
}

impl PropAction<'_> {
    fn attribute(name: &str, value: impl Into<String>) -> Self {
        Self::SetAttribute {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Decide how to apply one property entry
pub fn classify<'a>(key: &str, value: &'a PropValue) -> PropAction<'a> {
    if key == CHILDREN {
        return PropAction::Skip;
    }
    match value {
        PropValue::Null | PropValue::Bool(false) => return PropAction::Skip,
        PropValue::Ref(target) if key == "ref" => return PropAction::Ref(target),
        PropValue::Handler(handler) => {
            return match event_name(key) {
                Some(event) => PropAction::Listen { event, handler },
                None => PropAction::Skip,
            };
        }
        _ => {}
    }

    let name = match key {
        "ref" => return PropAction::Skip,
        "className" => "class",
        "style" => {
            return match value {
                PropValue::Str(css) => PropAction::attribute("style", css.as_str()),
                PropValue::Style(map) => PropAction::attribute("style", serialize_style(map)),
                _ => PropAction::Skip,
            };
        }
        other => other,
    };

    match value {
        PropValue::Bool(true) => PropAction::attribute(name, ""),
        PropValue::Str(text) => PropAction::attribute(name, text.as_str()),
        PropValue::Number(n) => PropAction::attribute(name, format_number(*n)),
        _ => PropAction::Skip,
    }
}

/// Event name for an `on<Event>` key, lowercased
pub fn event_name(key: &str) -> Option<String> {
    let suffix = key.strip_prefix("on")?;
    if suffix.is_empty() {
        return None;
    }
    Some(suffix.to_lowercase())
}

/// Convert a camel-case property name to kebab-case
///
/// Every uppercase letter becomes `-` followed by its lowercase form, so
/// `WebkitBackgroundClip` turns into `-webkit-background-clip`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Serialize a style mapping as `key:value` pairs joined by `;`
pub fn serialize_style(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{}:{}", to_kebab_case(property), value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Format a number the way a script engine stringifies it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Scripts switch to exponent form outside [1e-6, 1e21) and sign it.
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}
