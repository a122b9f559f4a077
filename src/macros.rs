//! Construction macros standing in for JSX call-expression desugaring
//!
//! ```
//! use jsxless::{children, h, props};
//!
//! let node = h!("ul", { "className" => "list" }, [
//!     h!("li", ["first"]),
//!     children![None::<&str>, "second"],
//! ]);
//! assert_eq!(node.children().len(), 2);
//! ```

/// Build a `Vec<ChildInput>` from heterogeneous child expressions
#[macro_export]
macro_rules! children {
    () => {
        ::std::vec::Vec::<$crate::vnode::ChildInput>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::vnode::ChildInput::from($child)),+]
    };
}

/// Build a `Props` bag from `key => value` pairs
#[macro_export]
macro_rules! props {
    () => {
        $crate::vnode::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::vnode::Props::new();
        $(props.insert($key, $value);)+
        props
    }};
}

/// Shorthand for `create_element(type, props, children)`
#[macro_export]
macro_rules! h {
    ($ty:expr $(,)?) => {
        $crate::vnode::create_element($ty, ::std::option::Option::None, $crate::children![])
    };
    ($ty:expr, [$($child:expr),* $(,)?] $(,)?) => {
        $crate::vnode::create_element(
            $ty,
            ::std::option::Option::None,
            $crate::children![$($child),*],
        )
    };
    ($ty:expr, {$($key:expr => $value:expr),* $(,)?} $(,)?) => {
        $crate::vnode::create_element(
            $ty,
            ::std::option::Option::Some($crate::props!{$($key => $value),*}),
            $crate::children![],
        )
    };
    ($ty:expr, {$($key:expr => $value:expr),* $(,)?}, [$($child:expr),* $(,)?] $(,)?) => {
        $crate::vnode::create_element(
            $ty,
            ::std::option::Option::Some($crate::props!{$($key => $value),*}),
            $crate::children![$($child),*],
        )
    };
}
