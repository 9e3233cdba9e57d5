//! Macros for concise state construction.

/// Build a tag-list [`State`](crate::core::State).
///
/// # Example
///
/// ```
/// use blindspot::tags;
///
/// let state = tags!["b", "a"];
/// assert_eq!(state.id().as_str(), "a,b");
///
/// let empty = tags![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! tags {
    () => {
        $crate::core::State::empty($crate::core::Representation::Tags)
    };
    ($($tag:expr),+ $(,)?) => {
        $crate::core::State::from_tags([$($tag),+])
    };
}

/// Build a key/value [`State`](crate::core::State). Values accept anything
/// `serde_json::json!` does.
///
/// # Example
///
/// ```
/// use blindspot::resources;
///
/// let state = resources! {
///     "server_status" => "stopped",
///     "user_count" => 0,
/// };
/// assert_eq!(state.id().as_str(), "server_status:\"stopped\",user_count:0");
/// ```
#[macro_export]
macro_rules! resources {
    () => {
        $crate::core::State::empty($crate::core::Representation::Resources)
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::core::State::from_resources([
            $(($key, $crate::__serde_json::json!($value))),+
        ])
    };
}
