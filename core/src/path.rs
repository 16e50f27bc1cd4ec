//! Path classification for the `/todos` resource.
//!
//! All addressing policy lives here: the handler never inspects the raw path,
//! it only matches on `Target`.

/// What a request path remainder addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The whole set of todos.
    Collection,
    /// A single todo by numeric id.
    Item(i64),
    /// Anything unparseable. Always answered with 404.
    Invalid,
}

/// Classify the path remainder after the resource prefix.
///
/// Only `/` followed by one or more ASCII digits addresses an item. An id too
/// large for `i64` cannot name a stored row and classifies as `Invalid`.
pub fn classify(remainder: Option<&str>) -> Target {
    let Some(remainder) = remainder else {
        return Target::Collection;
    };
    let Some(digits) = remainder.strip_prefix('/') else {
        return Target::Invalid;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Target::Invalid;
    }
    digits.parse().map_or(Target::Invalid, Target::Item)
}
