//! Domain types for the todo resource.
//!
//! # Design
//! `Todo` is the wire shape and the stored shape at once: the JSON body of
//! every successful response is exactly one `Todo` or a list of them.
//! `TodoPatch` is the decoded form of a partial update. A `None` field means
//! "leave unchanged", never "clear".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single todo item as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub completed: bool,
}

/// Field updates extracted from a form payload. Applied in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Pick the recognized keys out of a decoded form. Unknown keys are ignored.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        Self {
            title: form.get("title").cloned(),
            date: form.get("date").cloned(),
            completed: form.get("completed").map(|v| parse_bool(v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.completed.is_none()
    }
}

/// Lenient boolean literal: `true` in any ASCII case, everything else is false.
pub fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
