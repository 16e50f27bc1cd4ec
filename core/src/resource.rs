//! Per-verb request handling for the `/todos` resource.
//!
//! # Design
//! `Resources` is stateless between requests: it owns only a shared handle to
//! the store and a clock. `handle` classifies the path, dispatches on the
//! verb, and encodes the outcome. The verb methods are public so they can be
//! driven directly without building an `HttpRequest`.
//!
//! Partial updates apply title, then date, then completed, one store call
//! each. The first call that finds no row stops the chain. Fields applied
//! before that point stay applied; a concurrent delete between steps can
//! therefore leave a partially updated row behind a 404.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ResourceError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::path::{classify, Target};
use crate::query::{decode_form, decode_query};
use crate::store::TodoStore;
use crate::types::{Todo, TodoPatch};

/// Source of the creation date stamp.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Local calendar day in `YYYY-MM-DD` form.
pub fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Request handler for the todo collection.
#[derive(Clone)]
pub struct Resources {
    store: Arc<dyn TodoStore>,
    clock: Clock,
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources").finish_non_exhaustive()
    }
}

impl Resources {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self::with_clock(store, Arc::new(today))
    }

    pub fn with_clock(store: Arc<dyn TodoStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Resolve one request.
    ///
    /// Client-facing outcomes (400, 404, 405) come back as `Ok` responses.
    /// `Err` is reserved for store and encoding failures.
    pub fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, ResourceError> {
        let target = classify(request.path.as_deref());
        tracing::debug!(method = %request.method, ?target, "dispatching");

        let outcome = match (&request.method, target) {
            (HttpMethod::Get, Target::Collection) => self.list().and_then(|todos| encode(&todos)),
            (HttpMethod::Get, target) => self.fetch(target).and_then(|todo| encode(&todo)),
            (HttpMethod::Post, target) => self
                .create(target, &creation_fields(request))
                .and_then(|todo| encode(&todo)),
            (HttpMethod::Put, target) => self
                .update(target, &update_fields(request))
                .and_then(|todo| encode(&todo)),
            (HttpMethod::Delete, target) => self.delete(target).and_then(|todo| encode(&todo)),
            (HttpMethod::Other(_), _) => Err(ResourceError::MethodNotAllowed),
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(err) if err.is_internal() => Err(err),
            Err(err) => {
                tracing::debug!(method = %request.method, error = %err, "request rejected");
                Ok(HttpResponse::status(err.status()))
            }
        }
    }

    /// Every todo, ordered by id.
    pub fn list(&self) -> Result<Vec<Todo>, ResourceError> {
        Ok(self.store.get_all()?)
    }

    pub fn fetch(&self, target: Target) -> Result<Todo, ResourceError> {
        let Target::Item(id) = target else {
            return Err(ResourceError::NotFound);
        };
        self.store.get(id)?.ok_or(ResourceError::NotFound)
    }

    /// Create a todo from form fields. Requires `title`; `date` and
    /// `completed` are always server-assigned.
    pub fn create(
        &self,
        target: Target,
        form: &HashMap<String, String>,
    ) -> Result<Todo, ResourceError> {
        match target {
            Target::Collection => {}
            Target::Item(_) => return Err(ResourceError::MethodNotAllowed),
            Target::Invalid => return Err(ResourceError::NotFound),
        }
        let title = form
            .get("title")
            .ok_or(ResourceError::BadRequest { field: "title" })?;

        let date = (self.clock)();
        let todo = self.store.create(title, &date, false)?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Apply a partial update and return the row as it stands afterwards.
    pub fn update(
        &self,
        target: Target,
        form: &HashMap<String, String>,
    ) -> Result<Todo, ResourceError> {
        let Target::Item(id) = target else {
            return Err(ResourceError::NotFound);
        };
        let patch = TodoPatch::from_form(form);

        let mut exists = true;
        if let Some(title) = &patch.title {
            exists = self.store.update_title(id, title)?;
        }
        if exists {
            if let Some(date) = &patch.date {
                exists = self.store.update_date(id, date)?;
            }
        }
        if exists {
            if let Some(completed) = patch.completed {
                exists = self.store.update_completed(id, completed)?;
            }
        }
        if !exists {
            return Err(ResourceError::NotFound);
        }

        // An empty patch touches nothing, so existence is only settled here.
        self.store.get(id)?.ok_or(ResourceError::NotFound)
    }

    /// Remove a todo and return it as it was just before removal.
    pub fn delete(&self, target: Target) -> Result<Todo, ResourceError> {
        let snapshot = self.fetch(target)?;
        self.store.delete(snapshot.id)?;
        tracing::info!(id = snapshot.id, "todo deleted");
        Ok(snapshot)
    }
}

/// Parameters for create: URI query first, then the form body. A key present
/// in both keeps its query value.
fn creation_fields(request: &HttpRequest) -> HashMap<String, String> {
    let mut fields = decode_form(request.query.as_deref());
    let body = request.body.trim_end_matches(['\r', '\n']);
    for (key, value) in decode_form(Some(body)) {
        fields.entry(key).or_insert(value);
    }
    fields
}

/// Fields for update: the first line of the body only. The URI query is
/// ignored.
fn update_fields(request: &HttpRequest) -> HashMap<String, String> {
    decode_query(request.body.lines().next())
}

fn encode<T: Serialize>(value: &T) -> Result<HttpResponse, ResourceError> {
    Ok(HttpResponse::json(serde_json::to_string(value)?))
}
