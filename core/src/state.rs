//! Local mirror of the todo collection with optimistic updates.
//!
//! # Overview
//! `TodoState` is the client-side model behind a todo list UI. Like
//! [`TodoClient`], it never performs I/O: every action that needs the server
//! returns an [`HttpRequest`] (or a [`PendingUpdate`] carrying one), and the
//! host hands the outcome of that request back to a `finish_*` method.
//!
//! # Reconciliation
//! - Create is pessimistic: the todo is appended only once the server returns
//!   it with its assigned id.
//! - Toggle and title edits are optimistic: the local change is applied when
//!   the request is built, and rolled back if the request fails.
//! - Every optimistic mutation takes a per-todo revision. A response is
//!   stale while a newer mutation of the same todo is still in flight, or
//!   once a newer one has been confirmed: a stale success is dropped and a
//!   stale failure only reports its error.
//! - While a todo has mutations in flight, its last server-confirmed value
//!   is kept as a baseline. A failure that is not stale restores the
//!   baseline, so overlapping mutations that all fail leave the todo as the
//!   server holds it.
//! - A rollback restores the whole pre-mutation snapshot when nothing else
//!   touched the collection in the meantime and the snapshot still matches
//!   the baseline. Otherwise only the affected todo is restored.
//!
//! # Edit mode
//! A single optional [`EditDraft`] slot models the `Viewing`/`Editing`
//! states. `start_edit` enters `Editing`; `cancel_edit` and a submitted
//! `save_edit` return to `Viewing`; a failed save re-enters `Editing` with
//! the todo's original title as the draft.

use std::collections::HashMap;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

const EMPTY_TITLE: &str = "Title cannot be empty";

/// The single client-wide edit slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: TodoId,
    pub title: String,
}

/// How a finished request was folded into local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The server's representation was applied.
    Confirmed,
    /// The request succeeded but the returned title differed from the one
    /// submitted, so the optimistic value was left in place.
    KeptOptimistic,
    /// The request failed and the optimistic change was undone.
    RolledBack,
    /// The request failed; nothing had been applied optimistically.
    Failed,
    /// A newer mutation of the same todo was issued after this one.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mutation {
    Toggle,
    Rename { draft: String, original: String },
}

/// An in-flight optimistic update.
///
/// Execute `request`, then pass this value back to
/// [`TodoState::finish_update`] together with the outcome.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub request: HttpRequest,
    id: TodoId,
    revision: u64,
    /// Value of `TodoState::changes` right after the optimistic write.
    changes: u64,
    snapshot: Vec<Todo>,
    mutation: Mutation,
}

impl PendingUpdate {
    pub fn todo_id(&self) -> TodoId {
        self.id
    }
}

/// Bookkeeping for a todo with unsettled mutations.
#[derive(Debug, Clone)]
struct InFlight {
    /// Last value the server is known to hold.
    baseline: Todo,
    /// Revision whose response produced `baseline`; 0 if it predates them all.
    confirmed: u64,
    revisions: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoState {
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
    input: String,
    editing: Option<EditDraft>,
    in_flight: HashMap<TodoId, InFlight>,
    next_revision: u64,
    /// Bumped on every write to `todos`.
    changes: u64,
}

impl TodoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.editing.as_ref().is_some_and(|draft| draft.id == id)
    }

    // --- load ---

    /// Mark the collection as loading and return the List request.
    pub fn begin_load(&mut self, client: &TodoClient) -> HttpRequest {
        self.loading = true;
        client.build_list_todos()
    }

    pub fn finish_load(
        &mut self,
        client: &TodoClient,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Settlement {
        self.loading = false;
        match outcome.and_then(|response| client.parse_list_todos(response)) {
            Ok(todos) => {
                for todo in &todos {
                    if let Some(flight) = self.in_flight.get_mut(&todo.id) {
                        flight.baseline = todo.clone();
                    }
                }
                self.replace_todos(todos);
                self.error = None;
                Settlement::Confirmed
            }
            Err(err) => {
                self.fail(&err);
                Settlement::Failed
            }
        }
    }

    // --- create ---

    /// Build the Create request for the current input.
    ///
    /// Returns `None` without touching the network when the input is blank.
    pub fn submit_create(&mut self, client: &TodoClient) -> Option<HttpRequest> {
        let title = self.input.trim();
        if title.is_empty() {
            self.error = Some(EMPTY_TITLE.to_string());
            return None;
        }
        let input = CreateTodo {
            title: title.to_string(),
        };
        match client.build_create_todo(&input) {
            Ok(request) => Some(request),
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    pub fn finish_create(
        &mut self,
        client: &TodoClient,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Settlement {
        match outcome.and_then(|response| client.parse_create_todo(response)) {
            Ok(todo) => {
                self.todos.push(todo);
                self.changes += 1;
                self.input.clear();
                self.error = None;
                Settlement::Confirmed
            }
            Err(err) => {
                self.fail(&err);
                Settlement::Failed
            }
        }
    }

    // --- toggle ---

    /// Flip `completed` locally and return the Update request for it.
    ///
    /// Returns `None` when `id` is not in the local collection.
    pub fn begin_toggle(&mut self, client: &TodoClient, id: TodoId) -> Option<PendingUpdate> {
        let snapshot = self.todos.clone();
        let completed = !self.find(id)?.completed;
        let patch = UpdateTodo {
            title: None,
            completed: Some(completed),
        };
        let request = self.build_update(client, id, &patch)?;

        self.apply(id, |todo| todo.completed = completed);
        Some(self.track(id, request, snapshot, Mutation::Toggle))
    }

    // --- edit ---

    /// Enter edit mode for `id` with its current title as the draft.
    ///
    /// Replaces any other draft in progress. Returns `false` when `id` is
    /// not in the local collection.
    pub fn start_edit(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.find(id) else {
            return false;
        };
        self.editing = Some(EditDraft {
            id,
            title: todo.title.clone(),
        });
        true
    }

    pub fn set_draft(&mut self, title: impl Into<String>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.title = title.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the current draft.
    ///
    /// A blank draft is rejected locally and edit mode stays active.
    /// Otherwise the title is rewritten optimistically, edit mode ends and
    /// the Update request carrying only `title` is returned.
    pub fn save_edit(&mut self, client: &TodoClient) -> Option<PendingUpdate> {
        let draft = self.editing.as_ref()?;
        let id = draft.id;
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            self.error = Some(EMPTY_TITLE.to_string());
            return None;
        }
        let Some(original) = self.find(id).map(|todo| todo.title.clone()) else {
            self.editing = None;
            return None;
        };

        let snapshot = self.todos.clone();
        let patch = UpdateTodo {
            title: Some(title.clone()),
            completed: None,
        };
        let request = self.build_update(client, id, &patch)?;

        self.apply(id, |todo| todo.title = title.clone());
        self.editing = None;
        let mutation = Mutation::Rename {
            draft: title,
            original,
        };
        Some(self.track(id, request, snapshot, mutation))
    }

    // --- settle ---

    /// Fold the outcome of a toggle or title edit into local state.
    pub fn finish_update(
        &mut self,
        client: &TodoClient,
        pending: PendingUpdate,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Settlement {
        let result = outcome.and_then(|response| client.parse_update_todo(response));

        let (stale, baseline) = match self.in_flight.get_mut(&pending.id) {
            Some(flight) => {
                flight.revisions.retain(|&revision| revision != pending.revision);
                if let Ok(todo) = &result {
                    if pending.revision > flight.confirmed {
                        flight.baseline = todo.clone();
                        flight.confirmed = pending.revision;
                    }
                }
                let superseded = flight.confirmed > pending.revision
                    || flight.revisions.iter().any(|&revision| revision > pending.revision);
                (superseded, Some(flight.baseline.clone()))
            }
            None => (false, None),
        };
        if self.in_flight.get(&pending.id).is_some_and(|flight| flight.revisions.is_empty()) {
            self.in_flight.remove(&pending.id);
        }

        match result {
            Ok(_) if stale => {
                tracing::debug!(id = pending.id, revision = pending.revision, "dropping stale update response");
                Settlement::Stale
            }
            Ok(todo) => {
                self.error = None;
                match &pending.mutation {
                    Mutation::Rename { draft, .. } if todo.title != *draft => {
                        tracing::warn!(
                            id = pending.id,
                            submitted = %draft,
                            returned = %todo.title,
                            "server returned a different title, keeping local value"
                        );
                        Settlement::KeptOptimistic
                    }
                    _ => {
                        self.apply(pending.id, |local| *local = todo);
                        Settlement::Confirmed
                    }
                }
            }
            Err(err) if stale => {
                tracing::debug!(id = pending.id, error = %err, "stale update failed, newer change kept");
                self.fail(&err);
                Settlement::Stale
            }
            Err(err) => {
                self.rollback(&pending, baseline);
                if let Mutation::Rename { original, .. } = &pending.mutation {
                    if self.editing.is_none() {
                        self.editing = Some(EditDraft {
                            id: pending.id,
                            title: original.clone(),
                        });
                    }
                }
                self.fail(&err);
                Settlement::RolledBack
            }
        }
    }

    /// Undo a failed mutation that no newer mutation of the same todo owns.
    fn rollback(&mut self, pending: &PendingUpdate, baseline: Option<Todo>) {
        let before = pending.snapshot.iter().find(|todo| todo.id == pending.id);
        let baseline = baseline.or_else(|| before.cloned());
        if self.changes == pending.changes && before == baseline.as_ref() {
            tracing::debug!(id = pending.id, "rolling back to snapshot");
            self.replace_todos(pending.snapshot.clone());
            return;
        }
        tracing::debug!(id = pending.id, "restoring last confirmed value");
        if let Some(baseline) = baseline {
            self.apply(pending.id, |local| *local = baseline);
        }
    }

    // --- helpers ---

    fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn apply(&mut self, id: TodoId, change: impl FnOnce(&mut Todo)) {
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) {
            change(todo);
            self.changes += 1;
        }
    }

    fn replace_todos(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.changes += 1;
    }

    fn build_update(&mut self, client: &TodoClient, id: TodoId, patch: &UpdateTodo) -> Option<HttpRequest> {
        match client.build_update_todo(id, patch) {
            Ok(request) => Some(request),
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    fn track(
        &mut self,
        id: TodoId,
        request: HttpRequest,
        snapshot: Vec<Todo>,
        mutation: Mutation,
    ) -> PendingUpdate {
        self.next_revision += 1;
        let revision = self.next_revision;
        if let Some(before) = snapshot.iter().find(|todo| todo.id == id) {
            self.in_flight
                .entry(id)
                .or_insert_with(|| InFlight {
                    baseline: before.clone(),
                    confirmed: 0,
                    revisions: Vec::new(),
                })
                .revisions
                .push(revision);
        }
        PendingUpdate {
            request,
            id,
            revision,
            changes: self.changes,
            snapshot,
            mutation,
        }
    }

    fn fail(&mut self, err: &ApiError) {
        self.error = Some(err.to_string());
    }
}
