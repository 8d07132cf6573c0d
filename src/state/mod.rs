use crate::api::ApiClient;
use crate::autosave::AutosaveSession;
use leptos::prelude::*;

/// What the status line under the form shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SaveStatus {
    #[default]
    NotSaved,
    /// Display time of the last successful save.
    Saved(String),
    Failed(String),
}

/// Reactive page state written by the autosave session.
#[derive(Clone, Copy)]
pub(crate) struct FormUiState {
    pub status: RwSignal<SaveStatus>,
    /// A save request is in flight.
    pub saving: RwSignal<bool>,
    /// Conflict prompt is showing.
    pub conflict_open: RwSignal<bool>,
}

impl FormUiState {
    pub fn new() -> Self {
        Self {
            status: RwSignal::new(SaveStatus::default()),
            saving: RwSignal::new(false),
            conflict_open: RwSignal::new(false),
        }
    }
}

impl Default for FormUiState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct FormContext {
    pub ui: FormUiState,
    pub session: AutosaveSession<ApiClient>,
    pub support_url: String,
}
