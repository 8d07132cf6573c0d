pub(crate) mod autosave_status;
pub(crate) mod conflict_prompt;
pub(crate) mod submit_controls;
pub(crate) mod ui;

pub(crate) use autosave_status::AutosaveStatus;
pub(crate) use conflict_prompt::ConflictPrompt;
pub(crate) use submit_controls::SubmitControls;
