mod outcome;
mod scheduler;
mod session;

use crate::api::TransportError;

pub(crate) use outcome::{SaveOutcome, SaveResponse};
pub(crate) use session::AutosaveSession;

/// Performs the actual save request for an autosave session.
///
/// Implementations return the raw status and body; classification is done by
/// the session. A `TransportError` means no status was received at all.
pub(crate) trait FormSubmitter {
    async fn save(
        &self,
        form_body: &str,
        user_id: &str,
        force: bool,
    ) -> Result<SaveResponse, TransportError>;
}
