use crate::api::ApiClient;
use crate::autosave::AutosaveSession;
use crate::components::{AutosaveStatus, ConflictPrompt, SubmitControls};
use crate::config::PageConfig;
use crate::state::{FormContext, FormUiState};
use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen::JsCast;

#[component]
pub(crate) fn App(config: PageConfig) -> impl IntoView {
    let ui = FormUiState::new();
    let client = ApiClient::new(config.resolved_base_url(), config.endpoints());
    let session = AutosaveSession::start(
        client,
        config.resolved_user_id(),
        config.timings(),
        ui,
        config.first_time,
    );

    provide_context(FormContext {
        ui,
        session,
        support_url: config.support_url(),
    });

    view! {
        <div class="flex flex-col gap-3">
            <ConflictPrompt />
            <AutosaveStatus />
            <SubmitControls />
        </div>
    }
}

/// Mount the form tools into the server-rendered page.
///
/// Pages without the mount point get no autosave (read-only views).
pub(crate) fn mount(config: PageConfig) {
    let mount_id = config.mount_id().to_string();
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&mount_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());

    let Some(root) = root else {
        warn!(%mount_id, "mount point not found; autosave disabled");
        return;
    };

    info!(%mount_id, prefix = %config.url_prefix, "mounting grant form tools");
    // Lives as long as the page.
    leptos::mount::mount_to(root, move || view! { <App config=config /> }).forget();
}
