use crate::components::ui::Spinner;
use crate::state::{FormContext, SaveStatus};
use leptos::prelude::*;

/// "Last saved" line. Errors keep a contact link, as they may repeat on
/// every tick until the user reaches out.
#[component]
pub(crate) fn AutosaveStatus() -> impl IntoView {
    let ctx = expect_context::<FormContext>();
    let ui = ctx.ui;
    let support_url = ctx.support_url;

    view! {
        <div class="autosaved text-xs text-muted-foreground" aria-live="polite">
            <Show when=move || ui.saving.get() fallback=|| ().into_view()>
                <span class="inline-flex items-center gap-2">
                    <Spinner />
                    "Saving..."
                </span>
            </Show>
            {move || match ui.status.get() {
                SaveStatus::NotSaved => ().into_any(),
                SaveStatus::Saved(at) => view! { <span>"Last saved: " {at}</span> }.into_any(),
                SaveStatus::Failed(text) => {
                    let href = support_url.clone();
                    view! {
                        <span class="text-destructive">
                            "Error: " {text}
                            <br />
                            "If you are seeing errors repeatedly please "
                            <a class="underline underline-offset-4" href=href>"contact us"</a>
                        </span>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
