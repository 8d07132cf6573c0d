use crate::components::ui::{Alert, AlertDescription, AlertTitle, Button, ButtonSize, ButtonVariant};
use crate::state::FormContext;
use leptos::ev;
use leptos::prelude::*;

/// Shown after a 409. Autosave stays stopped until the user decides.
#[component]
pub(crate) fn ConflictPrompt() -> impl IntoView {
    let ctx = expect_context::<FormContext>();
    let open = ctx.ui.conflict_open;
    // Copy handle: the prompt body is rebuilt every time it opens.
    let session = StoredValue::new(ctx.session);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <Alert class="border-destructive/30" attr:role="alertdialog">
                <AlertTitle>"This form was saved from another window"</AlertTitle>
                <AlertDescription>
                    "Someone else (or you, in another tab) saved changes since this page loaded. "
                    "Autosave is paused. Saving now will overwrite those changes."
                </AlertDescription>
                <div class="mt-3 flex gap-2">
                    <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=move |_: ev::MouseEvent| session.with_value(|s| s.force_save())>
                        "Save anyway"
                    </Button>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_: ev::MouseEvent| session.with_value(|s| s.dismiss_conflict())>
                        "Cancel"
                    </Button>
                </div>
            </Alert>
        </Show>
    }
}
