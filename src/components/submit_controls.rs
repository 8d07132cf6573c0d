use crate::components::ui::{Button, ButtonVariant};
use crate::state::FormContext;
use leptos::ev;
use leptos::prelude::*;

/// Manual save, and save-then-submit. Submission goes through the server
/// form's hidden submit button once the save succeeds.
#[component]
pub(crate) fn SubmitControls() -> impl IntoView {
    let ctx = expect_context::<FormContext>();
    let saving = ctx.ui.saving;
    let on_save = {
        let session = ctx.session.clone();
        move |_: ev::MouseEvent| session.save_now()
    };
    let on_submit = {
        let session = ctx.session.clone();
        move |_: ev::MouseEvent| session.save_and_submit()
    };

    view! {
        <div class="flex gap-2">
            <Button variant=ButtonVariant::Outline attr:disabled=move || saving.get() on:click=on_save>
                "Save draft"
            </Button>
            <Button attr:disabled=move || saving.get() on:click=on_submit>
                "Submit application"
            </Button>
        </div>
    }
}
