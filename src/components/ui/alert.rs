use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-md border px-4 py-3 text-sm"}
    clx! {AlertTitle, h4, "mb-1 font-medium leading-none"}
    clx! {AlertDescription, p, "text-sm [&_a]:underline [&_a]:underline-offset-4"}
}

pub use components::*;
