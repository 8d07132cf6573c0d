mod api;
mod app;
mod autosave;
mod components;
mod config;
mod forms;
mod state;
mod util;

use crate::config::PageConfig;
use tracing::{debug, warn};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    // Word counters work on any form page, with or without autosave.
    let counters = forms::attach_word_counters();
    debug!(counters, "form page scripted");

    match PageConfig::load() {
        Ok(config) => app::mount(config),
        Err(e) => warn!(error = %e, "no grant form config; autosave disabled"),
    }
}
