use super::scheduler::{AutosaveScheduler, Command, Input, TimerSlot};
use super::{FormSubmitter, SaveOutcome};
use crate::api::login_redirect_url;
use crate::config::AutosaveTimings;
use crate::forms::serialize_page_forms;
use crate::state::{FormUiState, SaveStatus};
use crate::util::current_time_display;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;

/// Hidden button the server template renders inside the application form.
const HIDDEN_SUBMIT_ID: &str = "hidden_submit_app";

#[derive(Debug, Default)]
struct TimerHandles {
    start_delay: Option<i32>,
    periodic: Option<i32>,
    periodic_every: Duration,
    pause_delay: Option<i32>,
}

impl TimerHandles {
    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<i32> {
        match slot {
            TimerSlot::StartDelay => &mut self.start_delay,
            TimerSlot::Periodic => &mut self.periodic,
            TimerSlot::PauseDelay => &mut self.pause_delay,
        }
    }
}

/// Browser driver for one autosave session.
///
/// Built once per page. Runs [`AutosaveScheduler`] commands against window
/// timers, forwards window focus/blur/pagehide/pageshow as inputs and publishes save
/// status to [`FormUiState`].
///
/// The periodic slot is a self-rearming `setTimeout`, so every slot holds a
/// single timeout handle and cancelling is always `clearTimeout`.
#[derive(Clone)]
pub(crate) struct AutosaveSession<S> {
    submitter: S,
    user_id: String,
    ui: FormUiState,

    scheduler: Arc<Mutex<AutosaveScheduler>>,
    timers: Arc<Mutex<TimerHandles>>,

    /// Window listeners (keep handles alive).
    _focus_handle: StoredValue<Option<WindowListenerHandle>>,
    _blur_handle: StoredValue<Option<WindowListenerHandle>>,
    _pagehide_handle: StoredValue<Option<WindowListenerHandle>>,
    _pageshow_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl<S> AutosaveSession<S>
where
    S: FormSubmitter + Clone + Send + Sync + 'static,
{
    pub fn start(
        submitter: S,
        user_id: String,
        timings: AutosaveTimings,
        ui: FormUiState,
        first_time: bool,
    ) -> Self {
        let s = Self {
            submitter,
            user_id,
            ui,
            scheduler: Arc::new(Mutex::new(AutosaveScheduler::new(timings))),
            timers: Arc::new(Mutex::new(TimerHandles::default())),
            _focus_handle: StoredValue::new(None),
            _blur_handle: StoredValue::new(None),
            _pagehide_handle: StoredValue::new(None),
            _pageshow_handle: StoredValue::new(None),
        };

        s.start_window_listeners();
        info!(user_id = %s.user_id, "autosave session loaded");
        s.dispatch(Input::Init { first_time });

        s
    }

    pub fn save_now(&self) {
        self.dispatch(Input::SaveRequested { submit: false });
    }

    pub fn save_and_submit(&self) {
        self.dispatch(Input::SaveRequested { submit: true });
    }

    /// User confirmed the conflict prompt: overwrite the other version.
    pub fn force_save(&self) {
        self.ui.conflict_open.set(false);
        self.dispatch(Input::ForceSave);
    }

    pub fn dismiss_conflict(&self) {
        self.ui.conflict_open.set(false);
    }

    fn dispatch(&self, input: Input) {
        let commands = match self.scheduler.lock() {
            Ok(mut scheduler) => scheduler.handle(input),
            Err(_) => {
                warn!("autosave scheduler lock poisoned; input dropped");
                return;
            }
        };

        for command in commands {
            self.run(command);
        }
    }

    fn run(&self, command: Command) {
        match command {
            Command::Arm { slot, after } => self.arm(slot, after),
            Command::Cancel(slot) => self.cancel(slot),
            Command::Save { force, submit } => self.issue_save(force, submit),
            Command::ShowSaved => self
                .ui
                .status
                .set(SaveStatus::Saved(current_time_display())),
            Command::ShowError(text) => self.ui.status.set(SaveStatus::Failed(text)),
            Command::PromptConflict => self.ui.conflict_open.set(true),
            Command::Redirect { login_url } => redirect_to_login(&login_url),
            Command::SubmitForm => click_hidden_submit(),
        }
    }

    fn arm(&self, slot: TimerSlot, after: Duration) {
        let Some(win) = web_sys::window() else {
            return;
        };

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.on_timer_fired(slot);
        });

        let ms = i32::try_from(after.as_millis()).unwrap_or(i32::MAX);
        match win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            ms,
        ) {
            Ok(tid) => {
                if let Ok(mut timers) = self.timers.lock() {
                    *timers.slot_mut(slot) = Some(tid);
                    if slot == TimerSlot::Periodic {
                        timers.periodic_every = after;
                    }
                }
            }
            Err(e) => warn!(?slot, error = ?e, "failed to arm autosave timer"),
        }
    }

    fn cancel(&self, slot: TimerSlot) {
        let handle = match self.timers.lock() {
            Ok(mut timers) => timers.slot_mut(slot).take(),
            Err(_) => None,
        };

        if let (Some(win), Some(tid)) = (web_sys::window(), handle) {
            let _ = win.clear_timeout_with_handle(tid);
        }
    }

    fn on_timer_fired(&self, slot: TimerSlot) {
        let rearm = match self.timers.lock() {
            Ok(mut timers) => {
                timers.slot_mut(slot).take();
                (slot == TimerSlot::Periodic).then_some(timers.periodic_every)
            }
            Err(_) => None,
        };

        if let Some(every) = rearm {
            self.arm(TimerSlot::Periodic, every);
        }
        self.dispatch(slot.elapsed_input());
    }

    fn issue_save(&self, force: bool, submit: bool) {
        let body = serialize_page_forms();
        info!(force, submit, bytes = body.len(), "autosaving");
        self.ui.saving.set(true);

        let s2 = self.clone();
        spawn_local(async move {
            let outcome = match s2.submitter.save(&body, &s2.user_id, force).await {
                Ok(resp) => SaveOutcome::from_response(&resp),
                Err(e) => {
                    warn!(error = %e, "autosave request failed");
                    SaveOutcome::from_transport(&e)
                }
            };
            debug!(?outcome, "autosave finished");

            s2.ui.saving.set(false);
            s2.dispatch(Input::SaveCompleted {
                outcome,
                submit,
                force,
            });
        });
    }

    fn start_window_listeners(&self) {
        let s2 = self.clone();
        let focus = window_event_listener(ev::focus, move |_ev: web_sys::FocusEvent| {
            s2.dispatch(Input::Focus);
        });
        self._focus_handle.set_value(Some(focus));

        let s3 = self.clone();
        let blur = window_event_listener(ev::blur, move |_ev: web_sys::FocusEvent| {
            s3.dispatch(Input::Blur);
        });
        self._blur_handle.set_value(Some(blur));

        // A persisted pagehide means the page may come back from the
        // back/forward cache, so only its timers are dropped.
        let s4 = self.clone();
        let pagehide =
            window_event_listener(ev::pagehide, move |ev: web_sys::PageTransitionEvent| {
                let input = if ev.persisted() {
                    Input::Suspend
                } else {
                    Input::Unload
                };
                s4.dispatch(input);
            });
        self._pagehide_handle.set_value(Some(pagehide));

        let s5 = self.clone();
        let pageshow =
            window_event_listener(ev::pageshow, move |ev: web_sys::PageTransitionEvent| {
                if ev.persisted() {
                    s5.dispatch(Input::Resume);
                }
            });
        self._pageshow_handle.set_value(Some(pageshow));
    }

    /// Slots currently holding a live timeout handle.
    #[cfg(all(test, target_arch = "wasm32"))]
    fn armed_slots(&self) -> Vec<TimerSlot> {
        let Ok(timers) = self.timers.lock() else {
            return vec![];
        };
        [TimerSlot::StartDelay, TimerSlot::Periodic, TimerSlot::PauseDelay]
            .into_iter()
            .filter(|slot| match slot {
                TimerSlot::StartDelay => timers.start_delay.is_some(),
                TimerSlot::Periodic => timers.periodic.is_some(),
                TimerSlot::PauseDelay => timers.pause_delay.is_some(),
            })
            .collect()
    }

    #[cfg(all(test, target_arch = "wasm32"))]
    pub(crate) fn stop(&self) {
        self.dispatch(Input::Unload);
    }
}

fn redirect_to_login(login_url: &str) {
    let Some(win) = web_sys::window() else {
        return;
    };
    let location = win.location();
    let current = location.href().unwrap_or_default();
    let target = login_redirect_url(login_url, &current);

    if let Err(e) = location.set_href(&target) {
        warn!(error = ?e, %target, "login redirect failed");
    }
}

fn click_hidden_submit() {
    let button = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(HIDDEN_SUBMIT_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());

    match button {
        Some(button) => button.click(),
        None => warn!("#{HIDDEN_SUBMIT_ID} not found; cannot submit application"),
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::api::TransportError;
    use crate::autosave::SaveResponse;
    use crate::util::sleep_ms;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Answers every save with a fixed status and records the `force` flags.
    #[derive(Clone)]
    struct FakeSubmitter {
        status: u16,
        calls: Arc<Mutex<Vec<bool>>>,
    }

    impl FakeSubmitter {
        fn answering(status: u16) -> Self {
            Self {
                status,
                calls: Arc::new(Mutex::new(vec![])),
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    impl FormSubmitter for FakeSubmitter {
        async fn save(
            &self,
            _form_body: &str,
            user_id: &str,
            force: bool,
        ) -> Result<SaveResponse, TransportError> {
            assert_eq!(user_id, "tester");
            self.calls.lock().expect("calls").push(force);
            Ok(SaveResponse {
                status: self.status,
                body: String::new(),
            })
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn start(fake: &FakeSubmitter, timings: AutosaveTimings) -> (AutosaveSession<FakeSubmitter>, FormUiState) {
        let _ = leptos::task::Executor::init_wasm_bindgen();
        let ui = FormUiState::new();
        let session = AutosaveSession::start(fake.clone(), "tester".to_string(), timings, ui, false);
        (session, ui)
    }

    #[wasm_bindgen_test]
    async fn test_periodic_timeout_rearms_itself() {
        let fake = FakeSubmitter::answering(200);
        let (session, ui) = start(
            &fake,
            AutosaveTimings {
                save_interval: ms(25),
                start_delay: ms(5),
                pause_delay: ms(1000),
            },
        );
        assert_eq!(session.armed_slots(), vec![TimerSlot::Periodic]);

        sleep_ms(140).await;
        assert!(fake.calls() >= 3, "only {} saves", fake.calls());
        assert_eq!(session.armed_slots(), vec![TimerSlot::Periodic]);
        assert!(matches!(ui.status.get_untracked(), SaveStatus::Saved(_)));
        assert!(!ui.saving.get_untracked());

        session.stop();
        assert!(session.armed_slots().is_empty());
        let after_stop = fake.calls();
        sleep_ms(80).await;
        assert_eq!(fake.calls(), after_stop);
    }

    #[wasm_bindgen_test]
    async fn test_pause_clears_pending_timeout_and_focus_restarts() {
        let fake = FakeSubmitter::answering(200);
        let (session, _ui) = start(
            &fake,
            AutosaveTimings {
                save_interval: ms(60),
                start_delay: ms(5),
                pause_delay: ms(20),
            },
        );

        session.dispatch(Input::Blur);
        assert_eq!(
            session.armed_slots(),
            vec![TimerSlot::Periodic, TimerSlot::PauseDelay]
        );

        sleep_ms(100).await;
        assert!(session.armed_slots().is_empty());
        assert_eq!(fake.calls(), 0, "paused before the first tick");

        session.dispatch(Input::Focus);
        assert_eq!(session.armed_slots(), vec![TimerSlot::Periodic]);
        sleep_ms(90).await;
        assert!(fake.calls() >= 1);

        session.stop();
    }

    #[wasm_bindgen_test]
    async fn test_conflict_leaves_no_timer_armed() {
        let fake = FakeSubmitter::answering(409);
        let (session, ui) = start(
            &fake,
            AutosaveTimings {
                save_interval: ms(20),
                start_delay: ms(5),
                pause_delay: ms(1000),
            },
        );
        session.dispatch(Input::Blur);

        sleep_ms(120).await;
        assert_eq!(fake.calls(), 1);
        assert!(session.armed_slots().is_empty());
        assert!(ui.conflict_open.get_untracked());

        session.force_save();
        sleep_ms(10).await;
        assert_eq!(fake.calls.lock().expect("calls").clone(), vec![false, true]);
        assert!(session.armed_slots().is_empty());
    }

    #[wasm_bindgen_test]
    async fn test_back_forward_cache_round_trip_keeps_saving() {
        let fake = FakeSubmitter::answering(200);
        let (session, _ui) = start(
            &fake,
            AutosaveTimings {
                save_interval: ms(20),
                start_delay: ms(5),
                pause_delay: ms(1000),
            },
        );

        session.dispatch(Input::Suspend);
        assert!(session.armed_slots().is_empty());
        sleep_ms(60).await;
        assert_eq!(fake.calls(), 0);

        session.dispatch(Input::Resume);
        assert_eq!(session.armed_slots(), vec![TimerSlot::Periodic]);
        sleep_ms(70).await;
        assert!(fake.calls() >= 2);

        session.stop();
    }
}
