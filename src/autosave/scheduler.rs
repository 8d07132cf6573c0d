use super::outcome::SaveOutcome;
use crate::config::AutosaveTimings;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why automatic saving stopped for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HaltReason {
    /// Another editor saved in between; waiting on the user.
    Conflict,
    /// Login expired; the page is being redirected.
    AuthExpired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// No timers running.
    Idle,
    /// Initial delay pending after a first-time init.
    Starting,
    /// Periodic timer running.
    Scheduled,
    /// Page stayed unfocused past the pause delay; no timers running.
    Paused,
    Halted(HaltReason),
}

/// The three timers a session can hold. Each slot is armed at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TimerSlot {
    StartDelay,
    /// Repeats until cancelled.
    Periodic,
    PauseDelay,
}

impl TimerSlot {
    /// Input the driver feeds back when this slot fires.
    pub(crate) fn elapsed_input(self) -> Input {
        match self {
            TimerSlot::StartDelay => Input::StartDelayElapsed,
            TimerSlot::Periodic => Input::Tick,
            TimerSlot::PauseDelay => Input::PauseDelayElapsed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Init { first_time: bool },
    Focus,
    Blur,
    StartDelayElapsed,
    PauseDelayElapsed,
    Tick,
    /// User asked for a save, optionally followed by submitting the form.
    SaveRequested { submit: bool },
    /// User confirmed overwriting a conflicting version.
    ForceSave,
    SaveCompleted {
        outcome: SaveOutcome,
        submit: bool,
        force: bool,
    },
    /// Page went into the back/forward cache.
    Suspend,
    /// Page came back out of the back/forward cache.
    Resume,
    Unload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Arm { slot: TimerSlot, after: Duration },
    Cancel(TimerSlot),
    Save { force: bool, submit: bool },
    ShowSaved,
    ShowError(String),
    PromptConflict,
    Redirect { login_url: String },
    SubmitForm,
}

/// Autosave state machine.
///
/// Owns no timers: every transition returns the commands the driver must run
/// (arm/cancel a timer slot, issue a save, update the page). The driver feeds
/// timer expiries, window focus changes and save results back in as [`Input`]s.
#[derive(Clone, Debug)]
pub(crate) struct AutosaveScheduler {
    timings: AutosaveTimings,
    phase: Phase,
    pause_pending: bool,
    /// Timers were dropped for the back/forward cache and come back on resume.
    suspended: bool,
    /// The save that hit the conflict was a submit; a forced save finishes it.
    submit_after_force: bool,
}

impl AutosaveScheduler {
    pub fn new(timings: AutosaveTimings) -> Self {
        Self {
            timings,
            phase: Phase::Idle,
            pause_pending: false,
            suspended: false,
            submit_after_force: false,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn is_pause_pending(&self) -> bool {
        self.pause_pending
    }

    pub fn handle(&mut self, input: Input) -> Vec<Command> {
        debug!(phase = ?self.phase, pause_pending = self.pause_pending, ?input, "autosave input");

        match input {
            Input::Init { first_time } => self.on_init(first_time),
            Input::Focus => self.on_focus(),
            Input::Blur => self.on_blur(),
            Input::StartDelayElapsed => self.on_start_delay_elapsed(),
            Input::PauseDelayElapsed => self.on_pause_delay_elapsed(),
            Input::Tick => {
                if self.phase == Phase::Scheduled {
                    vec![Command::Save {
                        force: false,
                        submit: false,
                    }]
                } else {
                    vec![]
                }
            }
            Input::SaveRequested { submit } => {
                if self.phase == Phase::Halted(HaltReason::AuthExpired) {
                    return vec![];
                }
                vec![Command::Save {
                    force: false,
                    submit,
                }]
            }
            Input::ForceSave => {
                if self.phase == Phase::Halted(HaltReason::AuthExpired) {
                    return vec![];
                }
                vec![Command::Save {
                    force: true,
                    submit: self.submit_after_force,
                }]
            }
            Input::SaveCompleted {
                outcome,
                submit,
                force,
            } => self.on_save_completed(outcome, submit, force),
            Input::Suspend => self.on_suspend(),
            Input::Resume => self.on_resume(),
            Input::Unload => {
                let out = self.cancel_all();
                self.phase = Phase::Idle;
                self.suspended = false;
                out
            }
        }
    }

    fn on_init(&mut self, first_time: bool) -> Vec<Command> {
        if self.phase != Phase::Idle {
            warn!(phase = ?self.phase, "autosave already initialised");
            return vec![];
        }

        if first_time {
            self.phase = Phase::Starting;
            vec![Command::Arm {
                slot: TimerSlot::StartDelay,
                after: self.timings.start_delay,
            }]
        } else {
            self.phase = Phase::Scheduled;
            vec![self.arm_periodic()]
        }
    }

    fn on_blur(&mut self) -> Vec<Command> {
        match self.phase {
            Phase::Starting | Phase::Scheduled if !self.pause_pending => {
                self.pause_pending = true;
                vec![Command::Arm {
                    slot: TimerSlot::PauseDelay,
                    after: self.timings.pause_delay,
                }]
            }
            _ => vec![],
        }
    }

    fn on_focus(&mut self) -> Vec<Command> {
        if self.pause_pending {
            // Focus came back in time: autosave never actually paused.
            self.pause_pending = false;
            return vec![Command::Cancel(TimerSlot::PauseDelay)];
        }

        if self.phase == Phase::Paused {
            info!("autosave resumed");
            self.phase = Phase::Scheduled;
            return vec![self.arm_periodic()];
        }

        vec![]
    }

    fn on_start_delay_elapsed(&mut self) -> Vec<Command> {
        if self.phase != Phase::Starting {
            return vec![];
        }
        self.phase = Phase::Scheduled;
        vec![self.arm_periodic()]
    }

    fn on_pause_delay_elapsed(&mut self) -> Vec<Command> {
        if !self.pause_pending {
            return vec![];
        }
        self.pause_pending = false;

        let slot = match self.phase {
            Phase::Starting => TimerSlot::StartDelay,
            Phase::Scheduled => TimerSlot::Periodic,
            _ => return vec![],
        };
        info!("autosave paused");
        self.phase = Phase::Paused;
        vec![Command::Cancel(slot)]
    }

    fn on_suspend(&mut self) -> Vec<Command> {
        match self.phase {
            Phase::Starting | Phase::Scheduled | Phase::Paused => {
                debug!(phase = ?self.phase, "autosave suspended");
                let out = self.cancel_all();
                self.phase = Phase::Idle;
                self.suspended = true;
                out
            }
            _ => vec![],
        }
    }

    /// Restored pages skip the first-time delay.
    fn on_resume(&mut self) -> Vec<Command> {
        if !self.suspended || self.phase != Phase::Idle {
            return vec![];
        }
        self.suspended = false;
        info!("autosave resumed after page restore");
        self.phase = Phase::Scheduled;
        vec![self.arm_periodic()]
    }

    fn on_save_completed(&mut self, outcome: SaveOutcome, submit: bool, force: bool) -> Vec<Command> {
        if self.phase == Phase::Halted(HaltReason::AuthExpired) {
            return vec![];
        }

        match outcome {
            SaveOutcome::Saved => {
                let mut out = vec![if submit {
                    Command::SubmitForm
                } else {
                    Command::ShowSaved
                }];
                if force && self.phase == Phase::Halted(HaltReason::Conflict) {
                    info!("forced save accepted; autosave re-armed");
                    self.submit_after_force = false;
                    self.phase = Phase::Scheduled;
                    out.push(self.arm_periodic());
                }
                out
            }
            SaveOutcome::Conflict => {
                let mut out = self.cancel_all();
                if self.phase != Phase::Halted(HaltReason::Conflict) {
                    warn!("autosave conflict; stopping periodic saves");
                    self.phase = Phase::Halted(HaltReason::Conflict);
                }
                self.submit_after_force |= submit;
                out.push(Command::PromptConflict);
                out
            }
            SaveOutcome::AuthExpired { login_url } => {
                warn!("session expired; redirecting to login");
                let mut out = self.cancel_all();
                self.phase = Phase::Halted(HaltReason::AuthExpired);
                out.push(Command::Redirect { login_url });
                out
            }
            other => match other.error_text() {
                // The next tick is the retry; the schedule is left alone.
                Some(text) => vec![Command::ShowError(text)],
                None => vec![],
            },
        }
    }

    fn arm_periodic(&self) -> Command {
        Command::Arm {
            slot: TimerSlot::Periodic,
            after: self.timings.save_interval,
        }
    }

    fn cancel_all(&mut self) -> Vec<Command> {
        let mut out = vec![];
        match self.phase {
            Phase::Starting => out.push(Command::Cancel(TimerSlot::StartDelay)),
            Phase::Scheduled => out.push(Command::Cancel(TimerSlot::Periodic)),
            _ => {}
        }
        if self.pause_pending {
            self.pause_pending = false;
            out.push(Command::Cancel(TimerSlot::PauseDelay));
        }
        out
    }
}
