//! The countdown controller: a target instant, a phase machine, and the
//! once-per-second tick chain that drives both readouts.
//!
//! The controller owns one optional target and publishes three strings for
//! the surrounding view: the current time, the selected time (or its
//! placeholder), and the countdown line. The repeating timer is a chain of
//! one-shot [`tick`](bubbletea_rs::tick) commands: accepting a [`TickMsg`]
//! arms exactly one successor, so at most one chain is ever live.
//!
//! Replacing the target and resetting both bump a generation tag instead of
//! cancelling a timer handle. A tick minted under an older generation is
//! rejected when it arrives, which is what makes "cancel the previous timer
//! before starting a new one" race-free: the stale callback can still fire,
//! it just no longer does anything.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use datedown::countdown;
//!
//! struct MyApp {
//!     countdown: countdown::Model,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let countdown = countdown::new();
//!         let cmd = countdown.init();
//!         (Self { countdown }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // e.g. on a key press:
//!         // return Some(self.countdown.select_target(Local::now() + Duration::hours(1)));
//!         self.countdown.update(&msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!(
//!             "{}\n{}\n{}",
//!             self.countdown.current_time_view(),
//!             self.countdown.selected_time_view(),
//!             self.countdown.view()
//!         )
//!     }
//! }
//! ```

use crate::clock::{calendar_diff, format_timestamp};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management, so several controllers could coexist without
// stealing each other's ticks.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Countdown line shown while no target is selected.
pub const NO_TIME_SELECTED: &str = "No Time Selected";

/// Selected-time line shown while no target is selected.
pub const SELECT_PROMPT: &str = "Please Click Plus Mark";

/// Countdown line shown once the target has been reached.
pub const FINISHED: &str = "Countdown Finished";

/// Message delivered by the tick chain, nominally once per second.
///
/// A tick is only honored when both its `id` (which controller) and its
/// private generation tag (which chain) match the receiver's current state.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The unique identifier of the controller this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// The display phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No target selected; the clock readout keeps advancing.
    Idle,
    /// A future target is selected and being counted down to.
    Counting,
    /// The target has been reached; the chain is cancelled until a new
    /// target is selected or the controller is reset.
    Finished,
}

/// What a [`step`](Model::step) wants done with the tick chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Schedule the next tick after the controller's interval.
    Rearm,
    /// Leave the chain dead; only a new target or a reset restarts it.
    Cancel,
}

/// The countdown controller model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Time between ticks. Default is 1 second.
    pub interval: Duration,

    target: Option<DateTime<Local>>,
    phase: Phase,
    now: DateTime<Local>,
    id: i64,
    tag: i64,
}

/// Creates a controller with the default 1-second interval.
pub fn new() -> Model {
    new_with_interval(Duration::from_secs(1))
}

/// Creates a controller with a custom tick interval.
pub fn new_with_interval(interval: Duration) -> Model {
    Model {
        interval,
        target: None,
        phase: Phase::Idle,
        now: Local::now(),
        id: next_id(),
        tag: 0,
    }
}

impl Model {
    /// Returns the unique identifier of this controller instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the current display phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the selected target, if any.
    ///
    /// The target survives reaching [`Phase::Finished`]; it is only cleared
    /// by [`reset`](Self::reset) or replaced by
    /// [`select_target`](Self::select_target).
    pub fn target(&self) -> Option<DateTime<Local>> {
        self.target
    }

    /// Returns the instant observed by the most recent step.
    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    /// Returns whether a tick chain is currently armed.
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Finished
    }

    /// Arms the first tick. Call once, from the application's `init`.
    pub fn init(&self) -> Cmd {
        self.tick()
    }

    /// Selects a new target and restarts the tick chain.
    ///
    /// The caller (the picker, or the CLI at startup) guarantees the
    /// candidate is not in the past; a past candidate is not an error here,
    /// it simply lands in [`Phase::Finished`] on the immediate step.
    pub fn select_target(&mut self, candidate: DateTime<Local>) -> Cmd {
        self.select_target_at(candidate, Local::now())
    }

    /// Exact-instant variant of [`select_target`](Self::select_target), for
    /// callers that already observed the clock (and for tests, which drive
    /// the controller with a manual clock).
    ///
    /// Steps the state immediately so the display reflects the new target
    /// without waiting for the first tick of the fresh chain.
    pub fn select_target_at(&mut self, candidate: DateTime<Local>, now: DateTime<Local>) -> Cmd {
        self.target = Some(candidate);
        self.tag += 1; // a tick already in flight now dies on arrival
        self.step(now);
        self.tick()
    }

    /// Clears the target and restarts the tick chain, so the clock readout
    /// keeps advancing with nothing selected.
    pub fn reset(&mut self) -> Cmd {
        self.target = None;
        self.phase = Phase::Idle;
        self.tag += 1;
        self.tick()
    }

    /// The pure transition: records `now`, settles the phase, and says
    /// whether the chain should be re-armed.
    ///
    /// Late or duplicate ticks are harmless by construction: once the
    /// target is at or behind `now` every further step re-enters
    /// [`Phase::Finished`] and answers [`TimerAction::Cancel`] again.
    pub fn step(&mut self, now: DateTime<Local>) -> TimerAction {
        self.now = now;
        match self.target {
            None => {
                self.phase = Phase::Idle;
                TimerAction::Rearm
            }
            Some(target) if target <= now => {
                self.phase = Phase::Finished;
                TimerAction::Cancel
            }
            Some(_) => {
                self.phase = Phase::Counting;
                TimerAction::Rearm
            }
        }
    }

    /// Processes tick messages; everything else is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id {
                return None;
            }
            // A stale tag means this tick belongs to a chain that was
            // replaced by select_target or reset.
            if tick_msg.tag != self.tag {
                return None;
            }

            return match self.step(Local::now()) {
                TimerAction::Rearm => Some(self.tick()),
                TimerAction::Cancel => None,
            };
        }

        None
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        let interval = self.interval;

        bubbletea_tick(interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    /// The current-time readout, through the shared formatter.
    pub fn current_time_view(&self) -> String {
        format_timestamp(&self.now)
    }

    /// The selected-time readout: the target through the shared formatter,
    /// or the placeholder while nothing is selected.
    pub fn selected_time_view(&self) -> String {
        match self.target {
            Some(target) => format_timestamp(&target),
            None => SELECT_PROMPT.to_string(),
        }
    }

    /// The countdown line for the current phase.
    pub fn view(&self) -> String {
        match (self.phase, self.target) {
            (Phase::Counting, Some(target)) => calendar_diff(&self.now, &target).to_string(),
            (Phase::Finished, _) => FINISHED.to_string(),
            _ => NO_TIME_SELECTED.to_string(),
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let model = new();
        let cmd = model.init();
        (model, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(&msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}
