use chrono::{DateTime, Local};

use crate::agenda::{Agenda, Topic};

/// Countdown phase. "Finished" is implicit: `remaining_secs <= 0` while
/// Running. The engine never auto-advances or auto-stops on expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// Every state transition in the app, applied atomically by [`TopicTimer::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTopic { name: String, minutes: f64 },
    DeleteTopic(usize),
    Start,
    TogglePause,
    Next,
    Previous,
    Stop,
    Reset,
    Tick,
}

/// Side effect surfaced by the reducer for the UI layer to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    TimeUp { topic: String },
}

/// The whole domain state: topic list plus the countdown session,
/// advanced only through [`TopicTimer::apply`] or the named methods.
#[derive(Debug, Clone)]
pub struct TopicTimer {
    agenda: Agenda,
    phase: Phase,
    active_index: usize,
    remaining_secs: i64,
    expiry_notified: bool,
    started_at: Option<DateTime<Local>>,
}

impl Default for TopicTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicTimer {
    pub fn new() -> Self {
        Self {
            agenda: Agenda::new(),
            phase: Phase::Idle,
            active_index: 0,
            remaining_secs: 0,
            expiry_notified: false,
            started_at: None,
        }
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// May go negative past expiry; the display layer clamps.
    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn active_topic(&self) -> Option<&Topic> {
        if self.phase == Phase::Idle {
            return None;
        }
        self.agenda.get(self.active_index)
    }

    /// The periodic tick is armed exactly while this holds.
    pub fn is_ticking(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn can_start(&self) -> bool {
        self.phase == Phase::Idle && !self.agenda.is_empty()
    }

    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::AddTopic { name, minutes } => {
                self.add_topic(&name, minutes);
                None
            }
            Action::DeleteTopic(index) => {
                self.delete_topic(index);
                None
            }
            Action::Start => {
                self.start();
                None
            }
            Action::TogglePause => {
                self.toggle_pause();
                None
            }
            Action::Next => {
                self.next_topic();
                None
            }
            Action::Previous => {
                self.previous_topic();
                None
            }
            Action::Stop => {
                self.stop();
                None
            }
            Action::Reset => {
                self.reset();
                None
            }
            Action::Tick => self.on_tick(),
        }
    }

    pub fn add_topic(&mut self, name: &str, minutes: f64) -> bool {
        self.agenda.add(name, minutes)
    }

    /// Delete the topic at `index`, keeping the session coherent:
    /// deleting below the active topic shifts the index down, deleting the
    /// active topic itself clamps the index and reloads its countdown, and
    /// emptying the list tears the session down.
    pub fn delete_topic(&mut self, index: usize) {
        let was_active = index == self.active_index;
        if !self.agenda.remove(index) {
            return;
        }
        if self.agenda.is_empty() {
            self.phase = Phase::Idle;
            self.active_index = 0;
            self.remaining_secs = 0;
            self.expiry_notified = false;
            self.started_at = None;
            return;
        }
        if index < self.active_index {
            self.active_index -= 1;
        } else if was_active {
            if self.active_index >= self.agenda.len() {
                self.active_index = self.agenda.len() - 1;
            }
            self.load_remaining();
        }
    }

    /// Idle -> Running, only when the list is non-empty.
    pub fn start(&mut self) {
        if !self.can_start() {
            return;
        }
        self.phase = Phase::Running;
        self.active_index = 0;
        self.load_remaining();
        self.started_at = Some(Local::now());
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::Idle => Phase::Idle,
        };
    }

    pub fn next_topic(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        if self.active_index + 1 < self.agenda.len() {
            self.active_index += 1;
            self.load_remaining();
        }
    }

    pub fn previous_topic(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        if self.active_index > 0 {
            self.active_index -= 1;
            self.load_remaining();
        }
    }

    /// Suspend in place: back to Idle without touching the active index,
    /// the countdown, or any accumulated actual time.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Back to the initial state modulo the topic list contents.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.active_index = 0;
        self.remaining_secs = 0;
        self.expiry_notified = false;
        self.started_at = None;
        self.agenda.zero_actuals();
    }

    /// One logical second: decrement the countdown, credit the active topic.
    /// Fires the one-shot expiry effect on the 1 -> 0 crossing; past zero the
    /// countdown keeps going negative without further effects.
    pub fn on_tick(&mut self) -> Option<Effect> {
        if self.phase != Phase::Running {
            return None;
        }
        let crossing = self.remaining_secs == 1 && !self.expiry_notified;
        self.remaining_secs -= 1;
        self.agenda.credit(self.active_index);
        if crossing {
            self.expiry_notified = true;
            return self
                .agenda
                .get(self.active_index)
                .map(|t| Effect::TimeUp {
                    topic: t.name.clone(),
                });
        }
        None
    }

    fn load_remaining(&mut self) {
        self.remaining_secs = self
            .agenda
            .get(self.active_index)
            .map(Topic::planned_secs)
            .unwrap_or(0);
        self.expiry_notified = false;
    }
}
