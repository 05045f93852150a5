use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::timer::{Action, Effect, TopicTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Transport keys and table navigation.
    Browse,
    /// Editing the add-topic input fields.
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Name,
    Minutes,
}

/// UI state wrapped around the domain [`TopicTimer`]: input fields, table
/// selection, and the pending expiry alert.
#[derive(Debug)]
pub struct App {
    pub timer: TopicTimer,
    pub mode: Mode,
    pub focus: InputFocus,
    pub name_input: String,
    pub minutes_input: String,
    pub default_minutes: f64,
    pub selected: usize,
    /// While set, the modal blocks every input except dismissal, and tick
    /// processing stalls, matching the source's blocking alert.
    pub alert: Option<String>,
}

impl App {
    pub fn new(timer: TopicTimer, default_minutes: f64) -> Self {
        Self {
            timer,
            mode: Mode::Browse,
            focus: InputFocus::Name,
            name_input: String::new(),
            minutes_input: default_minutes.to_string(),
            default_minutes,
            selected: 0,
            alert: None,
        }
    }

    /// The 1s tick must be live exactly while the countdown is running
    /// and no modal is up.
    pub fn tick_armed(&self) -> bool {
        self.timer.is_ticking() && self.alert.is_none()
    }

    pub fn on_tick(&mut self) {
        if self.alert.is_some() {
            return;
        }
        if let Some(Effect::TimeUp { topic }) = self.timer.apply(Action::Tick) {
            self.alert = Some(format!("Time's up for {}!", topic));
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.alert.is_some() {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
            ) {
                self.alert = None;
            }
            return false;
        }

        match self.mode {
            Mode::Insert => self.handle_insert_key(key),
            Mode::Browse => return self.handle_browse_key(key),
        }
        false
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    InputFocus::Name => InputFocus::Minutes,
                    InputFocus::Minutes => InputFocus::Name,
                };
            }
            KeyCode::Enter => {
                self.submit_topic();
            }
            KeyCode::Backspace => {
                match self.focus {
                    InputFocus::Name => self.name_input.pop(),
                    InputFocus::Minutes => self.minutes_input.pop(),
                };
            }
            KeyCode::Char(c) => match self.focus {
                InputFocus::Name => self.name_input.push(c),
                InputFocus::Minutes => {
                    if c.is_ascii_digit() || c == '.' {
                        self.minutes_input.push(c);
                    }
                }
            },
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.mode = Mode::Insert;
                self.focus = InputFocus::Name;
            }
            KeyCode::Char('s') => {
                self.timer.apply(Action::Start);
            }
            KeyCode::Char(' ') => {
                self.timer.apply(Action::TogglePause);
            }
            KeyCode::Char('n') => {
                self.timer.apply(Action::Next);
            }
            KeyCode::Char('p') => {
                self.timer.apply(Action::Previous);
            }
            KeyCode::Char('x') => {
                self.timer.apply(Action::Stop);
            }
            KeyCode::Char('r') => {
                self.timer.apply(Action::Reset);
            }
            KeyCode::Char('d') => {
                self.timer.apply(Action::DeleteTopic(self.selected));
                self.clamp_selected();
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selected();
            }
            _ => {}
        }
        false
    }

    /// Invalid input is a silent no-op; the fields only clear on success.
    fn submit_topic(&mut self) {
        let minutes: f64 = self.minutes_input.trim().parse().unwrap_or(0.0);
        let before = self.timer.agenda().len();
        self.timer.apply(Action::AddTopic {
            name: self.name_input.clone(),
            minutes,
        });
        if self.timer.agenda().len() > before {
            self.name_input.clear();
            self.minutes_input = self.default_minutes.to_string();
        }
    }

    fn clamp_selected(&mut self) {
        let len = self.timer.agenda().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_topics(topics: &[(&str, f64)]) -> App {
        let mut timer = TopicTimer::new();
        for (name, minutes) in topics {
            timer.add_topic(name, *minutes);
        }
        App::new(timer, 5.0)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_insert_flow_adds_topic_and_clears_fields() {
        let mut app = app_with_topics(&[]);
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.mode, Mode::Insert);

        type_str(&mut app, "kickoff");
        app.handle_key(key(KeyCode::Tab));
        app.minutes_input.clear();
        type_str(&mut app, "2.5");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.timer.agenda().len(), 1);
        assert_eq!(app.timer.agenda().get(0).unwrap().name, "kickoff");
        assert_eq!(app.timer.agenda().get(0).unwrap().planned_minutes, 2.5);
        assert!(app.name_input.is_empty());
        assert_eq!(app.minutes_input, "5");
    }

    #[test]
    fn test_insert_rejects_bad_input_and_keeps_fields() {
        let mut app = app_with_topics(&[]);
        app.handle_key(key(KeyCode::Char('i')));

        // empty name
        app.handle_key(key(KeyCode::Enter));
        assert!(app.timer.agenda().is_empty());

        // zero minutes
        type_str(&mut app, "x");
        app.handle_key(key(KeyCode::Tab));
        app.minutes_input.clear();
        type_str(&mut app, "0");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.timer.agenda().is_empty());
        assert_eq!(app.name_input, "x");
        assert_eq!(app.minutes_input, "0");
    }

    #[test]
    fn test_minutes_field_filters_non_numeric() {
        let mut app = app_with_topics(&[]);
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Tab));
        app.minutes_input.clear();
        type_str(&mut app, "1a.b5");
        assert_eq!(app.minutes_input, "1.5");
    }

    #[test]
    fn test_transport_keys_drive_timer() {
        let mut app = app_with_topics(&[("a", 0.1), ("b", 0.1)]);

        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.timer.is_ticking());
        assert_eq!(app.timer.remaining_secs(), 6);

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.timer.is_ticking());
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.timer.is_ticking());

        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.timer.active_index(), 1);
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.timer.active_index(), 0);

        app.handle_key(key(KeyCode::Char('x')));
        assert!(!app.timer.is_ticking());
    }

    #[test]
    fn test_delete_key_clamps_selection() {
        let mut app = app_with_topics(&[("a", 1.0), ("b", 1.0)]);
        app.selected = 1;
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.timer.agenda().len(), 1);
        assert_eq!(app.selected, 0);

        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.timer.agenda().is_empty());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_selection_navigation_stays_in_range() {
        let mut app = app_with_topics(&[("a", 1.0), ("b", 1.0)]);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected, 0);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, 1);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_tick_sets_alert_on_expiry() {
        let mut app = app_with_topics(&[("demo", 0.1)]);
        app.handle_key(key(KeyCode::Char('s')));

        for _ in 0..6 {
            app.on_tick();
        }
        assert_eq!(app.alert.as_deref(), Some("Time's up for demo!"));
        assert_eq!(app.timer.remaining_secs(), 0);
    }

    #[test]
    fn test_alert_blocks_input_and_ticks_until_dismissed() {
        let mut app = app_with_topics(&[("demo", 0.1)]);
        app.handle_key(key(KeyCode::Char('s')));
        for _ in 0..6 {
            app.on_tick();
        }
        assert!(app.alert.is_some());
        assert!(!app.tick_armed());

        // transport keys are swallowed while the modal is up
        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.timer.is_ticking());

        // ticks stall too
        app.on_tick();
        assert_eq!(app.timer.remaining_secs(), 0);

        app.handle_key(key(KeyCode::Enter));
        assert!(app.alert.is_none());
        assert!(app.tick_armed());

        // after dismissal the countdown keeps going negative
        app.on_tick();
        assert_eq!(app.timer.remaining_secs(), -1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_topics(&[]);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.handle_key(key(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_esc_leaves_insert_mode_without_quitting() {
        let mut app = app_with_topics(&[]);
        app.handle_key(key(KeyCode::Char('i')));
        assert!(!app.handle_key(key(KeyCode::Esc)));
        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn test_tick_armed_tracks_phase() {
        let mut app = app_with_topics(&[("a", 1.0)]);
        assert!(!app.tick_armed());
        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.tick_armed());
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.tick_armed());
    }
}
