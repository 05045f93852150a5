use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use agenda_timer::{
    app::App,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, Event, EventSource, FixedTicker, Runner, Ticker},
    timer::{Action, TopicTimer},
    TICK_RATE_MS,
};

/// sequential topic timer tui for running meetings against a planned agenda
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal topic timer: enumerate topics with planned durations, then walk through them one at a time with a countdown while the actual time spent on each is tracked."
)]
pub struct Cli {
    /// seed the agenda with a topic, formatted NAME:MINUTES (repeatable)
    #[clap(short = 't', long = "topic", value_name = "NAME:MINUTES")]
    topics: Vec<String>,

    /// default planned duration prefilled in the minutes field
    #[clap(short = 'm', long)]
    minutes: Option<f64>,

    /// skip loading the config file
    #[clap(long)]
    no_config: bool,
}

/// NAME:MINUTES, splitting on the last colon so names may contain colons.
/// Invalid entries are dropped silently, like every other invalid input.
fn parse_topic_arg(raw: &str) -> Option<(String, f64)> {
    let (name, minutes) = raw.rsplit_once(':')?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let name = name.trim();
    if name.is_empty() || !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    Some((name.to_string(), minutes))
}

fn build_app(cli: &Cli, config: &Config) -> App {
    let mut timer = TopicTimer::new();
    for template in &config.agenda {
        timer.apply(Action::AddTopic {
            name: template.name.clone(),
            minutes: template.minutes,
        });
    }
    for raw in &cli.topics {
        if let Some((name, minutes)) = parse_topic_arg(raw) {
            timer.apply(Action::AddTopic { name, minutes });
        }
    }
    let default_minutes = cli.minutes.unwrap_or(config.default_minutes);
    App::new(timer, default_minutes)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = if cli.no_config {
        Config::default()
    } else {
        FileConfigStore::new().load()
    };
    let mut app = build_app(&cli, &config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let res = run(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        // Arming is re-derived after every action, so pausing or stopping
        // takes effect before the next tick ever fires.
        match runner.step(app.tick_armed()) {
            Event::Tick => app.on_tick(),
            Event::Resize => {}
            Event::Key(key) => {
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["agenda-timer"]);
        assert!(cli.topics.is_empty());
        assert_eq!(cli.minutes, None);
        assert!(!cli.no_config);
    }

    #[test]
    fn test_cli_topic_flag() {
        let cli = Cli::parse_from(["agenda-timer", "-t", "intro:5", "--topic", "retro:2.5"]);
        assert_eq!(cli.topics, vec!["intro:5", "retro:2.5"]);
    }

    #[test]
    fn test_cli_minutes_flag() {
        let cli = Cli::parse_from(["agenda-timer", "-m", "2.5"]);
        assert_eq!(cli.minutes, Some(2.5));

        let cli = Cli::parse_from(["agenda-timer", "--minutes", "10"]);
        assert_eq!(cli.minutes, Some(10.0));
    }

    #[test]
    fn test_parse_topic_arg_valid() {
        assert_eq!(parse_topic_arg("intro:5"), Some(("intro".to_string(), 5.0)));
        assert_eq!(
            parse_topic_arg("q&a: 2.5"),
            Some(("q&a".to_string(), 2.5))
        );
        // names may contain colons; the split is on the last one
        assert_eq!(
            parse_topic_arg("infra: rollout:1"),
            Some(("infra: rollout".to_string(), 1.0))
        );
    }

    #[test]
    fn test_parse_topic_arg_invalid() {
        assert_eq!(parse_topic_arg("intro"), None);
        assert_eq!(parse_topic_arg(":5"), None);
        assert_eq!(parse_topic_arg("  :5"), None);
        assert_eq!(parse_topic_arg("intro:0"), None);
        assert_eq!(parse_topic_arg("intro:-2"), None);
        assert_eq!(parse_topic_arg("intro:abc"), None);
        assert_eq!(parse_topic_arg("intro:"), None);
    }

    #[test]
    fn test_build_app_seeds_from_cli() {
        let cli = Cli::parse_from([
            "agenda-timer",
            "-t",
            "intro:5",
            "-t",
            "bogus:0",
            "-t",
            "retro:2",
        ]);
        let app = build_app(&cli, &Config::default());

        // the invalid entry is dropped silently
        assert_eq!(app.timer.agenda().len(), 2);
        assert_eq!(app.timer.agenda().get(0).unwrap().name, "intro");
        assert_eq!(app.timer.agenda().get(1).unwrap().name, "retro");
    }

    #[test]
    fn test_build_app_config_agenda_comes_first() {
        use agenda_timer::config::TopicTemplate;

        let cli = Cli::parse_from(["agenda-timer", "-t", "extra:1"]);
        let config = Config {
            default_minutes: 3.0,
            agenda: vec![TopicTemplate {
                name: "standup".into(),
                minutes: 10.0,
            }],
        };
        let app = build_app(&cli, &config);

        assert_eq!(app.timer.agenda().len(), 2);
        assert_eq!(app.timer.agenda().get(0).unwrap().name, "standup");
        assert_eq!(app.timer.agenda().get(1).unwrap().name, "extra");
        assert_eq!(app.default_minutes, 3.0);
    }

    #[test]
    fn test_build_app_cli_minutes_overrides_config() {
        let cli = Cli::parse_from(["agenda-timer", "-m", "1.5"]);
        let app = build_app(&cli, &Config::default());
        assert_eq!(app.default_minutes, 1.5);
        assert_eq!(app.minutes_input, "1.5");
    }

    #[test]
    fn test_ui_function_renders() {
        use ratatui::{backend::TestBackend, Terminal};

        let cli = Cli::parse_from(["agenda-timer", "-t", "intro:5"]);
        let app = build_app(&cli, &Config::default());

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("intro"));
    }

    #[test]
    fn test_tick_rate_constant() {
        // One logical tick per second of wall time
        assert_eq!(TICK_RATE_MS, 1000);
    }
}
