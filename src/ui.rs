use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, InputFocus, Mode};
use crate::timer::Phase;
use crate::util::{format_minutes, format_mmss, format_overrun};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let show_panel = self.timer.active_topic().is_some();
        let panel_lines = if show_panel { 7 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(panel_lines),
                Constraint::Length(1),
            ])
            .split(area);

        render_inputs(self, chunks[0], buf);
        render_table(self, chunks[1], buf);
        if show_panel {
            render_active_panel(self, chunks[2], buf);
        }
        render_help(self, chunks[3], buf);

        if let Some(message) = &self.alert {
            render_alert(message, area, buf);
        }
    }
}

fn render_inputs(app: &App, area: Rect, buf: &mut Buffer) {
    let editing = app.mode == Mode::Insert;
    let field_style = |focus: InputFocus| {
        if editing && app.focus == focus {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if editing {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let cursor = |focus: InputFocus| {
        if editing && app.focus == focus {
            "▏"
        } else {
            ""
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("name    ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                format!("{}{}", app.name_input, cursor(InputFocus::Name)),
                field_style(InputFocus::Name),
            ),
        ]),
        Line::from(vec![
            Span::styled("minutes ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                format!("{}{}", app.minutes_input, cursor(InputFocus::Minutes)),
                field_style(InputFocus::Minutes),
            ),
        ]),
    ];

    let title = if editing { "add topic (editing)" } else { "add topic" };
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    widget.render(area, buf);
}

fn render_table(app: &App, area: Rect, buf: &mut Buffer) {
    let agenda = app.timer.agenda();
    let session_active = app.timer.phase() != Phase::Idle;

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Topic"),
        Cell::from("Planned"),
        Cell::from("Actual"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let mut rows: Vec<Row> = agenda
        .topics()
        .iter()
        .enumerate()
        .map(|(idx, topic)| {
            let marker = if session_active && idx == app.timer.active_index() {
                "▶"
            } else {
                ""
            };
            let mut row = Row::new(vec![
                Cell::from(marker),
                Cell::from(topic.name.clone()),
                Cell::from(format_minutes(topic.planned_minutes)),
                Cell::from(format_mmss(topic.actual_secs as i64)),
            ]);
            if app.mode == Mode::Browse && idx == app.selected {
                row = row.style(Style::default().bg(Color::DarkGray));
            }
            row
        })
        .collect();

    if !agenda.is_empty() {
        rows.push(
            Row::new(vec![
                Cell::from(""),
                Cell::from("total"),
                Cell::from(format_minutes(agenda.total_planned_minutes())),
                Cell::from(format_mmss(agenda.total_actual_secs() as i64)),
            ])
            .style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC)),
        );
    }

    let name_width = agenda
        .topics()
        .iter()
        .map(|t| t.name.width())
        .max()
        .unwrap_or(0)
        .clamp(12, 32) as u16;

    let table = Table::new(
        rows,
        &[
            Constraint::Length(1),
            Constraint::Length(name_width),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("agenda"));

    Widget::render(table, area, buf);
}

fn render_active_panel(app: &App, area: Rect, buf: &mut Buffer) {
    let topic = match app.timer.active_topic() {
        Some(t) => t,
        None => return,
    };
    let remaining = app.timer.remaining_secs();
    let expired = remaining <= 0;

    let name_style = if expired {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let countdown_style = if expired {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![
        Line::from(Span::styled(topic.name.clone(), name_style)),
        Line::from(Span::styled(format_mmss(remaining), countdown_style)),
    ];
    if let Some(overrun) = format_overrun(remaining) {
        lines.push(Line::from(Span::styled(
            format!("over by {}", overrun),
            Style::default().fg(Color::Red),
        )));
    }
    let status = match app.timer.started_at() {
        Some(at) => format!("{} | started {}", app.timer.phase(), at.format("%H:%M:%S")),
        None => app.timer.phase().to_string(),
    };
    lines.push(Line::from(Span::styled(
        status,
        Style::default().add_modifier(Modifier::DIM),
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("current topic"));
    widget.render(area, buf);
}

fn render_help(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = match app.mode {
        Mode::Insert => vec![
            "type into the fields",
            "[tab] switch field",
            "[enter] add",
            "[esc] done",
        ],
        Mode::Browse => {
            let mut hints = vec!["[a]dd", "[d]elete"];
            if app.timer.can_start() {
                hints.push("[s]tart");
            }
            if app.timer.phase() != Phase::Idle {
                hints.extend(["[space] pause", "[n]ext", "[p]rev", "[x] stop"]);
            }
            hints.extend(["[r]eset", "[q]uit"]);
            hints
        }
    };

    let widget = Paragraph::new(Span::styled(
        hints.iter().join("  "),
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    widget.render(area, buf);
}

fn render_alert(message: &str, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(46, 5, area);
    Clear.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "press enter to dismiss",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("time's up"),
        );
    widget.render(popup, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
