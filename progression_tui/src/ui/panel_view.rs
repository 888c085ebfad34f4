//! Level-up panel view

use super::section;
use crate::app::App;
use progression_core::PanelState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let sequencer = app.session.sequencer();

    match sequencer.state() {
        PanelState::PanelOpen => draw_choices(f, app, area),
        PanelState::Idle => draw_message(
            f,
            area,
            " Level Up ",
            vec![
                Line::from("No level-up waiting."),
                Line::from(""),
                Line::from(format!(
                    "Choices made: {} of {}",
                    sequencer.panels_shown(),
                    sequencer.settings().panels_to_win
                )),
                Line::from("Press x to gain experience."),
            ],
        ),
        PanelState::Complete => draw_message(
            f,
            area,
            " Run Complete ",
            vec![
                Line::from(Span::styled(
                    "You made it!",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("{} level-ups resolved.", sequencer.panels_shown())),
                Line::from("Press c to keep playing without further choices."),
            ],
        ),
    }
}

fn draw_message(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_choices(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();
    let sequencer = app.session.sequencer();
    let Some(panel) = sequencer.current_panel() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let reroll = if panel.reroll_available {
        Span::styled("reroll ready", Style::default().fg(Color::Green))
    } else {
        Span::styled("reroll used", Style::default().fg(Color::DarkGray))
    };
    let header = Line::from(vec![
        Span::styled(
            format!("Level {} ", panel.level),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "· choice {} of {} · {} more queued · ",
                panel.number,
                sequencer.settings().panels_to_win,
                sequencer.pending_levels().saturating_sub(1)
            ),
            Style::default().fg(Color::Gray),
        ),
        reroll,
    ]);
    f.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        rows[0],
    );

    let slots = panel.choices.len().max(1) as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..slots).map(|_| Constraint::Ratio(1, slots)).collect::<Vec<_>>())
        .split(rows[1]);

    for (i, choice) in panel.choices.iter().enumerate() {
        let title = format!(" [{}] ", i + 1);
        let Some(skill) = choice.as_ref().and_then(|id| progression.skills().get(id)) else {
            let empty = Paragraph::new(Line::from(Span::styled(
                "-",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            );
            f.render_widget(empty, columns[i]);
            continue;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                skill.name().to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("picked {}×", progression.pick_count(&skill.id)),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
        if !skill.description.is_empty() {
            lines.push(Line::from(skill.description.clone()));
            lines.push(Line::from(""));
        }
        lines.push(section("Effects"));
        for effect in &skill.effects {
            let amount = match effect.operation {
                progression_core::ModifierOp::Add => format!("{:+}", effect.amount),
                progression_core::ModifierOp::Mult => format!("{:+.0}%", effect.amount * 100.0),
            };
            lines.push(Line::from(format!(
                "{} {}",
                progression_core::display::display_name(effect.attribute),
                amount
            )));
        }

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(card, columns[i]);
    }
}
