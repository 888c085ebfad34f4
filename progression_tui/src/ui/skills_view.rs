//! Skills tab view

use super::section;
use crate::app::App;
use progression_core::display::display_name;
use progression_core::{ModifierOp, PrerequisiteMode, SkillDefinition};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_skill_list(f, app, chunks[0]);
    draw_skill_details(f, app, chunks[1]);
}

fn draw_skill_list(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();

    let items: Vec<ListItem> = progression
        .skills()
        .iter()
        .enumerate()
        .map(|(i, skill)| {
            let picks = progression.pick_count(&skill.id);
            let unlockable = progression.can_unlock_definition(skill).is_ok();

            let color = if i == app.selected_skill {
                Color::Yellow
            } else if unlockable {
                Color::White
            } else {
                Color::DarkGray
            };
            let mut style = Style::default().fg(color);
            if i == app.selected_skill {
                style = style.add_modifier(Modifier::BOLD);
            }

            let prefix = if i == app.selected_skill { "► " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:20}", prefix, skill.name()), style),
                Span::styled(pick_label(skill, picks), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Skills (↑/↓ to select, Enter to unlock) "),
    );

    f.render_widget(list, area);
}

fn pick_label(skill: &SkillDefinition, picks: u32) -> String {
    if skill.is_unlimited() {
        format!("{}/∞", picks)
    } else {
        format!("{}/{}", picks, skill.max_picks)
    }
}

fn draw_skill_details(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();
    let Some(skill) = app.selected_skill_def() else {
        f.render_widget(
            Paragraph::new("No skills configured")
                .block(Block::default().borders(Borders::ALL).title(" Details ")),
            area,
        );
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        skill.name().to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];
    if !skill.description.is_empty() {
        lines.push(Line::from(Span::styled(
            skill.description.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    lines.push(section("Requirements"));
    lines.push(Line::from(vec![
        Span::styled("Level:       ", Style::default().fg(Color::Gray)),
        Span::styled(skill.required_level.to_string(), Style::default().fg(Color::White)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Cost:        ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{} pt", skill.cost), Style::default().fg(Color::White)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Picks:       ", Style::default().fg(Color::Gray)),
        Span::styled(
            pick_label(skill, progression.pick_count(&skill.id)),
            Style::default().fg(Color::White),
        ),
    ]));
    if !skill.prerequisites.is_empty() {
        let joiner = match skill.prerequisite_mode {
            PrerequisiteMode::All => " and ",
            PrerequisiteMode::Any => " or ",
        };
        let mut spans = vec![Span::styled("Requires:    ", Style::default().fg(Color::Gray))];
        for (i, prerequisite) in skill.prerequisites.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(joiner, Style::default().fg(Color::Gray)));
            }
            let name = progression
                .skills()
                .get(prerequisite)
                .map(SkillDefinition::name)
                .unwrap_or(prerequisite.as_str())
                .to_string();
            let color = if progression.history().has_picked(prerequisite) {
                Color::Green
            } else {
                Color::Red
            };
            spans.push(Span::styled(name, Style::default().fg(color)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    lines.push(section("Effects"));
    for effect in &skill.effects {
        let amount = match effect.operation {
            ModifierOp::Add => format!("{:+}", effect.amount),
            ModifierOp::Mult => format!("{:+.0}%", effect.amount * 100.0),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:16}", display_name(effect.attribute)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(amount, Style::default().fg(Color::Green)),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(section("If picked now"));
    if app.preview.is_empty() {
        lines.push(Line::from(Span::styled("  no change", Style::default().fg(Color::DarkGray))));
    }
    for delta in &app.preview {
        let color = if delta.change() >= 0.0 { Color::Green } else { Color::Red };
        lines.push(Line::from(Span::styled(
            format!("  {}", delta.describe()),
            Style::default().fg(color),
        )));
    }
    lines.push(Line::from(""));

    let status = match progression.can_unlock_definition(skill) {
        Ok(()) => Span::styled("Can unlock", Style::default().fg(Color::Green)),
        Err(reason) => Span::styled(reason.to_string(), Style::default().fg(Color::Red)),
    };
    lines.push(Line::from(status));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
