//! Stats tab view

use super::{section, stat_line};
use crate::app::App;
use progression_core::display::{display_name, format_value};
use progression_core::{AttributeId, ModifierOp};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_attribute_list(f, app, chunks[0]);
    draw_attribute_details(f, app, chunks[1]);
}

fn draw_attribute_list(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();
    let selected = app.selected_attribute_id();

    let lines: Vec<Line> = AttributeId::all()
        .iter()
        .map(|&id| {
            let breakdown = progression.breakdown(id);
            let rank = progression.attributes().rank_of(id);
            let max_rank = progression
                .attributes()
                .get(id)
                .map(|def| def.max_rank)
                .unwrap_or(0);

            let prefix = if id == selected { "► " } else { "  " };
            let mut line = stat_line(
                &format!("{}{}", prefix, display_name(id)),
                format!("{:>8}", format_value(id, breakdown.compute())),
                breakdown.is_modified(),
            );
            line.spans.push(Span::styled(
                format!("  [{}/{}]", rank, max_rank),
                Style::default().fg(Color::DarkGray),
            ));
            if id == selected {
                line = line.style(Style::default().add_modifier(Modifier::BOLD));
            }
            line
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Attributes (Enter to upgrade) "),
    );

    f.render_widget(paragraph, area);
}

fn draw_attribute_details(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();
    let id = app.selected_attribute_id();
    let breakdown = progression.breakdown(id);

    let mut lines = vec![
        Line::from(Span::styled(
            display_name(id),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(def) = progression.attributes().get(id) {
        if !def.description.is_empty() {
            lines.push(Line::from(Span::styled(
                def.description.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));

    lines.push(section("Calculation"));
    lines.push(stat_line("Base", format_value(id, breakdown.base), false));
    lines.push(stat_line(
        "Flat",
        format!("{:+}", breakdown.flat),
        breakdown.flat != 0.0,
    ));
    lines.push(stat_line(
        "Multiplier",
        format!("×{:.2}", breakdown.total_increased_multiplier()),
        breakdown.total_increased_multiplier() != 1.0,
    ));
    lines.push(stat_line("Final", format_value(id, breakdown.compute()), breakdown.is_modified()));
    lines.push(Line::from(Span::styled(
        "  (Base + Flat) × (1 + Σ Mult)",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    lines.push(section("Sources"));
    let ledger = progression.ledger();
    let mut any_source = false;
    for source in ledger.sources() {
        for entry in ledger.entries(source).unwrap_or(&[]) {
            if entry.attribute != id {
                continue;
            }
            any_source = true;
            let amount = match entry.operation {
                ModifierOp::Add => format!("{:+}", entry.amount),
                ModifierOp::Mult => format!("{:+.0}%", entry.amount * 100.0),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:20}", source.to_string()), Style::default().fg(Color::Gray)),
                Span::styled(amount, Style::default().fg(Color::Green)),
            ]));
        }
    }
    if !any_source {
        lines.push(Line::from(Span::styled("  none", Style::default().fg(Color::DarkGray))));
    }
    lines.push(Line::from(""));

    lines.push(section("Upgrade"));
    let status = match progression.can_upgrade_attribute(id) {
        Ok(()) => Span::styled("Available", Style::default().fg(Color::Green)),
        Err(reason) => Span::styled(reason.to_string(), Style::default().fg(Color::Red)),
    };
    lines.push(Line::from(status));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
