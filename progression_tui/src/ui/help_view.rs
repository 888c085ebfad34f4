//! Help tab view

use super::section;
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, _app: &App, area: Rect) {
    let lines = vec![
        section("Navigation"),
        key_line("1-4", "Jump to tab (Stats/Skills/Level Up/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Move selection"),
        key_line("q / Ctrl+C", "Quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        section("Progress"),
        key_line("x", "Gain experience"),
        key_line("L", "Gain a full level"),
        key_line("Enter (Stats)", "Spend points on the selected attribute"),
        key_line("Enter (Skills)", "Unlock the selected skill directly"),
        key_line("s / l", "Save / load progress"),
        key_line("R", "Reset progress"),
        Line::from(""),
        section("Level Up"),
        key_line("1 / 2 / 3", "Take the skill in that slot"),
        key_line("r", "Reroll the choices (once per panel)"),
        key_line("d", "Skip a panel with no choices"),
        key_line("c", "Keep playing after the run completes"),
        Line::from(""),
        section("Rules"),
        Line::from(Span::styled("Attribute value:", Style::default().fg(Color::Yellow))),
        Line::from("  Final = (Base + Σ Flat) × (1 + Σ Mult)"),
        Line::from("  Order of picks never changes the result"),
        Line::from(""),
        Line::from(Span::styled("Unlocking a skill needs:", Style::default().fg(Color::Yellow))),
        Line::from("  Picks left, its prerequisites (all or any), the level, and points"),
        Line::from(""),
        Line::from(Span::styled("Level-up choices:", Style::default().fg(Color::Yellow))),
        Line::from("  Drawn by weight from skills you can unlock right now"),
        Line::from("  A refused pick draws new choices for the same level"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
