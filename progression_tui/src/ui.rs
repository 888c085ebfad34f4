//! UI rendering

mod help_view;
mod panel_view;
mod skills_view;
mod stat_view;

use crate::app::{App, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(3), // Level / XP / points
            Constraint::Min(0),    // Content
            Constraint::Length(6), // Message log
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_progress(f, app, chunks[1]);

    match app.current_tab {
        Tab::Stats => stat_view::draw(f, app, chunks[2]),
        Tab::Skills => skills_view::draw(f, app, chunks[2]),
        Tab::LevelUp => panel_view::draw(f, app, chunks[2]),
        Tab::Help => help_view::draw(f, app, chunks[2]),
    }

    draw_log(f, app, chunks[3]);
    draw_keybindings(f, app, chunks[4]);
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let progression = app.session.progression();
    let pool = progression.pool();
    let needed = pool.xp_required_for_next_level(progression.settings());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    let summary = Line::from(vec![
        Span::styled("Level ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:<4}", pool.level()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Points ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:<4}", pool.spendable_points()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}/{}", pool.xp(), needed),
            Style::default().fg(Color::White),
        ),
    ]);
    f.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title(" Player ")),
        chunks[0],
    );

    let bar_width = chunks[1].width.saturating_sub(2);
    let bar = progress_bar(pool.xp() as f64, needed as f64, bar_width, Color::Magenta)
        .block(Block::default().borders(Borders::ALL).title(" XP "));
    f.render_widget(bar, chunks[1]);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let log = app.log.borrow();
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = log
        .iter()
        .skip(log.len().saturating_sub(visible))
        .map(|msg| Line::from(Span::styled(msg.clone(), Style::default().fg(Color::White))))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Log "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![("Tab", "Next tab"), ("x", "+XP"), ("q", "Quit")];

    let tab_keys: Vec<(&str, &str)> = match app.current_tab {
        Tab::Stats => vec![("↑/↓", "Select"), ("Enter", "Upgrade")],
        Tab::Skills => vec![("↑/↓", "Select"), ("Enter", "Unlock")],
        Tab::LevelUp => vec![("1-3", "Pick"), ("r", "Reroll"), ("d", "Skip"), ("c", "Continue")],
        Tab::Help => vec![("s/l", "Save/Load")],
    };

    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in tab_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }

    if !tab_keys.is_empty() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    }

    for (i, (key, desc)) in common_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Progression "))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

pub fn progress_bar(current: f64, max: f64, width: u16, filled_color: Color) -> Paragraph<'static> {
    let percent = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (percent * width as f64) as usize;
    let empty = (width as usize).saturating_sub(filled);

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    Paragraph::new(bar).style(Style::default().fg(filled_color))
}

pub fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

/// Name column followed by a value, highlighted when it differs from base
pub fn stat_line(name: &str, value: String, modified: bool) -> Line<'static> {
    let value_color = if modified { Color::Green } else { Color::White };
    Line::from(vec![
        Span::styled(format!("{:16}", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(value_color)),
    ])
}
