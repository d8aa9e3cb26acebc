use ratatui::{
    backend::Backend,
    layout::Margin,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

pub fn render_help_popup<B: Backend>(f: &mut Frame) {
    let block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White));

    let area = centered_rect(60, 80, f.size());
    f.render_widget(Clear, area); // this clears the background
    f.render_widget(block, area);

    let paragraph = Paragraph::new(get_help_text()).style(Style::default().fg(Color::White));

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    }); // Get area inside the block borders

    f.render_widget(paragraph, inner_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
    ))
}

fn shortcut<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(Color::Green)),
        Span::raw(format!("- {}", action)),
    ])
}

fn get_help_text<'a>() -> Text<'a> {
    Text::from(vec![
        section("Host List"),
        shortcut("Enter", "Log in to selected host"),
        shortcut("j, ↓", "Move down"),
        shortcut("k, ↑", "Move up"),
        shortcut("g, Home", "First host"),
        shortcut("G, End", "Last host"),
        shortcut("PgUp, PgDn", "Jump a page"),
        shortcut("/", "Filter hosts"),
        shortcut("x, Delete", "Delete host block from config"),
        shortcut("q, Ctrl+C", "Quit"),
        Line::from(""),
        section("Filter"),
        shortcut("Enter", "Keep filter, back to list"),
        shortcut("Esc", "Clear filter"),
        shortcut("Backspace", "Delete last character"),
        Line::from(""),
        section("Password"),
        shortcut("Enter", "Log in"),
        shortcut("Esc", "Back to host list"),
        shortcut("Ctrl+U", "Clear password"),
        Line::from(""),
        section("Help Popup"),
        shortcut("?, Esc", "Close help"),
    ])
}
