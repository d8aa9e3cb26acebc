use crate::app::{App, Screen};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw_footer<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (nav_text, action_text) = match app.screen {
        Screen::Browse if app.filter.editing => (
            "↑: Up  ↓: Down  [Enter] Apply filter",
            "[Esc] Clear filter  Type to filter",
        ),
        Screen::Browse => (
            "↑/k: Up  ↓/j: Down  [Enter] Connect  [/] Filter",
            "[x] Delete [?] Help [q] Quit",
        ),
        Screen::Authenticate { .. } => ("[Enter] Log in", "[Esc] Go back"),
        Screen::Connecting { .. } => ("Checking password...", ""),
    };

    let connecting = matches!(app.screen, Screen::Connecting { .. });
    let nav_help = Paragraph::new(nav_text).style(Style::default().fg(if connecting {
        Color::Yellow
    } else {
        Color::Gray
    }));

    let action_help = Paragraph::new(action_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(ratatui::layout::Alignment::Right);

    f.render_widget(nav_help, footer[0]);
    f.render_widget(action_help, footer[1]);
}
