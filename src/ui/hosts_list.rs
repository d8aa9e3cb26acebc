use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::footer::draw_footer;
use crate::app::App;

/// Info panel width, borders included.
const INFO_WIDTH: u16 = 62;

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(3),    // Main content
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.size());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(INFO_WIDTH)].as_ref())
        .split(chunks[0]);

    draw_hosts_panel::<B>(f, app, panels[0]);
    draw_info_panel::<B>(f, app, panels[1]);
    draw_footer::<B>(f, app, chunks[1]);
}

fn draw_hosts_panel<B: Backend>(f: &mut Frame, app: &mut App, area: Rect) {
    let list_area = if app.filter.is_active() {
        let filter_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3), // Filter input
                    Constraint::Min(0),    // Matches
                ]
                .as_ref(),
            )
            .split(area);

        let cursor = if app.filter.editing { "█" } else { "" };
        let border = if app.filter.editing {
            Color::Yellow
        } else {
            Color::Gray
        };
        let filter_input = Paragraph::new(format!("{}{}", app.filter.query, cursor))
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" 🔍 Filter ")
                    .border_style(Style::default().fg(border)),
            );
        f.render_widget(filter_input, filter_chunks[0]);
        filter_chunks[1]
    } else {
        area
    };

    let items: Vec<ListItem> = app
        .visible_hosts
        .iter()
        .filter_map(|&idx| app.hosts.get(idx))
        .map(|host| {
            let mut spans = vec![Span::styled(
                host.name.clone(),
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            )];
            if !host.display_hint.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", host.display_hint),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" 👤 Hosts ({}/{}) ", app.visible_hosts.len(), app.hosts.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(title);

    if items.is_empty() {
        let message = if app.filter.query.is_empty() {
            "No hosts left".to_string()
        } else {
            format!("No results for '{}'", app.filter.query)
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, list_area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, list_area, &mut app.host_list_state);
}

fn draw_info_panel<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Info ");

    let info = Paragraph::new(app.info_panel.as_str())
        .style(Style::default().fg(Color::White))
        .block(block);

    f.render_widget(info, area);
}

#[cfg(test)]
mod tests {
    use crate::ui::test_support::{app, render};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    const CONFIG: &str = "Host jump\n  Hostname 10.0.0.1\n  User ops\n\nHost app\n  ProxyJump jump\n";

    #[test]
    fn test_lists_hosts_with_hints_and_info() {
        let mut app = app(CONFIG);
        let screen = render(&mut app, 120, 20).join("\n");

        assert!(screen.contains("jump  ops@10.0.0.1"));
        assert!(screen.contains("app"));
        assert!(screen.contains("Hosts (2/2)"));
        assert!(screen.contains("Jumped by:"));
    }

    #[test]
    fn test_filter_box_shows_query() {
        let mut app = app(CONFIG);
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE));
        let screen = render(&mut app, 120, 20).join("\n");

        assert!(screen.contains("Filter"));
        assert!(screen.contains("No results for 'z'"));
    }
}
