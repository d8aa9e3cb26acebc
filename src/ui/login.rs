use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, footer::draw_footer};
use crate::app::{App, Screen};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MASK: char = '•';

pub fn draw_password<B: Backend>(f: &mut Frame, app: &App) {
    let Screen::Authenticate {
        host,
        password,
        error,
    } = &app.screen
    else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Host header
                Constraint::Length(1), // Error
                Constraint::Length(1),
                Constraint::Length(1), // Password input
                Constraint::Min(0),
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.size());

    let header = Paragraph::new(Span::styled(
        host.as_str(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(header, chunks[0]);

    if let Some(error) = error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(error, chunks[1]);
    }

    let masked: String = std::iter::repeat(MASK).take(password.chars().count()).collect();
    let input = Paragraph::new(Line::from(vec![
        Span::styled("enter password: ", Style::default().fg(Color::Cyan)),
        Span::raw(masked),
        Span::styled("█", Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(input, chunks[3]);

    draw_footer::<B>(f, app, chunks[5]);
}

pub fn draw_connecting<B: Backend>(f: &mut Frame, app: &App) {
    let Screen::Connecting { request } = &app.screen else {
        return;
    };

    let area = centered_rect(50, 30, f.size());
    let frame = SPINNER[app.spinner_frame % SPINNER.len()];

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(frame, Style::default().fg(Color::Yellow)),
            Span::styled(" Logging in...", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Host: ", Style::default().fg(Color::Gray)),
            Span::styled(request.host.as_str(), Style::default().fg(Color::Green)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" SSH Login ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
