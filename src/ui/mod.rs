mod footer;
mod help_popup;
mod hosts_list;
mod login;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, Screen};

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Browse => hosts_list::draw::<B>(f, app),
        Screen::Authenticate { .. } => login::draw_password::<B>(f, app),
        Screen::Connecting { .. } => login::draw_connecting::<B>(f, app),
    }

    if app.show_help {
        help_popup::render_help_popup::<B>(f);
    }
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
