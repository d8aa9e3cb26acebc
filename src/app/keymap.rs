use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::types::Screen;
use crate::app::App;

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Plain typed character, no Ctrl/Alt chord.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Browse if self.show_help => self.handle_help_key(key),
            Screen::Browse if self.filter.editing => self.handle_filter_key(key),
            Screen::Browse => self.handle_browse_key(key),
            Screen::Authenticate { .. } => self.handle_password_key(key),
            // Nothing is accepted until the probe answers.
            Screen::Connecting { .. } => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.quit();
            return;
        }
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            self.show_help = false;
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.clear_filter();
            }
            KeyCode::Enter => {
                self.filter.editing = false;
            }
            KeyCode::Backspace => {
                self.pop_filter_char();
            }
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.push_filter_char(c);
                }
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => {
                if self.filter.is_active() {
                    self.clear_filter();
                } else {
                    self.quit();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Enter => self.confirm_selection(),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_highlighted(),
            KeyCode::Char('/') => self.start_filter(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_password_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_authentication(),
            KeyCode::Enter => self.submit_password(),
            _ => {
                let Screen::Authenticate { password, .. } = &mut self.screen else {
                    return;
                };
                match key.code {
                    KeyCode::Backspace => {
                        password.pop();
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        password.clear();
                    }
                    _ => {
                        if let Some(c) = typed_char(&key) {
                            password.push(c);
                        }
                    }
                }
            }
        }
    }
}
