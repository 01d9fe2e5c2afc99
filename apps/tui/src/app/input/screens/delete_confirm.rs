use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_delete_confirm_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.screen = AppScreen::Map,
        _ => {}
    }
}
