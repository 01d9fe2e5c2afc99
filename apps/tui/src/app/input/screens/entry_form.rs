use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_entry_form_input(app: &mut App, key: KeyCode) {
    if app.submit.is_busy() {
        // Keys other than Esc wait for the running submission
        if key == KeyCode::Esc {
            app.screen = AppScreen::Map;
        }
        return;
    }

    match key {
        KeyCode::Esc => app.screen = AppScreen::Map,
        KeyCode::Enter => app.submit_entry(),
        KeyCode::Tab | KeyCode::Down => app.entry_form.field = app.entry_form.field.next(),
        KeyCode::BackTab | KeyCode::Up => {
            app.entry_form.field = app.entry_form.field.previous();
        }
        KeyCode::Backspace => {
            app.entry_form.value_mut().pop();
        }
        KeyCode::Char(c) => app.entry_form.value_mut().push(c),
        _ => {}
    }
}
