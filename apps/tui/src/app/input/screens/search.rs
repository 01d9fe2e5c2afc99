use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use prefmap_core::MapEvent;

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.screen = AppScreen::Map,
        KeyCode::Up => {
            app.search.selected = wrap_decrement(app.search.selected, app.search.matches.len());
        }
        KeyCode::Down | KeyCode::Tab => {
            app.search.selected = wrap_increment(app.search.selected, app.search.matches.len());
        }
        KeyCode::Enter => {
            let choice = app
                .search
                .matches
                .get(app.search.selected)
                .map(|(key, _)| key.clone());
            app.screen = AppScreen::Map;
            if let Some(key) = choice {
                app.dispatch(MapEvent::Focus(key));
            }
        }
        KeyCode::Backspace => {
            app.search.query.pop();
            app.update_search();
        }
        KeyCode::Char(c) => {
            app.search.query.push(c);
            app.update_search();
        }
        _ => {}
    }
}
