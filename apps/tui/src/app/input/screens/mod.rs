use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod delete_confirm;
mod edit;
mod entry_form;
mod help;
mod map;
mod search;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::EditAnnotation => edit::handle_edit_input(app, key),
        AppScreen::EntryForm => entry_form::handle_entry_form_input(app, key),
        AppScreen::DeleteConfirm => delete_confirm::handle_delete_confirm_input(app, key),
        AppScreen::Search => search::handle_search_input(app, key),
    }
}
