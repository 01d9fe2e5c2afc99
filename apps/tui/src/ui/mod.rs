// UI module for prefmap
// Renders the map screen plus whichever dialog is active

pub mod layout;
pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let layout = layout::screen_layout(area, app.map.selection().detail_open);

    screens::map::render_map_screen(app, f, &layout);

    match app.screen {
        AppScreen::Map => {}
        AppScreen::EditAnnotation => screens::edit::render_edit(app, f, area),
        AppScreen::EntryForm => screens::entry_form::render_entry_form(app, f, area),
        AppScreen::DeleteConfirm => screens::delete_confirm::render_delete_confirm(app, f, area),
        AppScreen::Search => screens::search::render_search(app, f, area),
    }

    if let Some(notice) = app.notices.current() {
        widgets::notice::render_notice(notice, f, layout.map);
    }

    if app.show_help {
        screens::help::render_help(f, area);
    }
}
