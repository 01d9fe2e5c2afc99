use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::input::ZOOM_STEP;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use prefmap_core::notice::DismissReason;
use prefmap_core::MapEvent;

/// Surface units moved per arrow key press
const PAN_STEP: f64 = 40.0;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if app.map.selection().detail_open {
                app.dispatch(MapEvent::ClosePanel);
            } else {
                app.dispatch(MapEvent::PointerLeave);
            }
        }
        KeyCode::Tab => app.dispatch(MapEvent::HoverNext),
        KeyCode::BackTab => app.dispatch(MapEvent::HoverPrevious),
        KeyCode::Enter => app.dispatch(MapEvent::FocusHovered),
        KeyCode::Left => app.dispatch(MapEvent::Pan {
            dx: PAN_STEP,
            dy: 0.0,
        }),
        KeyCode::Right => app.dispatch(MapEvent::Pan {
            dx: -PAN_STEP,
            dy: 0.0,
        }),
        KeyCode::Up => app.dispatch(MapEvent::Pan {
            dx: 0.0,
            dy: PAN_STEP,
        }),
        KeyCode::Down => app.dispatch(MapEvent::Pan {
            dx: 0.0,
            dy: -PAN_STEP,
        }),
        KeyCode::Char('+' | '=') => app.dispatch(MapEvent::Zoom {
            anchor: None,
            factor: ZOOM_STEP,
        }),
        KeyCode::Char('-') => app.dispatch(MapEvent::Zoom {
            anchor: None,
            factor: ZOOM_STEP.recip(),
        }),
        KeyCode::Char('/') => {
            app.search.query.clear();
            app.update_search();
            app.screen = AppScreen::Search;
        }
        KeyCode::Char('e') => app.dispatch(MapEvent::OpenEdit),
        KeyCode::Char('n') => app.open_entry_form(),
        KeyCode::Char('j') => {
            app.timeline.selected =
                wrap_increment(app.timeline.selected, app.timeline.entries.len());
        }
        KeyCode::Char('k') => {
            app.timeline.selected =
                wrap_decrement(app.timeline.selected, app.timeline.entries.len());
        }
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('r') => app.refresh_timeline(),
        KeyCode::Char('x') => app.notices.dismiss(DismissReason::CloseButton),
        _ => {}
    }
}
