use crate::app::state::{App, AppScreen};
use crate::ui::layout::screen_layout;
use crate::ui::widgets::map::{cell_to_surface, surface_contains};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use prefmap_core::notice::DismissReason;
use prefmap_core::MapEvent;

/// Zoom factor per wheel notch or `+` press
pub const ZOOM_STEP: f64 = 1.25;

pub fn handle_mouse_input(app: &mut App, event: MouseEvent) {
    if app.screen != AppScreen::Map || app.show_help {
        return;
    }

    let surface = screen_layout(app.screen_area, app.map.selection().detail_open).surface;
    let (column, row) = (event.column, event.row);
    let inside = surface_contains(surface, column, row);
    let (x, y) = cell_to_surface(surface, column, row);

    match event.kind {
        MouseEventKind::Moved => {
            if inside {
                app.dispatch(MapEvent::PointerMove { x, y });
            } else {
                app.dispatch(MapEvent::PointerLeave);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.notices.dismiss(DismissReason::ClickAway);
            app.pointer.pressed_at = inside.then_some((column, row));
            app.pointer.dragging = false;
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some((start_column, start_row)) = app.pointer.pressed_at else {
                return;
            };
            if !app.pointer.dragging {
                let (start_x, start_y) = cell_to_surface(surface, start_column, start_row);
                app.dispatch(MapEvent::DragStart {
                    x: start_x,
                    y: start_y,
                });
                app.pointer.dragging = true;
            }
            app.dispatch(MapEvent::DragMove { x, y });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.pointer.dragging {
                app.dispatch(MapEvent::DragEnd);
            } else if app.pointer.pressed_at.is_some() && inside {
                app.dispatch(MapEvent::Click { x, y });
            }
            app.pointer.pressed_at = None;
            app.pointer.dragging = false;
        }
        MouseEventKind::ScrollUp if inside => app.dispatch(MapEvent::Zoom {
            anchor: Some((x, y)),
            factor: ZOOM_STEP,
        }),
        MouseEventKind::ScrollDown if inside => app.dispatch(MapEvent::Zoom {
            anchor: Some((x, y)),
            factor: ZOOM_STEP.recip(),
        }),
        _ => {}
    }
}
