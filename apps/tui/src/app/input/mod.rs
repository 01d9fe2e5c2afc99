mod helpers;
mod mouse;
pub mod screens;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseEvent};

pub use mouse::ZOOM_STEP;

pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}

pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    mouse::handle_mouse_input(app, event);
}
