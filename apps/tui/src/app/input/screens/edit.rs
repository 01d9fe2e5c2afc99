use crate::app::state::{AnnotationField, App};
use crossterm::event::KeyCode;
use prefmap_core::MapEvent;

pub fn handle_edit_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.dispatch(MapEvent::CancelEdit),
        KeyCode::Enter => app.dispatch(MapEvent::SubmitEdit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.annotation_field = match app.annotation_field {
                AnnotationField::Description => AnnotationField::Image,
                AnnotationField::Image => AnnotationField::Description,
            };
        }
        KeyCode::Backspace => {
            let field = app.annotation_field;
            if let Some(buffer) = app.map.edit_buffer_mut() {
                match field {
                    AnnotationField::Description => buffer.description.pop(),
                    AnnotationField::Image => buffer.preview_image.pop(),
                };
            }
        }
        KeyCode::Char(c) => {
            let field = app.annotation_field;
            if let Some(buffer) = app.map.edit_buffer_mut() {
                match field {
                    AnnotationField::Description => buffer.description.push(c),
                    AnnotationField::Image => buffer.preview_image.push(c),
                }
            }
        }
        _ => {}
    }
}
