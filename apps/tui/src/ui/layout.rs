use crate::ui::widgets::map::surface_rect;
use ratatui::layout::{Constraint, Layout, Margin, Rect};

/// Where each part of the main screen goes for a terminal area.
///
/// Rendering and mouse hit-testing both use this, so a click lands where
/// the map was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub map: Rect,
    /// Letterboxed 4:3 drawing surface inside the map border
    pub surface: Rect,
    pub panel: Option<Rect>,
    pub status: Rect,
}

pub fn screen_layout(area: Rect, panel_open: bool) -> ScreenLayout {
    let rows = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let (map, panel) = if panel_open {
        let columns = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[0], None)
    };

    ScreenLayout {
        map,
        surface: surface_rect(map.inner(Margin::new(1, 1))),
        panel,
        status: rows[1],
    }
}
