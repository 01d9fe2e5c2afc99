use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Fixed-height popup, centred, for dialogs whose content has a known line count.
pub fn centered_lines(percent_x: u16, lines: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(lines.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centred() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!((popup.width, popup.height), (60, 20));
        assert_eq!((popup.x, popup.y), (20, 15));
    }

    #[test]
    fn line_popup_never_exceeds_the_area() {
        let popup = centered_lines(50, 12, Rect::new(0, 0, 40, 8));
        assert_eq!(popup.height, 8);
        assert_eq!(popup.width, 20);
    }
}
