use crate::app::state::AnnotationField;
use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use prefmap_core::DESCRIPTION_CHAR_CAP;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_edit(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (Some(buffer), Some(panel)) = (app.map.edit_buffer(), app.map.panel()) else {
        return;
    };

    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title(format!(" Edit {} ", panel.annotation.display_name))
        .title_bottom(Line::from(" Enter save · Tab switch field · Esc cancel ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [description_area, image_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(3)]).areas(inner);

    let count = buffer.description.chars().count();
    let count_style = if count > DESCRIPTION_CHAR_CAP {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    f.render_widget(
        Paragraph::new(buffer.description.as_str())
            .wrap(Wrap { trim: false })
            .block(field_block(
                "Description",
                app.annotation_field == AnnotationField::Description,
            )
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {count}/{DESCRIPTION_CHAR_CAP} "),
                    count_style,
                ))
                .right_aligned(),
            )),
        description_area,
    );
    f.render_widget(
        Paragraph::new(buffer.preview_image.as_str()).block(field_block(
            "Preview image",
            app.annotation_field == AnnotationField::Image,
        )),
        image_area,
    );
}

pub fn field_block(title: &str, active: bool) -> Block<'static> {
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(style)
}
