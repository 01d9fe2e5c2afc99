use crate::app::state::EntryField;
use crate::app::App;
use crate::ui::screens::edit::field_block;
use crate::ui::widgets::popup::centered_rect;
use prefmap_core::DESCRIPTION_CHAR_CAP;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_entry_form(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(panel) = app.map.panel() else {
        return;
    };

    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);
    let footer = if app.submit.is_busy() {
        " Submitting… "
    } else {
        " Enter submit · Tab next field · Esc close "
    };
    let block = Block::default()
        .title(format!(" New timeline entry: {} ", panel.annotation.display_name))
        .title_bottom(Line::from(footer).centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let areas = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(3),
    ])
    .split(inner);

    for (field, field_area) in EntryField::ALL.into_iter().zip(areas.iter()) {
        let value = app.entry_form.value(field);
        let title = if field == EntryField::Description {
            format!(
                "{} {}/{DESCRIPTION_CHAR_CAP}",
                field.label(),
                value.chars().count()
            )
        } else {
            field.label().to_string()
        };
        f.render_widget(
            Paragraph::new(value)
                .wrap(Wrap { trim: false })
                .block(field_block(&title, app.entry_form.field == field)),
            *field_area,
        );
    }
}
