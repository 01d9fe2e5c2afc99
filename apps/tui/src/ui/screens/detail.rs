use crate::app::App;
use crate::ui::widgets::timeline::render_timeline;
use prefmap_core::DESCRIPTION_CHAR_CAP;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Right-hand drawer with the focused prefecture's commentary and timeline.
pub fn render_detail_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(panel) = app.map.panel() else {
        return;
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", panel.annotation.display_name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [summary, timeline] =
        Layout::vertical([Constraint::Percentage(45), Constraint::Min(3)]).areas(inner);

    let mut lines = vec![
        Line::from(Span::styled(
            panel.key.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(panel.annotation.description.as_str()),
        Line::from(Span::styled(
            format!(
                "{}/{DESCRIPTION_CHAR_CAP}",
                panel.annotation.description.chars().count()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                panel.annotation.preview_image.as_str(),
                Style::default().fg(Color::Blue),
            ),
        ]),
    ];
    if panel.placeholder {
        lines.push(Line::from(Span::styled(
            "No data for this prefecture yet",
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        summary,
    );
    render_timeline(&app.timeline, f, timeline);
}
