use crate::app::App;
use crate::ui::widgets::popup::centered_lines;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_delete_confirm(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(entry) = app.timeline.selected_entry() else {
        return;
    };

    let popup = centered_lines(50, 7, area);
    f.render_widget(Clear, popup);

    let text = Text::from(vec![
        Line::from("Delete this timeline entry?"),
        Line::from(Span::styled(
            format!("{} · {}", entry.created_date(), entry.explanatory),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" keep"),
        ]),
    ]);

    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Confirm ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        popup,
    );
}
