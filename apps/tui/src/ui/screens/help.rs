use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: &[(&str, &str)] = &[
    ("Mouse", "hover highlights, click focuses, drag pans, wheel zooms"),
    ("Tab / Shift-Tab", "hover next / previous prefecture"),
    ("Enter", "focus the hovered prefecture"),
    ("Arrows", "pan the map"),
    ("+ / -", "zoom in / out"),
    ("/", "search prefectures by name"),
    ("e", "edit the focused prefecture's commentary"),
    ("n", "add a timeline entry"),
    ("j / k", "select timeline entry"),
    ("d", "delete the selected entry"),
    ("r", "reload the timeline"),
    ("x", "close the notice"),
    ("Esc", "close panel or dialog"),
    ("q", "quit"),
];

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            "Japan prefecture map",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(SHORTCUTS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {key:<16}"), key_style),
            Span::raw(*action),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "Press F1 or Esc to close",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
    );

    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }).block(
            Block::default()
                .title("== Help & Keyboard Shortcuts ==")
                .title_style(key_style)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        popup_area,
    );
}
