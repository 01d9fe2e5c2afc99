use crate::app::state::TimelineView;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub fn render_timeline(timeline: &TimelineView, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" Timeline ({}) ", timeline.entries.len()))
        .borders(Borders::TOP);

    if let Some(error) = &timeline.error {
        f.render_widget(
            Paragraph::new(format!("Timeline unavailable: {error}"))
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        );
        return;
    }
    if timeline.entries.is_empty() {
        let text = if timeline.loading {
            "Loading timeline…"
        } else {
            "No entries yet. Press n to add one."
        };
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem<'_>> = timeline
        .entries
        .iter()
        .map(|entry| {
            let writer = if entry.writer_name.is_empty() {
                "anonymous"
            } else {
                entry.writer_name.as_str()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(entry.created_date(), Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::styled(writer, Style::default().fg(Color::Yellow)),
                ]),
                Line::from(entry.explanatory.as_str()),
                Line::from(Span::styled(
                    entry.image_path.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(timeline.selected));
    f.render_stateful_widget(list, area, &mut state);
}
