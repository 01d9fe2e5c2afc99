use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub fn render_search(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title(" Jump to prefecture ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [query_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Cyan)),
            Span::raw(app.search.query.as_str()),
        ])),
        query_area,
    );

    let items: Vec<ListItem<'_>> = app
        .search
        .matches
        .iter()
        .map(|(key, name)| {
            ListItem::new(Line::from(vec![
                Span::raw(name.as_str()),
                Span::styled(format!("  {key}"), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.search.selected));
    f.render_stateful_widget(list, list_area, &mut state);
}
