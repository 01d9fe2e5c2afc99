use crate::app::App;
use crate::ui::layout::ScreenLayout;
use crate::ui::screens::detail::render_detail_panel;
use crate::ui::widgets::map::render_map;
use prefmap_core::Phase;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

pub fn render_map_screen(app: &App, f: &mut Frame<'_>, layout: &ScreenLayout) {
    let block = Block::default()
        .title(Span::styled(
            " 日本 prefmap ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title(
            Line::from(format!(" zoom {:.2}x ", app.map.transform().scale)).right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, layout.map);

    if app.loading {
        let throbber = Throbber::default()
            .label("Loading prefecture boundaries…")
            .style(Style::default().fg(Color::Cyan));
        f.render_widget(
            Paragraph::new(throbber.to_line(&app.throbber)).alignment(Alignment::Center),
            middle_line(layout.surface),
        );
    } else if let (Some(error), true) = (app.map.load_error(), app.map.regions().is_empty()) {
        f.render_widget(
            Paragraph::new(format!("Map unavailable: {error}"))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            middle_line(layout.surface),
        );
    } else {
        render_map(app, f, layout.surface);
    }

    if let Some(panel) = layout.panel {
        render_detail_panel(app, f, panel);
    }

    render_status_bar(app, f, layout.status);
}

fn middle_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1.min(area.height),
    }
}

fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let phase = match app.map.phase() {
        Phase::Idle => "idle".to_string(),
        Phase::Hovering(key) => format!("hover {}", display_name(app, key.as_str())),
        Phase::Focused(key) => format!("focus {}", display_name(app, key.as_str())),
        Phase::Editing(key) => format!("editing {}", display_name(app, key.as_str())),
    };
    let hints = if app.map.selection().detail_open {
        "e edit  n new entry  j/k select  d delete  r refresh  Esc close  F1 help"
    } else {
        "Tab hover  Enter focus  / search  arrows pan  +/- zoom  q quit  F1 help"
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {phase} "),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn display_name<'a>(app: &'a App, key: &'a str) -> &'a str {
    app.map
        .region(key)
        .map_or(key, |region| region.feature.display_name.as_str())
}
