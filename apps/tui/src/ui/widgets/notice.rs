use prefmap_core::notice::{Notice, Severity};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub const fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
    }
}

/// Snackbar in the bottom-left corner, above the status line.
pub fn render_notice(notice: &Notice, f: &mut Frame<'_>, area: Rect) {
    let width = area.width.min(60);
    let height = 3;
    if area.height < height + 2 || width < 10 {
        return;
    }
    let rect = Rect {
        x: area.x + 1,
        y: area.bottom().saturating_sub(height + 1),
        width,
        height,
    };

    let color = severity_color(notice.severity);
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", notice.severity.as_str().to_uppercase()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(notice.message.as_str()),
    ]);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(line).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title_bottom(Line::from(" x to close ").right_aligned()),
        ),
        rect,
    );
}
