use crate::app::App;
use prefmap_core::geometry::{scanline_spans, ProjectedRegion, ProjectedRing};
use prefmap_core::projection::{SURFACE_HEIGHT, SURFACE_WIDTH};
use prefmap_core::ViewTransform;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::Frame;

/// Braille dots per terminal cell
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

const OUTLINE: Color = Color::Gray;
const SELECTED_OUTLINE: Color = Color::Yellow;

/// Largest 4:3 area that fits in `area`, centred. Terminal cells are about
/// twice as tall as wide, so 4:3 on screen is 8:3 in cells.
pub fn surface_rect(area: Rect) -> Rect {
    let height_from_width = u32::from(area.width) * 3 / 8;
    let height = u32::from(area.height).min(height_from_width).max(1);
    let width = (height * 8 / 3).clamp(1, u32::from(area.width.max(1)));

    let width = u16::try_from(width).unwrap_or(area.width);
    let height = u16::try_from(height).unwrap_or(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn surface_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Centre of a terminal cell in surface coordinates. Cells outside the
/// surface map past its edges, which drags need.
pub fn cell_to_surface(rect: Rect, column: u16, row: u16) -> (f64, f64) {
    let width = f64::from(rect.width.max(1));
    let height = f64::from(rect.height.max(1));
    let dx = f64::from(column) - f64::from(rect.x) + 0.5;
    let dy = f64::from(row) - f64::from(rect.y) + 0.5;
    (dx / width * SURFACE_WIDTH, dy / height * SURFACE_HEIGHT)
}

/// Blend from the resting grey (#ccc) to the hover red (#f00).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hover_color(level: f64) -> Color {
    let level = level.clamp(0.0, 1.0);
    let channel = |from: f64, to: f64| (to - from).mul_add(level, from).round() as u8;
    Color::Rgb(
        channel(204.0, 255.0),
        channel(204.0, 0.0),
        channel(204.0, 0.0),
    )
}

pub fn render_map(app: &App, f: &mut Frame<'_>, surface: Rect) {
    if surface.width < 2 || surface.height < 2 {
        return;
    }

    let map = &app.map;
    let transform = map.transform();
    let dot_width = SURFACE_WIDTH / (f64::from(surface.width) * DOTS_X);
    let dot_height = SURFACE_HEIGHT / (f64::from(surface.height) * DOTS_Y);
    let selection = map.selection();
    let selected = selection
        .detail_open
        .then_some(selection.selected.as_ref())
        .flatten();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, SURFACE_WIDTH])
        .y_bounds([0.0, SURFACE_HEIGHT])
        .paint(|ctx| {
            for region in map.regions() {
                let level = map.hover_level(region.feature.key.as_str());
                if level > 0.0 {
                    fill_region(ctx, region, transform, dot_height, hover_color(level));
                }
            }
            ctx.layer();

            for region in map.regions() {
                let color = if selected == Some(&region.feature.key) {
                    SELECTED_OUTLINE
                } else {
                    OUTLINE
                };
                for ring in &region.rings {
                    draw_ring(ctx, ring, transform, dot_width.min(dot_height), color);
                }
            }

            if let Some(region) = selection.hover.as_ref().and_then(|key| map.region(key.as_str()))
            {
                let (x, y) = transform.apply(region.bounds.center());
                ctx.print(
                    x,
                    SURFACE_HEIGHT - y,
                    Span::styled(
                        region.feature.display_name.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    f.render_widget(canvas, surface);
}

fn screen_ring(ring: &ProjectedRing, transform: ViewTransform) -> ProjectedRing {
    ring.iter().map(|&point| transform.apply(point)).collect()
}

fn off_surface(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 < 0.0 && b.0 < 0.0)
        || (a.0 > SURFACE_WIDTH && b.0 > SURFACE_WIDTH)
        || (a.1 < 0.0 && b.1 < 0.0)
        || (a.1 > SURFACE_HEIGHT && b.1 > SURFACE_HEIGHT)
}

/// Outline a ring, dropping vertices closer than one dot to the last one drawn.
fn draw_ring(
    ctx: &mut Context<'_>,
    ring: &ProjectedRing,
    transform: ViewTransform,
    min_step: f64,
    color: Color,
) {
    let mut points = ring.iter().map(|&point| transform.apply(point));
    let Some(mut last) = points.next() else {
        return;
    };
    for point in points {
        if (point.0 - last.0).abs() < min_step && (point.1 - last.1).abs() < min_step {
            continue;
        }
        if !off_surface(last, point) {
            ctx.draw(&CanvasLine::new(
                last.0,
                SURFACE_HEIGHT - last.1,
                point.0,
                SURFACE_HEIGHT - point.1,
                color,
            ));
        }
        last = point;
    }
}

/// Fill a region one dot row at a time with even-odd spans.
fn fill_region(
    ctx: &mut Context<'_>,
    region: &ProjectedRegion,
    transform: ViewTransform,
    dot_height: f64,
    color: Color,
) {
    let rings: Vec<ProjectedRing> = region
        .rings
        .iter()
        .map(|ring| screen_ring(ring, transform))
        .collect();
    let (_, top) = transform.apply((region.bounds.min_x, region.bounds.min_y));
    let (_, bottom) = transform.apply((region.bounds.max_x, region.bounds.max_y));

    let mut y = top.max(0.0) + dot_height / 2.0;
    let end = bottom.min(SURFACE_HEIGHT);
    while y <= end {
        for (x0, x1) in scanline_spans(&rings, y) {
            let (x0, x1) = (x0.max(0.0), x1.min(SURFACE_WIDTH));
            if x0 < x1 {
                ctx.draw(&CanvasLine::new(
                    x0,
                    SURFACE_HEIGHT - y,
                    x1,
                    SURFACE_HEIGHT - y,
                    color,
                ));
            }
        }
        y += dot_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_letterboxed_to_four_by_three() {
        let wide = surface_rect(Rect::new(0, 0, 200, 30));
        assert_eq!(wide.height, 30);
        assert_eq!(wide.width, 80);
        assert_eq!(wide.x, 60);

        let tall = surface_rect(Rect::new(0, 0, 80, 60));
        assert_eq!(tall.height, 30);
        assert_eq!(tall.width, 80);
        assert_eq!(tall.y, 15);
    }

    #[test]
    fn cell_centres_map_onto_the_surface() {
        let rect = Rect::new(10, 5, 80, 30);
        let (x, y) = cell_to_surface(rect, 10, 5);
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);

        let (x, y) = cell_to_surface(rect, 89, 34);
        assert!((x - 795.0).abs() < 1e-9);
        assert!((y - 590.0).abs() < 1e-9);

        assert!(surface_contains(rect, 89, 34));
        assert!(!surface_contains(rect, 90, 34));
        assert!(!surface_contains(rect, 9, 5));
    }

    #[test]
    fn hover_color_runs_from_grey_to_red() {
        assert_eq!(hover_color(0.0), Color::Rgb(204, 204, 204));
        assert_eq!(hover_color(1.0), Color::Rgb(255, 0, 0));
        assert_eq!(hover_color(2.0), Color::Rgb(255, 0, 0));
    }
}
