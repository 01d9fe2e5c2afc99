use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use prefmap_core::geometry::{scanline_spans, ProjectedRegion, ProjectedRing};
use prefmap_core::projection::{SURFACE_HEIGHT, SURFACE_WIDTH};
use prefmap_core::{
    AnnotationTable, Effect, LoadOutcome, MapController, MapError, MapEvent, ViewTransform,
    DESCRIPTION_CHAR_CAP,
};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

const GEOJSON_URL: &str = "japan.geojson";
const ANNOTATIONS_URL: &str = "annotations.json";

const PAN_STEP: f64 = 40.0;
const ZOOM_STEP: f64 = 1.25;

const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Everything the key handler and the draw loop share.
struct Viewer {
    map: MapController,
    loading: bool,
    status: Option<String>,
}

impl Viewer {
    fn new() -> Self {
        Self {
            map: MapController::new(),
            loading: true,
            status: None,
        }
    }

    fn send(&mut self, event: MapEvent) {
        for effect in self.map.handle(event) {
            if let Effect::Rejected(error) = effect {
                self.status = Some(error.to_string());
            }
        }
    }
}

fn main() -> io::Result<()> {
    let viewer = Rc::new(RefCell::new(Viewer::new()));

    spawn_local(load_map(viewer.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let viewer = viewer.clone();
        move |event| {
            let mut viewer = viewer.borrow_mut();
            let map_event = match event.code {
                KeyCode::Tab if event.shift => MapEvent::HoverPrevious,
                KeyCode::Tab => MapEvent::HoverNext,
                KeyCode::Enter => MapEvent::FocusHovered,
                KeyCode::Esc => MapEvent::ClosePanel,
                KeyCode::Left => MapEvent::Pan {
                    dx: PAN_STEP,
                    dy: 0.0,
                },
                KeyCode::Right => MapEvent::Pan {
                    dx: -PAN_STEP,
                    dy: 0.0,
                },
                KeyCode::Up => MapEvent::Pan {
                    dx: 0.0,
                    dy: PAN_STEP,
                },
                KeyCode::Down => MapEvent::Pan {
                    dx: 0.0,
                    dy: -PAN_STEP,
                },
                KeyCode::Char('+' | '=') => MapEvent::Zoom {
                    anchor: None,
                    factor: ZOOM_STEP,
                },
                KeyCode::Char('-') => MapEvent::Zoom {
                    anchor: None,
                    factor: 1.0 / ZOOM_STEP,
                },
                _ => return,
            };
            viewer.status = None;
            viewer.send(map_event);
        }
    });

    terminal.draw_web(move |f| {
        let mut viewer = viewer.borrow_mut();
        // Animations clamp their own frame gaps, so wall-clock seconds will do
        viewer.send(MapEvent::Tick(js_sys::Date::now() / 1000.0));

        let area = f.area();
        let block = Block::default()
            .title("Prefecture Map")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        render_viewer(&viewer, f, inner);
    });

    Ok(())
}

fn render_viewer(viewer: &Viewer, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(area);

    let panel_open = viewer.map.selection().detail_open;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if panel_open {
            [Constraint::Percentage(60), Constraint::Percentage(40)]
        } else {
            [Constraint::Percentage(100), Constraint::Percentage(0)]
        })
        .split(rows[0]);

    let map_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let surface = surface_rect(map_block.inner(columns[0]).inner(Margin::new(1, 1)));
    f.render_widget(map_block, columns[0]);

    if viewer.loading {
        let paragraph = Paragraph::new(Text::from(TextLine::from("Loading japan.geojson...")))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, surface);
    } else {
        render_map(&viewer.map, f, surface);
    }

    if panel_open {
        render_panel(&viewer.map, f, columns[1]);
    }
    render_status(viewer, f, rows[1]);
}

fn render_panel(map: &MapController, f: &mut Frame<'_>, area: Rect) {
    let Some(panel) = map.panel() else {
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

    let mut lines = vec![
        TextLine::from(Span::styled(
            panel.key.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
        TextLine::from(""),
        TextLine::from(panel.annotation.description.as_str()),
        TextLine::from(Span::styled(
            format!(
                "{}/{DESCRIPTION_CHAR_CAP}",
                panel.annotation.description.chars().count()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Image ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                panel.annotation.preview_image.as_str(),
                Style::default().fg(Color::Blue),
            ),
        ]),
    ];
    if panel.placeholder {
        lines.push(TextLine::from(Span::styled(
            "No data for this prefecture yet",
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(viewer: &Viewer, f: &mut Frame<'_>, area: Rect) {
    let line = if let Some(error) = viewer.map.load_error() {
        TextLine::from(Span::styled(
            format!("Map unavailable: {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(status) = &viewer.status {
        TextLine::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let hover = viewer
            .map
            .selection()
            .hover
            .as_ref()
            .and_then(|key| viewer.map.region(key.as_str()))
            .map_or("-", |region| region.feature.display_name.as_str());
        TextLine::from(vec![
            Span::styled(
                format!("{} prefectures ", viewer.map.regions().len()),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("| hover {hover} | zoom {:.2}x ", viewer.map.transform().scale),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                "| Tab hover  Enter focus  Esc close  arrows pan  +/- zoom",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Largest 4:3 area that fits in `area`, centred; 4:3 on screen is 8:3 in cells.
fn surface_rect(area: Rect) -> Rect {
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

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hover_color(level: f64) -> Color {
    let level = level.clamp(0.0, 1.0);
    let channel = |from: f64, to: f64| (to - from).mul_add(level, from).round() as u8;
    Color::Rgb(
        channel(204.0, 255.0),
        channel(204.0, 0.0),
        channel(204.0, 0.0),
    )
}

fn render_map(map: &MapController, f: &mut Frame<'_>, surface: Rect) {
    if surface.width < 2 || surface.height < 2 {
        return;
    }

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
                    Color::Yellow
                } else {
                    Color::Gray
                };
                for ring in &region.rings {
                    draw_ring(ctx, ring, transform, dot_width.min(dot_height), color);
                }
            }
        });

    f.render_widget(canvas, surface);
}

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
        ctx.draw(&CanvasLine::new(
            last.0,
            SURFACE_HEIGHT - last.1,
            point.0,
            SURFACE_HEIGHT - point.1,
            color,
        ));
        last = point;
    }
}

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
        .map(|ring| ring.iter().map(|&point| transform.apply(point)).collect())
        .collect();
    let (_, top) = transform.apply((region.bounds.min_x, region.bounds.min_y));
    let (_, bottom) = transform.apply((region.bounds.max_x, region.bounds.max_y));

    let mut y = top.max(0.0) + dot_height / 2.0;
    while y <= bottom.min(SURFACE_HEIGHT) {
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

/// Load the boundaries, then overlay `annotations.json` if the page ships one.
async fn load_map(viewer: Rc<RefCell<Viewer>>) {
    let body = fetch_text(GEOJSON_URL).await.map_err(MapError::LoadFailure);
    let outcome = LoadOutcome::from_body(body);
    if let LoadOutcome::Failed(error) = &outcome {
        web_sys::console::error_1(&format!("Failed to load {GEOJSON_URL}: {error}").into());
    }
    {
        let mut viewer = viewer.borrow_mut();
        viewer.map.apply_load(outcome);
        viewer.loading = false;
    }

    let Ok(text) = fetch_text(ANNOTATIONS_URL).await else {
        return;
    };
    match serde_json::from_str::<AnnotationTable>(&text) {
        Ok(table) => {
            let merged = viewer.borrow_mut().map.import_annotations(table);
            web_sys::console::log_1(&format!("Applied {merged} annotations").into());
        }
        Err(error) => {
            web_sys::console::error_1(&format!("Failed to parse {ANNOTATIONS_URL}: {error}").into());
        }
    }
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| format!("could not build request for {url}"))?;

    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| format!("request for {url} failed"))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "Failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("{url} returned HTTP {}", response.status()));
    }

    let text_promise = response
        .text()
        .map_err(|_| format!("Failed to read {url} body"))?;
    let text = wasm_bindgen_futures::JsFuture::from(text_promise)
        .await
        .map_err(|_| format!("Failed to read {url} body"))?;
    text.as_string()
        .ok_or_else(|| format!("{url} body is not text"))
}
