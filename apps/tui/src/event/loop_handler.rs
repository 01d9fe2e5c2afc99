use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::Stdout;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::{handle_input, handle_mouse, App, AppMessage};
use crate::geography;
use crate::ui;

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, json: bool) -> Result<()> {
    let outcome = geography::load(&app.geojson_source).await;
    app.handle_message(AppMessage::GeographyLoaded(outcome));

    let stats = build_headless_stats(app).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nPrefecture Map Stats");
    println!("====================");
    println!("Source: {}", stats.source);
    if let Some(error) = &stats.load_error {
        println!("Load failed: {error}");
    }
    println!("Regions: {}", stats.regions);
    println!("Annotations: {}", stats.annotations);

    match stats.timeline_entries {
        Some(total) => {
            println!("Timeline entries: {total}");
            println!("\nEntries by Prefecture:");
            for row in &stats.by_prefecture {
                println!("- {} ({}): {}", row.display_name, row.key, row.entries);
            }
        }
        None => println!("Timeline entries: (database unavailable)"),
    }
}

async fn build_headless_stats(app: &App) -> HeadlessStats {
    let map = &app.map;
    let (timeline_entries, by_prefecture) = match (
        app.actions.count_entries().await,
        app.actions.count_entries_by_prefecture().await,
    ) {
        (Ok(total), Ok(rows)) => {
            let rows = rows
                .into_iter()
                .map(|(key, entries)| HeadlessPrefecture {
                    display_name: map
                        .region(&key)
                        .map_or_else(|| key.clone(), |r| r.feature.display_name.clone()),
                    key,
                    entries,
                })
                .collect();
            (Some(total), rows)
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("timeline stats unavailable: {e}");
            (None, Vec::new())
        }
    };

    HeadlessStats {
        source: app.geojson_source.clone(),
        load_error: map.load_error().map(ToString::to_string),
        regions: map.regions().len(),
        annotations: map.annotations().len(),
        timeline_entries,
        by_prefecture,
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    source: String,
    load_error: Option<String>,
    regions: usize,
    annotations: usize,
    timeline_entries: Option<i64>,
    by_prefecture: Vec<HeadlessPrefecture>,
}

#[derive(serde::Serialize)]
struct HeadlessPrefecture {
    key: String,
    display_name: String,
    entries: i64,
}

/// Write the annotation table as pretty JSON
pub fn export_annotations(app: &App, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(app.map.annotations())?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), count = app.map.annotations().len(), "annotations exported");
    Ok(())
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 33;

    app.start_geography_load();

    while app.running {
        // Animations, notices and background results
        app.update();

        let size = terminal.size()?;
        app.screen_area = Rect::new(0, 0, size.width, size.height);
        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.quit();
                    } else {
                        handle_input(app, key.code);
                    }
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                // Resize is picked up by the next draw
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned fetches and writes make progress between frames
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::path::PathBuf;

    #[tokio::test]
    async fn headless_stats_survive_a_missing_database() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("japan.geojson");
        std::fs::write(
            &source,
            r#"{ "type": "FeatureCollection", "features": [
                { "type": "Feature", "properties": { "nam": "Nara Ken", "nam_ja": "奈良県" },
                  "geometry": { "type": "Polygon",
                    "coordinates": [[[135.6, 34.0], [136.2, 34.0], [136.2, 34.8], [135.6, 34.8], [135.6, 34.0]]] } }
            ] }"#,
        )?;
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            geojson_source: source.to_string_lossy().to_string(),
            image_dir: dir.path().join("images"),
            nickname: "tester".to_string(),
            log_file: PathBuf::from("test.log"),
        };
        let mut app = App::new(&config);
        let outcome = geography::load(&app.geojson_source).await;
        app.handle_message(AppMessage::GeographyLoaded(outcome));

        let stats = build_headless_stats(&app).await;
        assert_eq!(stats.regions, 1);
        assert_eq!(stats.annotations, 1);
        assert!(stats.timeline_entries.is_none());
        assert!(stats.load_error.is_none());

        let export = dir.path().join("annotations.json");
        export_annotations(&app, &export)?;
        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&export)?)?;
        assert_eq!(written["Nara Ken"]["display_name"], "奈良県");
        Ok(())
    }
}
