use clap::Parser;
use color_eyre::Result;
use prefmap::app::App;
use prefmap::cli::CliArgs;
use prefmap::config::init_app_config;
use prefmap::logging::{init_tracing, LogTarget};
use prefmap::{event, terminal};
use prefmap_core::notice::Severity;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    // Headless when asked to, or when stdout is not a terminal
    let headless = args.headless || args.json || !is_terminal();
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(&config.log_file)
    };
    init_tracing(target, args.debug)?;
    info!(source = %config.geojson_source, "starting prefmap");

    let mut app = App::new(&config);

    // Timelines need the database; the map works without it
    if let Err(e) = app.initialize_db().await {
        warn!("Database unavailable, timelines are disabled: {e}");
        app.notices
            .show(format!("Database unavailable: {e}"), Severity::Warning);
    }

    if headless {
        event::run_headless(&mut app, args.json).await?;
    } else {
        let mut terminal = terminal::setup()?;
        let result = event::run(&mut terminal, &mut app).await;
        terminal::cleanup(true, true);
        result?;
    }

    if let Some(path) = &args.export {
        event::export_annotations(&app, path)?;
    }

    Ok(())
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
