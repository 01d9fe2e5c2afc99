use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::{eyre::eyre, Result};
use tracing_subscriber::EnvFilter;

/// Where log lines go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// The terminal UI owns stdout and stderr, so logs are appended to a file.
    File(&'a Path),
    Stderr,
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "prefmap=debug,prefmap_core=debug"
    } else {
        "prefmap=info,prefmap_core=info"
    }
}

/// `RUST_LOG` replaces the defaults; `--debug` still raises both crates on top of it.
fn build_filter(env: Option<&str>, debug: bool) -> EnvFilter {
    let mut filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(debug)));
    if debug {
        for directive in default_directives(true).split(',') {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Install the global subscriber.
pub fn init_tracing(target: LogTarget<'_>, debug: bool) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), debug);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| eyre!("Failed to install logger: {e}"))
        }
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| eyre!("Failed to install logger: {e}")),
    }
}
