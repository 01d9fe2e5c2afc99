use color_eyre::eyre::eyre;
use dotenv::dotenv;
use prefmap_core::loader::DEFAULT_GEOJSON_SOURCE;
use std::env;
use std::path::PathBuf;
use std::process::Command;
use std::str;

/// Settings resolved from `.env`, the environment and CLI overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub geojson_source: String,
    pub image_dir: PathBuf,
    pub nickname: String,
    pub log_file: PathBuf,
}

/// Initializes the application configuration
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    Ok(AppConfig {
        database_url: database_url()?,
        geojson_source: get_geojson_source(),
        image_dir: get_image_dir(),
        nickname: get_nickname(),
        log_file: get_log_file(),
    })
}

/// Builds the SQLx URL for the timeline database
pub fn database_url() -> color_eyre::eyre::Result<String> {
    let base_dir: PathBuf = env::current_dir()?;
    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "prefmap.db".to_string());
    let database_path = base_dir.join(&db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // The file may not exist yet, so no canonicalize()
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?
        .to_string();

    // SQLx wants sqlite:///abs/path (3 slashes) or sqlite://rel/path (2 slashes)
    let clean_path = path_str.trim_start_matches('/');
    let database_url = if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    };
    tracing::debug!(%database_url, "resolved database url");

    Ok(database_url)
}

/// Gets the URL or file path of the prefecture boundary dataset
pub fn get_geojson_source() -> String {
    env::var("GEOJSON_SOURCE").unwrap_or_else(|_| DEFAULT_GEOJSON_SOURCE.to_string())
}

/// Gets the directory uploaded timeline images are copied into
pub fn get_image_dir() -> PathBuf {
    env::var("IMAGE_DIR").map_or_else(|_| PathBuf::from("./images"), PathBuf::from)
}

/// Gets the log file used while the terminal UI owns the screen
pub fn get_log_file() -> PathBuf {
    env::var("PREFMAP_LOG").map_or_else(|_| PathBuf::from("prefmap.log"), PathBuf::from)
}

/// Nickname attached to new timeline entries
pub fn get_nickname() -> String {
    env::var("NICKNAME")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| get_git_username().ok())
        .unwrap_or_else(|| "anonymous".to_string())
}

fn get_git_username() -> color_eyre::eyre::Result<String> {
    let username = Command::new("git")
        .args(["config", "--get", "user.name"])
        .output()?;

    let username_str = str::from_utf8(&username.stdout)?.trim().to_string();

    if username_str.is_empty() {
        return Err(eyre!("Git username not found"));
    }

    Ok(username_str)
}
