use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "prefmap", version, about = "Japan prefecture map explorer")]
pub struct CliArgs {
    /// Print region and timeline stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Boundary dataset URL or file path
    #[arg(long, value_name = "URL_OR_PATH")]
    pub geojson: Option<String>,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override the directory uploaded images are copied into
    #[arg(long = "image-dir", value_name = "PATH")]
    pub image_dir: Option<String>,

    /// Nickname recorded on new timeline entries
    #[arg(long)]
    pub nickname: Option<String>,

    /// Write the annotation table as JSON to PATH after loading
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(source) = &self.geojson {
            std::env::set_var("GEOJSON_SOURCE", source);
        }
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(dir) = &self.image_dir {
            std::env::set_var("IMAGE_DIR", dir);
        }
        if let Some(nickname) = &self.nickname {
            std::env::set_var("NICKNAME", nickname);
        }
    }
}
