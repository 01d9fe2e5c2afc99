use crate::config::AppConfig;
use crate::db::models::{NewTimelineEntry, TimelineRecord};
use crate::db::{create_database_pool, queries};
use crate::storage::ImageStore;
use chrono::{SecondsFormat, Utc};
use color_eyre::Result;
use prefmap_core::domain::validate_description;
use prefmap_core::{MapError, RegionKey, ValidationError};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A timeline entry as typed into the form, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub prefecture: RegionKey,
    pub image_path: String,
    pub description: String,
    pub nickname: String,
}

impl EntryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image_path.trim().is_empty() {
            return Err(ValidationError::MissingImage);
        }
        validate_description(&self.description)
    }
}

/// Storage collaborators shared with spawned tasks; cheap to clone.
#[derive(Debug, Clone)]
pub struct AppActions {
    pub db_pool: Option<SqlitePool>,
    pub images: ImageStore,
    pub nickname: String,
    pub database_url: String,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db_pool: None,
            images: ImageStore::new(config.image_dir.clone()),
            nickname: config.nickname.clone(),
            database_url: config.database_url.clone(),
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.db_pool = Some(create_database_pool(&self.database_url).await?);
        Ok(())
    }

    pub async fn fetch_timeline(&self, prefecture: &RegionKey) -> Result<Vec<TimelineRecord>> {
        let pool = self.pool()?;
        queries::entries_for_prefecture(pool, prefecture.as_str())
            .await
            .map_err(Into::into)
    }

    /// Validate, upload the image, then insert the row.
    ///
    /// Validation runs before anything touches storage.
    pub async fn submit_entry(&self, draft: &EntryDraft) -> Result<TimelineRecord, MapError> {
        draft.validate()?;
        let pool = self.pool().map_err(persistence)?;

        let image_url = self
            .images
            .upload(&PathBuf::from(draft.image_path.trim()))
            .await
            .map_err(persistence)?;

        let entry = NewTimelineEntry {
            image_path: image_url,
            explanatory: draft.description.clone(),
            writer_name: draft.nickname.trim().to_string(),
            prefecture: draft.prefecture.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        match Self::insert_and_fetch(pool, &entry).await {
            Ok(record) => {
                info!(id = record.id, prefecture = %draft.prefecture, "timeline entry saved");
                Ok(record)
            }
            Err(error) => {
                // The row never landed, so the uploaded copy has no owner
                if let Err(remove_error) = self.images.remove(&entry.image_path).await {
                    warn!(
                        %remove_error,
                        url = %entry.image_path,
                        "could not remove orphaned image"
                    );
                }
                Err(persistence(error))
            }
        }
    }

    async fn insert_and_fetch(
        pool: &SqlitePool,
        entry: &NewTimelineEntry,
    ) -> Result<TimelineRecord, sqlx::Error> {
        let id = queries::insert_timeline_entry(pool, entry).await?;
        queries::get_timeline_entry(pool, id).await
    }

    /// Delete the row, then its stored image. A leftover image is only logged.
    pub async fn delete_entry(&self, id: i64) -> Result<(), MapError> {
        let pool = self.pool().map_err(persistence)?;
        let record = queries::get_timeline_entry(pool, id)
            .await
            .map_err(persistence)?;

        if !queries::delete_timeline_entry(pool, id)
            .await
            .map_err(persistence)?
        {
            return Err(MapError::PersistenceFailure(format!(
                "timeline entry {id} no longer exists"
            )));
        }
        if let Err(error) = self.images.remove(&record.image_path).await {
            debug!(%error, "could not remove stored image");
        }
        info!(id, "timeline entry deleted");
        Ok(())
    }

    pub async fn count_entries(&self) -> Result<i64> {
        let pool = self.pool()?;
        queries::count_entries(pool).await.map_err(Into::into)
    }

    pub async fn count_entries_by_prefecture(&self) -> Result<Vec<(String, i64)>> {
        let pool = self.pool()?;
        queries::count_entries_by_prefecture(pool)
            .await
            .map_err(Into::into)
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database not initialized"))
    }
}

fn persistence(error: impl std::fmt::Display) -> MapError {
    MapError::PersistenceFailure(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use prefmap_core::DESCRIPTION_CHAR_CAP;
    use sqlx::sqlite::SqlitePoolOptions;

    fn config(image_dir: PathBuf) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            geojson_source: String::new(),
            image_dir,
            nickname: "tester".to_string(),
            log_file: PathBuf::from("test.log"),
        }
    }

    fn draft(image_path: &str, description: &str) -> EntryDraft {
        EntryDraft {
            prefecture: RegionKey::from("Hokkaido"),
            image_path: image_path.to_string(),
            description: description.to_string(),
            nickname: " tester ".to_string(),
        }
    }

    async fn actions_with_db(image_dir: PathBuf) -> Result<AppActions> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        let mut actions = AppActions::new(&config(image_dir));
        actions.db_pool = Some(pool);
        Ok(actions)
    }

    #[tokio::test]
    async fn validation_runs_before_storage() {
        // No pool: a storage call would fail with PersistenceFailure
        let actions = AppActions::new(&config(PathBuf::from("unused")));

        let missing = actions.submit_entry(&draft("  ", "snow")).await;
        assert_eq!(
            missing.map(|record| record.id),
            Err(MapError::ValidationFailure(ValidationError::MissingImage))
        );

        let long = "雪".repeat(DESCRIPTION_CHAR_CAP + 1);
        let too_long = actions.submit_entry(&draft("photo.png", &long)).await;
        assert!(matches!(
            too_long,
            Err(MapError::ValidationFailure(ValidationError::DescriptionTooLong { .. }))
        ));
    }

    #[tokio::test]
    async fn submit_then_delete_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("snow.jpg");
        std::fs::write(&source, b"jpeg")?;
        let actions = actions_with_db(dir.path().join("images")).await?;

        let at_cap = "a".repeat(DESCRIPTION_CHAR_CAP);
        let saved = actions
            .submit_entry(&draft(&source.to_string_lossy(), &at_cap))
            .await?;
        assert_eq!(saved.writer_name, "tester");
        assert_eq!(saved.prefecture, "Hokkaido");
        assert!(saved.image_path.ends_with("_snow.jpg"));

        let listed = actions.fetch_timeline(&RegionKey::from("Hokkaido")).await?;
        assert_eq!(listed, vec![saved.clone()]);

        actions.delete_entry(saved.id).await?;
        assert_eq!(actions.count_entries().await?, 0);
        assert!(matches!(
            actions.delete_entry(saved.id).await,
            Err(MapError::PersistenceFailure(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn failed_insert_removes_the_uploaded_image() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("rain.jpg");
        std::fs::write(&source, b"jpeg")?;
        let store = dir.path().join("images");
        let actions = actions_with_db(store.clone()).await?;
        if let Some(pool) = &actions.db_pool {
            sqlx::query("DROP TABLE timeline").execute(pool).await?;
        }

        let result = actions
            .submit_entry(&draft(&source.to_string_lossy(), "rain"))
            .await;
        assert!(matches!(result, Err(MapError::PersistenceFailure(_))));
        assert_eq!(std::fs::read_dir(&store)?.count(), 0);
        assert!(source.exists());
        Ok(())
    }

    #[tokio::test]
    async fn missing_image_file_is_a_persistence_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let actions = actions_with_db(dir.path().join("images")).await?;

        let result = actions.submit_entry(&draft("/no/such/photo.png", "hi")).await;
        assert!(matches!(result, Err(MapError::PersistenceFailure(_))));
        assert_eq!(actions.count_entries().await?, 0);
        Ok(())
    }
}
