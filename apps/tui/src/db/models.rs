use serde::Serialize;
use sqlx::FromRow;

/// A crowd-sourced timeline entry for one prefecture
#[derive(Debug, FromRow, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRecord {
    pub id: i64,
    pub image_path: String,
    pub explanatory: String,
    pub writer_name: String,
    pub prefecture: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TimelineRecord {
    /// Calendar date part of `created_at`, for list display
    pub fn created_date(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }
}

/// Parameters for inserting a timeline entry
#[derive(Debug, Clone)]
pub struct NewTimelineEntry {
    pub image_path: String,
    pub explanatory: String,
    pub writer_name: String,
    pub prefecture: String,
    pub created_at: String,
}
