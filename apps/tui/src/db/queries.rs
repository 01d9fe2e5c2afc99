use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::{NewTimelineEntry, TimelineRecord};

const TIMELINE_COLUMNS: &str =
    "id, image_path, explanatory, writer_name, prefecture, created_at, updated_at";

/// Inserts a timeline entry and returns its new id
pub async fn insert_timeline_entry(
    pool: &SqlitePool,
    entry: &NewTimelineEntry,
) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO timeline (image_path, explanatory, writer_name, prefecture, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.image_path)
    .bind(&entry.explanatory)
    .bind(&entry.writer_name)
    .bind(&entry.prefecture)
    .bind(&entry.created_at)
    .bind(&entry.created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Retrieves every entry for a prefecture, newest first
pub async fn entries_for_prefecture(
    pool: &SqlitePool,
    prefecture: &str,
) -> Result<Vec<TimelineRecord>, sqlx::Error> {
    query_as::<_, TimelineRecord>(&format!(
        "SELECT {TIMELINE_COLUMNS} FROM timeline WHERE prefecture = ? \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(prefecture)
    .fetch_all(pool)
    .await
}

/// Retrieves a single entry by id
pub async fn get_timeline_entry(pool: &SqlitePool, id: i64) -> Result<TimelineRecord, sqlx::Error> {
    query_as::<_, TimelineRecord>(&format!(
        "SELECT {TIMELINE_COLUMNS} FROM timeline WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Deletes an entry; returns whether a row was removed
pub async fn delete_timeline_entry(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = query("DELETE FROM timeline WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_entries(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM timeline")
        .fetch_one(pool)
        .await
}

pub async fn count_entries_by_prefecture(
    pool: &SqlitePool,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    query_as::<_, (String, i64)>(
        "SELECT prefecture, COUNT(*) FROM timeline GROUP BY prefecture ORDER BY prefecture",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::setup_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        setup_database(&pool).await?;
        Ok(pool)
    }

    fn entry(prefecture: &str, text: &str, created_at: &str) -> NewTimelineEntry {
        NewTimelineEntry {
            image_path: format!("file:///tmp/images/{text}.png"),
            explanatory: text.to_string(),
            writer_name: "tester".to_string(),
            prefecture: prefecture.to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_entries_are_newest_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        insert_timeline_entry(&pool, &entry("Aomori Ken", "old", "2024-03-01T09:00:00Z")).await?;
        insert_timeline_entry(&pool, &entry("Aomori Ken", "new", "2024-05-01T09:00:00Z")).await?;
        insert_timeline_entry(&pool, &entry("Tokyo To", "other", "2024-06-01T09:00:00Z")).await?;

        let entries = entries_for_prefecture(&pool, "Aomori Ken").await?;
        let texts: Vec<&str> = entries.iter().map(|e| e.explanatory.as_str()).collect();
        assert_eq!(texts, vec!["new", "old"]);
        assert_eq!(entries[0].created_date(), "2024-05-01");
        assert_eq!(entries[0].updated_at, entries[0].created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entry() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let id =
            insert_timeline_entry(&pool, &entry("Tokyo To", "gone", "2024-06-01T09:00:00Z")).await?;
        assert_eq!(get_timeline_entry(&pool, id).await?.explanatory, "gone");

        assert!(delete_timeline_entry(&pool, id).await?);
        assert!(!delete_timeline_entry(&pool, id).await?);
        assert!(get_timeline_entry(&pool, id).await.is_err());
        assert_eq!(count_entries(&pool).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_counts_by_prefecture() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        insert_timeline_entry(&pool, &entry("Tokyo To", "a", "2024-06-01T09:00:00Z")).await?;
        insert_timeline_entry(&pool, &entry("Tokyo To", "b", "2024-06-02T09:00:00Z")).await?;
        insert_timeline_entry(&pool, &entry("Aomori Ken", "c", "2024-06-03T09:00:00Z")).await?;

        let counts = count_entries_by_prefecture(&pool).await?;
        assert_eq!(
            counts,
            vec![("Aomori Ken".to_string(), 1), ("Tokyo To".to_string(), 2)]
        );
        assert_eq!(count_entries(&pool).await?, 3);

        Ok(())
    }
}
