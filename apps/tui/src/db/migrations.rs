use color_eyre::Result;
use sqlx::{
    migrate::MigrateDatabase, query, query_scalar, sqlite::SqlitePoolOptions, Sqlite, SqlitePool,
};
use tracing::{debug, info};

/// Creates the timeline table if it doesn't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS timeline (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_path TEXT NOT NULL,
            explanatory TEXT NOT NULL DEFAULT '',
            writer_name TEXT NOT NULL DEFAULT '',
            prefecture TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE INDEX IF NOT EXISTS timeline_prefecture_created
            ON timeline (prefecture, created_at DESC)",
    )
    .execute(pool)
    .await?;

    ensure_column_exists(
        pool,
        "timeline",
        "updated_at",
        "ALTER TABLE timeline ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
    )
    .await?;

    Ok(())
}

async fn ensure_column_exists(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    alter_statement: &str,
) -> Result<(), sqlx::Error> {
    let count: i64 = query_scalar(&format!(
        "SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?",
    ))
    .bind(column)
    .fetch_one(pool)
    .await?;

    if count == 0 {
        debug!(table, column, "adding missing column");
        query(alter_statement).execute(pool).await?;
    }

    Ok(())
}

/// Opens (creating if needed) the SQLite database at `database_url` and applies the schema
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url)
        .await
        .unwrap_or(false)
    {
        info!(%database_url, "creating timeline database");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to set up database schema: {e}"))?;

    debug!("timeline database ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_setup_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        setup_database(&pool).await?;
        setup_database(&pool).await?;

        let columns: i64 =
            query_scalar("SELECT COUNT(*) FROM pragma_table_info('timeline')")
                .fetch_one(&pool)
                .await?;
        assert_eq!(columns, 7);
        Ok(())
    }
}
