//! LibSQL storage backend implementation
//!
//! Feedback rows live in the `feedback` table; theme tallies in
//! `theme_counts`, updated with a single upsert statement per increment.

use crate::error::{Result, TriageError};
use crate::storage::{FeedbackOrder, StorageBackend};
use crate::types::{FeedbackItem, NewFeedback, Sentiment, ThemeCount, Urgency};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection, Database, Row, Value};
use std::path::Path;
use tracing::{debug, info, warn};

const INITIAL_SCHEMA: &str = include_str!("../../migrations/libsql/001_initial_schema.sql");

const FEEDBACK_COLUMNS: &str = "id, text, source, theme, sentiment, urgency, summary, created_at";

/// Split a schema file into statements, dropping comment-only lines
fn parse_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);

        if trimmed.ends_with(';') {
            statements.push(std::mem::take(&mut current));
        }
    }

    if !current.trim().is_empty() {
        statements.push(current);
    }

    statements
}

/// LibSQL storage backend
pub struct LibsqlStorage {
    db: Database,
}

impl LibsqlStorage {
    /// Check an existing database file before opening it
    ///
    /// Returns `Ok(false)` when the file does not exist yet.
    fn validate_database_file(db_path: &Path) -> Result<bool> {
        if !db_path.exists() {
            return Ok(false);
        }

        let bytes = std::fs::read(db_path).map_err(|e| {
            TriageError::Database(format!(
                "Cannot read database file at '{}': {}",
                db_path.display(),
                e
            ))
        })?;

        // An empty file is what SQLite leaves behind before the first write
        if bytes.is_empty() {
            return Ok(true);
        }

        if bytes.len() < 16 || &bytes[0..16] != b"SQLite format 3\0" {
            return Err(TriageError::Database(format!(
                "Database file at '{}' is corrupted or not a valid SQLite database",
                db_path.display()
            )));
        }

        debug!("Database file validation passed: {}", db_path.display());
        Ok(true)
    }

    /// Open (or create) a local database file and bootstrap the schema
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening LibSQL database: {}", path.display());

        let exists = Self::validate_database_file(path)?;
        if !exists {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TriageError::Database(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| TriageError::Database(format!("Failed to open local database: {}", e)))?;

        let storage = Self { db };
        storage.run_migrations().await?;

        info!("LibSQL database ready");
        Ok(storage)
    }

    /// Create tables if they are missing
    ///
    /// Idempotent; runs on every open.
    pub async fn run_migrations(&self) -> Result<()> {
        let conn = self.get_conn().await?;

        let statements = parse_sql_statements(INITIAL_SCHEMA);
        debug!("Applying {} schema statements", statements.len());

        for (i, statement) in statements.iter().enumerate() {
            conn.execute(statement, params![]).await.map_err(|e| {
                TriageError::Migration(format!(
                    "Failed to execute schema statement #{}: {}",
                    i + 1,
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get a connection with a busy timeout so concurrent writers wait
    /// instead of failing
    async fn get_conn(&self) -> Result<Connection> {
        let conn = self
            .db
            .connect()
            .map_err(|e| TriageError::Database(format!("Failed to get connection: {}", e)))?;

        // PRAGMA busy_timeout echoes the new value back as a row
        conn.query("PRAGMA busy_timeout = 5000", params![]).await?;

        Ok(conn)
    }

    fn row_to_feedback(row: &Row) -> Result<FeedbackItem> {
        let created_at_str: String = row.get(7)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                TriageError::Database(format!("Invalid created_at '{}': {}", created_at_str, e))
            })?;

        Ok(FeedbackItem {
            id: row.get(0)?,
            text: row.get(1)?,
            source: row.get(2)?,
            theme: optional_text(row, 3)?,
            sentiment: optional_text(row, 4)?.and_then(|s| parse_stored(&s)),
            urgency: optional_text(row, 5)?.and_then(|s| parse_stored::<Urgency>(&s)),
            summary: optional_text(row, 6)?,
            created_at,
        })
    }
}

/// Read a nullable TEXT column
fn optional_text(row: &Row, idx: i32) -> Result<Option<String>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(TriageError::Database(format!(
            "Expected TEXT or NULL in column {}, found {:?}",
            idx, other
        ))),
    }
}

fn optional_value(value: Option<&str>) -> Value {
    match value {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

/// Enumerated columns are written by this crate only; anything unreadable is
/// dropped rather than failing the whole scan.
fn parse_stored<T: std::str::FromStr<Err = String>>(s: &str) -> Option<T> {
    match s.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring stored value: {}", e);
            None
        }
    }
}

#[async_trait]
impl StorageBackend for LibsqlStorage {
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackItem> {
        debug!("Storing feedback from source '{}'", feedback.source);

        let conn = self.get_conn().await?;
        let judgment = &feedback.judgment;

        let sql = format!(
            "INSERT INTO feedback (text, source, theme, sentiment, urgency, summary) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            FEEDBACK_COLUMNS
        );
        let values = vec![
            Value::Text(feedback.text.clone()),
            Value::Text(feedback.source.clone()),
            optional_value(judgment.theme.as_deref()),
            optional_value(judgment.sentiment.as_ref().map(Sentiment::as_str)),
            optional_value(judgment.urgency.as_ref().map(Urgency::as_str)),
            optional_value(judgment.summary.as_deref()),
        ];

        let mut rows = conn.query(&sql, values).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| TriageError::Database("INSERT returned no row".to_string()))?;

        let item = Self::row_to_feedback(&row)?;
        debug!("Feedback stored: id={}", item.id);
        Ok(item)
    }

    async fn list_feedback(&self, order: FeedbackOrder) -> Result<Vec<FeedbackItem>> {
        let conn = self.get_conn().await?;
        let order_clause = match order {
            FeedbackOrder::Inserted => "id ASC",
            FeedbackOrder::Recent => "created_at DESC, id DESC",
        };

        let sql = format!(
            "SELECT {} FROM feedback ORDER BY {}",
            FEEDBACK_COLUMNS, order_clause
        );
        let mut rows = conn.query(&sql, params![]).await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(Self::row_to_feedback(&row)?);
        }

        debug!("Listed {} feedback rows ({:?})", items.len(), order);
        Ok(items)
    }

    async fn increment_theme(&self, theme: &str) -> Result<()> {
        let conn = self.get_conn().await?;
        conn.execute(
            r#"
            INSERT INTO theme_counts (theme, count) VALUES (?, 1)
            ON CONFLICT(theme) DO UPDATE SET count = count + 1
            "#,
            params![theme.to_string()],
        )
        .await?;

        Ok(())
    }

    async fn theme_counts(&self) -> Result<Vec<ThemeCount>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                "SELECT theme, count FROM theme_counts ORDER BY count DESC",
                params![],
            )
            .await?;

        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            let count: i64 = row.get(1)?;
            counts.push(ThemeCount {
                theme: row.get(0)?,
                count: count.max(0) as u64,
            });
        }

        Ok(counts)
    }
}
