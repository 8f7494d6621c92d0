//! Activity log
//!
//! Append-only store of classification events. Records are inserted once and
//! never updated; they are removed only when their owner is deleted
//! (`ON DELETE CASCADE`). Every listing is newest first, with the insert id
//! breaking timestamp ties so that insertion order is preserved.
//!
//! Storage errors surface as [`Error::StorageFailure`] and are never retried
//! here. No application-level locking is used: SQLite serializes writers.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{BoxStream, StreamExt};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, error};
use uuid::Uuid;

use super::models::{ActivityRecord, ActivityRow, AdminActivityDbRow, AdminActivityRow};
use crate::classifier::Sentiment;
use crate::time;
use crate::{Error, Result};

/// Persistent, append-only record of classification events
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append one record stamped with the current time
    ///
    /// Empty or whitespace-only `text` is rejected with
    /// [`Error::InvalidInput`] and nothing is written.
    async fn record(&self, owner: Uuid, text: &str, result: Sentiment) -> Result<()>;

    /// Lazily stream `owner`'s records, newest first
    ///
    /// Every call starts a fresh query, so the sequence can be restarted by
    /// calling again.
    fn list_for(&self, owner: Uuid) -> BoxStream<'_, Result<ActivityRecord>>;

    /// Number of records belonging to `owner`
    async fn count_for(&self, owner: Uuid) -> Result<i64>;

    /// Count records across all owners matching `filter`
    async fn count_all(&self, filter: &ActivityFilter) -> Result<i64>;

    /// One page of records across all owners matching `filter`, newest first
    async fn list_all(
        &self,
        filter: &ActivityFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminActivityRow>>;
}

/// Admin listing filters; `None` fields do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Exact sentiment
    pub sentiment: Option<Sentiment>,
    /// Exact owner username
    pub username: Option<String>,
    /// Case-insensitive substring of username, text or sentiment
    pub search: Option<String>,
    /// UTC calendar day of `created_at`
    pub date: Option<NaiveDate>,
}

/// SQLite-backed [`ActivityLog`]
#[derive(Debug, Clone)]
pub struct SqliteActivityLog {
    pool: SqlitePool,
}

impl SqliteActivityLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ActivityLog for SqliteActivityLog {
    async fn record(&self, owner: Uuid, text: &str, result: Sentiment) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Refusing to log empty activity text".to_string(),
            ));
        }

        let created_at = time::now();
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_activity (user_guid, text_input, sentiment_result, created_at_us)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(owner.to_string())
        .bind(text)
        .bind(result.as_str())
        .bind(time::to_micros(&created_at))
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(done) => {
                debug!(
                    "Logged activity {} for {}: {}",
                    done.last_insert_rowid(),
                    owner,
                    result
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to log activity for {}: {}", owner, e);
                Err(e.into())
            }
        }
    }

    fn list_for(&self, owner: Uuid) -> BoxStream<'_, Result<ActivityRecord>> {
        sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, user_guid, text_input, sentiment_result, created_at_us
            FROM user_activity
            WHERE user_guid = ?
            ORDER BY created_at_us DESC, id DESC
            "#,
        )
        .bind(owner.to_string())
        .fetch(&self.pool)
        .map(|row| row.map_err(Error::from).and_then(ActivityRecord::try_from))
        .boxed()
    }

    async fn count_for(&self, owner: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM user_activity WHERE user_guid = ?")
            .bind(owner.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_all(&self, filter: &ActivityFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM user_activity a JOIN users u ON u.guid = a.user_guid",
        );
        push_filters(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list_all(
        &self,
        filter: &ActivityFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminActivityRow>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT a.id, u.username, a.text_input, a.sentiment_result, a.created_at_us
            FROM user_activity a
            JOIN users u ON u.guid = a.user_guid
            "#,
        );
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY a.created_at_us DESC, a.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb
            .build_query_as::<AdminActivityDbRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AdminActivityRow::try_from).collect()
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ActivityFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(sentiment) = filter.sentiment {
        qb.push(" AND a.sentiment_result = ").push_bind(sentiment.as_str());
    }

    if let Some(username) = &filter.username {
        qb.push(" AND u.username = ").push_bind(username.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (u.username LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR a.text_input LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR a.sentiment_result LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if let Some(day) = filter.date {
        let (start, end) = time::day_bounds_micros(day);
        qb.push(" AND a.created_at_us >= ")
            .push_bind(start)
            .push(" AND a.created_at_us < ")
            .push_bind(end);
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, users};
    use futures::TryStreamExt;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, SqliteActivityLog) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("test.db")).await.unwrap();
        (dir, SqliteActivityLog::new(pool))
    }

    async fn user(log: &SqliteActivityLog, name: &str) -> Uuid {
        users::create_user(log.pool(), name).await.unwrap().id
    }

    #[tokio::test]
    async fn test_record_then_list() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;

        log.record(alice, "I love this product!", Sentiment::Positive)
            .await
            .unwrap();

        let records: Vec<ActivityRecord> = log.list_for(alice).try_collect().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owner, alice);
        assert_eq!(records[0].text, "I love this product!");
        assert_eq!(records[0].result, Sentiment::Positive);
    }

    #[tokio::test]
    async fn test_most_recent_first() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;

        log.record(alice, "first", Sentiment::Neutral).await.unwrap();
        log.record(alice, "second", Sentiment::Negative).await.unwrap();

        let records: Vec<ActivityRecord> = log.list_for(alice).try_collect().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "second");
        assert_eq!(records[1].text, "first");
    }

    #[tokio::test]
    async fn test_listing_is_non_increasing_in_time() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;

        for i in 0..20 {
            log.record(alice, &format!("entry {}", i), Sentiment::Neutral)
                .await
                .unwrap();
        }

        let records: Vec<ActivityRecord> = log.list_for(alice).try_collect().await.unwrap();
        assert_eq!(records.len(), 20);
        for pair in records.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(records[0].text, "entry 19");
    }

    #[tokio::test]
    async fn test_blank_text_is_never_stored() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;

        for text in ["", "   ", "\n\t"] {
            let err = log.record(alice, text, Sentiment::Neutral).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert_eq!(log.count_for(alice).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_restartable_and_per_owner() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;
        let bob = user(&log, "bob").await;

        log.record(alice, "a1", Sentiment::Positive).await.unwrap();
        log.record(bob, "b1", Sentiment::Negative).await.unwrap();
        log.record(alice, "a2", Sentiment::Neutral).await.unwrap();

        let first: Vec<ActivityRecord> = log.list_for(alice).try_collect().await.unwrap();
        let second: Vec<ActivityRecord> = log.list_for(alice).try_collect().await.unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|r| r.owner == alice));
        assert_eq!(log.count_for(alice).await.unwrap(), 2);
        assert_eq!(log.count_for(bob).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_text_stored_verbatim() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;
        let text = "  multi\nline ☃ with 'quotes' and %wildcards_  ";

        log.record(alice, text, Sentiment::Neutral).await.unwrap();

        let mut stream = log.list_for(alice);
        let record = stream.next().await.unwrap().unwrap();
        assert_eq!(record.text, text);
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;

        log.pool().close().await;

        let err = log.record(alice, "hello", Sentiment::Positive).await.unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn test_unknown_owner_is_rejected_by_storage() {
        let (_dir, log) = setup().await;
        let err = log
            .record(Uuid::new_v4(), "orphan", Sentiment::Neutral)
            .await
            .unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn test_admin_listing_filters() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;
        let bob = user(&log, "bob").await;

        log.record(alice, "great day", Sentiment::Positive).await.unwrap();
        log.record(alice, "awful 100% day", Sentiment::Negative).await.unwrap();
        log.record(bob, "fine", Sentiment::Neutral).await.unwrap();

        let all = ActivityFilter::default();
        assert_eq!(log.count_all(&all).await.unwrap(), 3);
        let rows = log.list_all(&all, 25, 0).await.unwrap();
        assert_eq!(rows[0].username, "bob");
        assert_eq!(rows[2].text_preview, "great day");

        let negative = ActivityFilter {
            sentiment: Some(Sentiment::Negative),
            ..Default::default()
        };
        let rows = log.list_all(&negative, 25, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text_preview, "awful 100% day");

        let by_user = ActivityFilter {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(log.count_all(&by_user).await.unwrap(), 2);

        let search_user = ActivityFilter {
            search: Some("BOB".to_string()),
            ..Default::default()
        };
        assert_eq!(log.count_all(&search_user).await.unwrap(), 1);

        let search_literal = ActivityFilter {
            search: Some("100%".to_string()),
            ..Default::default()
        };
        assert_eq!(log.count_all(&search_literal).await.unwrap(), 1);

        let today = ActivityFilter {
            date: Some(time::now().date_naive()),
            ..Default::default()
        };
        assert_eq!(log.count_all(&today).await.unwrap(), 3);

        let long_ago = ActivityFilter {
            date: NaiveDate::from_ymd_opt(2001, 1, 1),
            ..Default::default()
        };
        assert_eq!(log.count_all(&long_ago).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_admin_listing_pages() {
        let (_dir, log) = setup().await;
        let alice = user(&log, "alice").await;
        for i in 0..5 {
            log.record(alice, &format!("n{}", i), Sentiment::Neutral).await.unwrap();
        }

        let filter = ActivityFilter::default();
        let page1 = log.list_all(&filter, 2, 0).await.unwrap();
        let page3 = log.list_all(&filter, 2, 4).await.unwrap();
        assert_eq!(page1.iter().map(|r| r.text_preview.as_str()).collect::<Vec<_>>(), ["n4", "n3"]);
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].text_preview, "n0");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
