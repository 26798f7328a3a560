//! News Store
//!
//! Holds the normalized article collection in memory and mirrors it to
//! SQLite. Reads never touch the database; every mutation rewrites the
//! persisted collection in a single transaction. When the database cannot be
//! opened or written the store keeps working in memory for the rest of the
//! session.

use std::cmp::Ordering;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_core::{Article, ArticleSort, SourceStats};

use crate::dedup::merge;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// True if the collection is empty or its newest article is older than `window`
pub fn is_stale(articles: &[Article], now: DateTime<Utc>, window: Duration) -> bool {
    match articles.iter().map(|a| a.created_date).max() {
        None => true,
        Some(newest) => now.signed_duration_since(newest) > window,
    }
}

/// Sort a copy of `articles` by `sort` (descending) and optionally truncate
pub fn sorted(articles: &[Article], sort: ArticleSort, limit: Option<usize>) -> Vec<Article> {
    let mut out = articles.to_vec();
    match sort {
        ArticleSort::CreatedDate => out.sort_by(|a, b| b.created_date.cmp(&a.created_date)),
        ArticleSort::SentimentScore => out.sort_by(|a, b| {
            b.sentiment_score
                .partial_cmp(&a.sentiment_score)
                .unwrap_or(Ordering::Equal)
        }),
        ArticleSort::ImpactLevel => out.sort_by(|a, b| b.impact_level.cmp(&a.impact_level)),
        ArticleSort::RelevanceScore => out.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        }),
    }
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    out
}

/// Article collection with optional SQLite persistence
pub struct NewsStore {
    articles: RwLock<Vec<Article>>,
    /// `None` once persistence is unavailable
    db: Mutex<Option<Connection>>,
    max_retained: usize,
}

impl NewsStore {
    /// Open the store at `db_path`, loading any persisted collection
    ///
    /// Never fails: database problems are logged and the store runs in memory.
    pub fn open(db_path: impl AsRef<Path>, max_retained: usize) -> Self {
        let db_path = db_path.as_ref();
        match Self::open_connection(db_path) {
            Ok(conn) => {
                info!("Initialized news store at: {}", db_path.display());
                Self::with_connection(conn, max_retained)
            }
            Err(e) => {
                warn!(
                    "News store unavailable at {} ({}), keeping articles in memory only",
                    db_path.display(),
                    e
                );
                Self::in_memory(max_retained)
            }
        }
    }

    /// A store without persistence
    pub fn in_memory(max_retained: usize) -> Self {
        Self {
            articles: RwLock::new(Vec::new()),
            db: Mutex::new(None),
            max_retained,
        }
    }

    /// A store persisting through an already-open connection
    pub fn with_connection(conn: Connection, max_retained: usize) -> Self {
        let loaded = match init_schema(&conn).and_then(|_| load_articles(&conn)) {
            Ok(articles) => Some(articles),
            Err(e) => {
                warn!("Failed to load persisted articles ({}), keeping articles in memory only", e);
                None
            }
        };

        let persistent = loaded.is_some();
        let mut articles = loaded.unwrap_or_default();
        articles.truncate(max_retained);
        if !articles.is_empty() {
            info!("Loaded {} persisted articles", articles.len());
        }

        Self {
            articles: RwLock::new(articles),
            db: Mutex::new(persistent.then_some(conn)),
            max_retained,
        }
    }

    fn open_connection(db_path: &Path) -> Result<Connection, StoreError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(db_path)?)
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Whether mutations are still being written to the database
    pub fn is_persistent(&self) -> bool {
        self.db.lock().is_some()
    }

    pub fn len(&self) -> usize {
        self.articles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.read().is_empty()
    }

    /// Copy of the collection in stored order (newest first)
    pub fn snapshot(&self) -> Vec<Article> {
        self.articles.read().clone()
    }

    pub fn list(&self, sort: ArticleSort, limit: Option<usize>) -> Vec<Article> {
        sorted(&self.articles.read(), sort, limit)
    }

    pub fn get(&self, id: &str) -> Option<Article> {
        self.articles.read().iter().find(|a| a.id == id).cloned()
    }

    pub fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        is_stale(&self.articles.read(), now, window)
    }

    /// Insert an article at the front with a fresh id and timestamps
    pub fn create(&self, mut article: Article, now: DateTime<Utc>) -> Article {
        article.id = Uuid::new_v4().to_string();
        article.created_date = now;
        article.updated_date = now;

        let mut articles = self.articles.write();
        articles.insert(0, article.clone());
        articles.truncate(self.max_retained);
        self.persist(&articles);

        debug!("Created article {} from {}", article.id, article.source);
        article
    }

    /// Replace the whole collection, enforcing the size cap
    pub fn replace_all(&self, mut collection: Vec<Article>) -> Vec<Article> {
        collection.truncate(self.max_retained);

        let mut articles = self.articles.write();
        *articles = collection;
        self.persist(&articles);
        articles.clone()
    }

    /// Merge a deduplicated batch into the collection under one write lock
    ///
    /// Returns the stored collection and the number of articles inserted.
    pub fn merge_fresh(&self, fresh: Vec<Article>) -> (Vec<Article>, usize) {
        let mut articles = self.articles.write();
        let (merged, inserted) = merge(fresh, &articles, self.max_retained);
        *articles = merged;
        if inserted > 0 {
            self.persist(&articles);
        }
        (articles.clone(), inserted)
    }

    /// Remove articles created more than `days` days before `now`
    pub fn delete_older_than(&self, days: u32, now: DateTime<Utc>) -> usize {
        let Some(cutoff) =
            Duration::try_days(i64::from(days)).and_then(|age| now.checked_sub_signed(age))
        else {
            debug!("Retention of {} days reaches past the earliest date", days);
            return 0;
        };

        let mut articles = self.articles.write();
        let before = articles.len();
        articles.retain(|a| a.created_date >= cutoff);
        let removed = before - articles.len();

        if removed > 0 {
            self.persist(&articles);
            info!("Cleaned up {} articles older than {} days", removed, days);
        }
        removed
    }

    /// Empty the collection
    pub fn clear(&self) {
        let mut articles = self.articles.write();
        articles.clear();
        self.persist(&articles);
        info!("Cleared news store");
    }

    /// Persisted source toggles and statistics
    pub fn load_source_stats(&self) -> Vec<SourceStats> {
        let db = self.db.lock();
        let Some(conn) = db.as_ref() else {
            return Vec::new();
        };

        match load_sources(conn) {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Failed to load source records: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save_source_stats(&self, stats: &[SourceStats]) {
        let mut db = self.db.lock();
        let Some(conn) = db.as_mut() else {
            return;
        };

        if let Err(e) = write_sources(conn, stats) {
            warn!(
                "Failed to persist source records ({}), keeping data in memory only",
                e
            );
            *db = None;
        }
    }

    fn persist(&self, articles: &[Article]) {
        let mut db = self.db.lock();
        let Some(conn) = db.as_mut() else {
            return;
        };

        if let Err(e) = write_articles(conn, articles) {
            warn!(
                "Failed to persist articles ({}), keeping data in memory only",
                e
            );
            *db = None;
        }
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS news_articles (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            source TEXT NOT NULL,
            headline TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            data JSON NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_news_articles_position ON news_articles(position);
        CREATE INDEX IF NOT EXISTS idx_news_articles_created ON news_articles(created_at DESC);
        CREATE TABLE IF NOT EXISTS news_sources (
            name TEXT PRIMARY KEY,
            enabled INTEGER NOT NULL,
            data JSON NOT NULL,
            updated_at INTEGER DEFAULT (strftime('%s', 'now'))
        );",
    )?;
    Ok(())
}

fn load_articles(conn: &Connection) -> Result<Vec<Article>, StoreError> {
    let mut stmt = conn.prepare("SELECT data FROM news_articles ORDER BY position ASC")?;

    let articles: Result<Vec<Article>, _> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|result| {
            result
                .map_err(StoreError::from)
                .and_then(|data| serde_json::from_str(&data).map_err(StoreError::from))
        })
        .collect();

    articles
}

fn write_articles(conn: &mut Connection, articles: &[Article]) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM news_articles", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO news_articles (id, position, source, headline, created_at, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (position, article) in articles.iter().enumerate() {
            let data = serde_json::to_string(article)?;
            stmt.execute(params![
                article.id,
                position as i64,
                article.source,
                article.headline,
                article.created_date.timestamp(),
                data,
            ])?;
        }
    }
    tx.commit()?;

    debug!("Persisted {} articles", articles.len());
    Ok(())
}

fn load_sources(conn: &Connection) -> Result<Vec<SourceStats>, StoreError> {
    let mut stmt = conn.prepare("SELECT data FROM news_sources ORDER BY name")?;

    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut stats = Vec::new();
    for row in rows {
        stats.push(serde_json::from_str(&row?)?);
    }
    Ok(stats)
}

fn write_sources(conn: &mut Connection, stats: &[SourceStats]) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO news_sources (name, enabled, data, updated_at)
             VALUES (?1, ?2, ?3, strftime('%s', 'now'))",
        )?;
        for stat in stats {
            let data = serde_json::to_string(stat)?;
            stmt.execute(params![stat.name, stat.enabled, data])?;
        }
    }
    tx.commit()?;
    Ok(())
}
