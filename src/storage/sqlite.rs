use crate::model::{ArticleRecord, RelationRecord, StorageError};
use crate::wordfreq::WordCounts;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database at `db_path`, creating the schema when missing.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open(db_path)?)
    }

    /// Fresh in-memory database, mainly for tests and dry runs.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS articles (
                link TEXT PRIMARY KEY,
                word_freq TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS article_tags (
                link TEXT NOT NULL,
                company TEXT NOT NULL,
                PRIMARY KEY (link, company)
            );

            CREATE TABLE IF NOT EXISTS companies (
                name TEXT PRIMARY KEY,
                keywords TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS relations (
                company_a TEXT NOT NULL,
                company_b TEXT NOT NULL,
                matrix TEXT NOT NULL,
                final_value REAL NOT NULL,
                PRIMARY KEY (company_a, company_b)
            );
            ",
        )?;

        Ok(Self { conn })
    }

    // --- article store ---

    pub fn article_exists(&self, link: &str) -> Result<bool, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM articles WHERE link = ?1")?;
        let mut rows = stmt.query(params![link])?;
        Ok(rows.next()?.is_some())
    }

    /// Saves one article's serialized word counts and tags it to `companies`.
    /// An already-stored link keeps its word counts and only gains tags.
    pub fn insert_article(
        &self,
        link: &str,
        counts: &WordCounts,
        companies: &[&str],
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO articles (link, word_freq, fetched_at) VALUES (?1, ?2, ?3)",
            params![link, counts.to_record()?, Utc::now().to_rfc3339()],
        )?;
        for company in companies {
            self.tag_article(link, company)?;
        }
        Ok(())
    }

    /// Adds `company` to an article's tag set.
    pub fn tag_article(&self, link: &str, company: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO article_tags (link, company) VALUES (?1, ?2)",
            params![link, company],
        )?;
        Ok(())
    }

    /// All article records whose tag set includes `company`.
    pub fn articles_for_company(&self, company: &str) -> Result<Vec<ArticleRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.link, a.word_freq, a.fetched_at
             FROM articles a
             JOIN article_tags t ON t.link = a.link
             WHERE t.company = ?1",
        )?;

        let rows = stmt.query_map(params![company], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut articles = Vec::new();
        for row in rows {
            let (link, word_freq, fetched_at) = row?;
            articles.push(ArticleRecord {
                link,
                word_counts: WordCounts::parse_record(&word_freq)?,
                fetched_at: fetched_at.parse::<DateTime<Utc>>()?,
            });
        }
        Ok(articles)
    }

    /// Total number of stored articles, across all companies.
    pub fn article_count(&self) -> Result<u32, StorageError> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get::<_, u32>(0))?;
        Ok(count)
    }

    /// How many of `company`'s tagged articles contain `word`.
    pub fn company_articles_containing(
        &self,
        company: &str,
        word: &str,
    ) -> Result<u32, StorageError> {
        // The serialized form lists every word as `["word",`; matching that
        // token keeps lookups exact without parsing each record.
        let pattern = format!("%[\"{}\",%", word);
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM articles a
             JOIN article_tags t ON t.link = a.link
             WHERE t.company = ?1 AND a.word_freq LIKE ?2",
            params![company, pattern],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    // --- keyword store ---

    /// The company's persisted keyword list, if one was saved.
    pub fn keywords(&self, company: &str) -> Result<Option<Vec<String>>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT keywords FROM companies WHERE name = ?1")?;
        let mut rows = stmt.query(params![company])?;

        if let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&raw)?))
        } else {
            Ok(None)
        }
    }

    pub fn save_keywords(&self, company: &str, keywords: &[String]) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO companies (name, keywords) VALUES (?1, ?2)",
            params![company, serde_json::to_string(keywords)?],
        )?;
        Ok(())
    }

    // --- relation store ---

    pub fn relation_exists(&self, company_a: &str, company_b: &str) -> Result<bool, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM relations WHERE company_a = ?1 AND company_b = ?2")?;
        let mut rows = stmt.query(params![company_a, company_b])?;
        Ok(rows.next()?.is_some())
    }

    /// Persists one orientation of a relation record.
    pub fn save_relation(
        &self,
        company_a: &str,
        company_b: &str,
        matrix: &[f64],
        final_value: f64,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO relations (company_a, company_b, matrix, final_value)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                company_a,
                company_b,
                serde_json::to_string(matrix)?,
                final_value
            ],
        )?;
        Ok(())
    }

    pub fn relation(
        &self,
        company_a: &str,
        company_b: &str,
    ) -> Result<Option<RelationRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT matrix, final_value FROM relations WHERE company_a = ?1 AND company_b = ?2",
        )?;
        let mut rows = stmt.query(params![company_a, company_b])?;

        if let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            let final_value: f64 = row.get(1)?;
            Ok(Some(RelationRecord {
                matrix: serde_json::from_str(&raw)?,
                final_value,
            }))
        } else {
            Ok(None)
        }
    }

    /// Just the aggregated scalar for an ordered pair.
    pub fn relation_value(
        &self,
        company_a: &str,
        company_b: &str,
    ) -> Result<Option<f64>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT final_value FROM relations WHERE company_a = ?1 AND company_b = ?2",
        )?;
        let mut rows = stmt.query(params![company_a, company_b])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }
}
