use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::types::book::Book;

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection url, e.g. `sqlite://books.db` or `sqlite::memory:`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
        }
    }

    fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid database url: {0}")]
    Url(#[source] sqlx::Error),
    #[error("Failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Book persistence. Every operation is a single statement.
#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    #[tracing::instrument(skip_all, fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(StoreError::Url)?
            .create_if_missing(true);

        // Every connection to `:memory:` opens its own database,
        // so keep exactly one connection alive for the lifetime of the pool.
        let pool_options = match config.is_memory() {
            true => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>),
            false => SqlitePoolOptions::new().max_connections(config.max_connections),
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        tracing::debug!("Connected");

        Ok(Self { pool })
    }

    #[tracing::instrument(skip_all)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;

        tracing::debug!("Migrations applied");

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[tracing::instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    #[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
    pub async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({BOOK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Overwrites every field but the isbn. Returns `None` if no book has that isbn.
    #[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
    pub async fn update(&self, book: &Book) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ? \
             WHERE isbn = ? RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Returns `false` if no book has that isbn.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, isbn: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> BookStore {
        let store = BookStore::connect(&DatabaseConfig::new("sqlite::memory:"))
            .await
            .expect("in-memory database");

        store.migrate().await.expect("migrations");

        store
    }

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: "https://amazon.com/test".to_string(),
            author: "Tester".to_string(),
            language: "English".to_string(),
            pages: 250,
            publisher: "Test Publisher".to_string(),
            title: title.to_string(),
            year: 2024,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = store().await;

        let created = store
            .create(&book("1234567", "The Test Book"))
            .await
            .expect("created");
        assert_eq!(created, book("1234567", "The Test Book"));

        let fetched = store.get("1234567").await.expect("query");
        assert_eq!(fetched, Some(created));

        assert_eq!(store.get("7654321").await.expect("query"), None);
    }

    #[tokio::test]
    async fn list_is_ordered_by_title() {
        let store = store().await;

        store.create(&book("2", "B")).await.expect("created");
        store.create(&book("1", "C")).await.expect("created");
        store.create(&book("3", "A")).await.expect("created");

        let titles = store
            .list()
            .await
            .expect("query")
            .into_iter()
            .map(|book| book.title)
            .collect::<Vec<_>>();

        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn duplicate_isbn_fails() {
        let store = store().await;

        store.create(&book("1", "A")).await.expect("created");

        let result = store.create(&book("1", "B")).await;
        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn update_existing_and_missing() {
        let store = store().await;

        store.create(&book("1", "A")).await.expect("created");

        let updated = store
            .update(&book("1", "Renamed"))
            .await
            .expect("query")
            .expect("book exists");
        assert_eq!(updated.title, "Renamed");

        let missing = store.update(&book("000", "Nope")).await.expect("query");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn delete_existing_and_missing() {
        let store = store().await;

        store.create(&book("1", "A")).await.expect("created");

        assert!(store.delete("1").await.expect("query"));
        assert!(!store.delete("1").await.expect("query"));
        assert!(store.list().await.expect("query").is_empty());
    }
}
