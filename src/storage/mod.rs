// Storage module: SQLite-backed article, keyword and relation stores.

pub mod sqlite;

pub use sqlite::SqliteStorage;
