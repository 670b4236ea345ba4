use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};

use crate::error::ApiError;
use crate::models::Todo;

// AUTOINCREMENT keeps deleted ids from ever being handed out again.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0
)";

/// Handle to the todos database. Cheap to clone; handlers open one
/// [`TodoSession`] per request.
#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Opens the database file at `url`, creating it and the todos table if
    /// they do not exist yet.
    pub async fn connect(url: &str) -> Result<Self, ApiError> {
        let options = url
            .parse::<SqliteConnectOptions>()
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// In-memory store for tests and local experiments. A single
    /// never-recycled connection keeps the database alive for the store's
    /// lifetime.
    pub async fn in_memory() -> Result<Self, ApiError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Acquires a connection for one request's worth of work. Dropping the
    /// session returns the connection to the pool, whichever way the request
    /// ends.
    pub async fn session(&self) -> Result<TodoSession, ApiError> {
        Ok(TodoSession {
            conn: self.pool.acquire().await?,
        })
    }
}

/// Scoped storage session: one pooled connection, one request. Every
/// operation is a single parameterized statement that commits immediately.
pub struct TodoSession {
    conn: PoolConnection<Sqlite>,
}

impl TodoSession {
    /// All records in primary-key order.
    pub async fn list_all(&mut self) -> Result<Vec<Todo>, ApiError> {
        let todos =
            sqlx::query_as::<_, Todo>("SELECT id, title, completed FROM todos ORDER BY id")
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(todos)
    }

    /// Inserts a new record and returns it with its assigned id.
    pub async fn create(&mut self, title: &str, completed: bool) -> Result<Todo, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, completed) VALUES (?, ?) \
             RETURNING id, title, completed",
        )
        .bind(title)
        .bind(completed)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(todo)
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<Todo>, ApiError> {
        let todo = sqlx::query_as::<_, Todo>("SELECT id, title, completed FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(todo)
    }

    /// Full overwrite of both mutable fields; a missing row surfaces as
    /// [`ApiError::NotFound`].
    pub async fn update(
        &mut self,
        id: i64,
        title: &str,
        completed: bool,
    ) -> Result<Todo, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET title = ?, completed = ? WHERE id = ? \
             RETURNING id, title, completed",
        )
        .bind(title)
        .bind(completed)
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(todo)
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> TodoStore {
        TodoStore::in_memory().await.expect("in-memory store")
    }

    #[tokio::test]
    async fn create_assigns_positive_id() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let todo = session.create("Buy milk", false).await.unwrap();
        assert!(todo.id > 0);
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn list_returns_rows_in_id_order() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let first = session.create("A", false).await.unwrap();
        let second = session.create("B", true).await.unwrap();

        let todos = session.list_all().await.unwrap();
        assert_eq!(todos, vec![first, second]);
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_missing_row() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        assert_eq!(session.get_by_id(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_overwrites_both_fields() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let todo = session.create("Draft", false).await.unwrap();
        let updated = session.update(todo.id, "Final", true).await.unwrap();

        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.title, "Final");
        assert!(updated.completed);
        assert_eq!(session.get_by_id(todo.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let err = session.update(9999, "X", true).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_row_and_reports_missing() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let todo = session.create("Done soon", false).await.unwrap();
        session.delete(todo.id).await.unwrap();
        assert_eq!(session.get_by_id(todo.id).await.unwrap(), None);

        let err = session.delete(todo.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = store().await;
        let mut session = store.session().await.unwrap();

        let first = session.create("First", false).await.unwrap();
        session.delete(first.id).await.unwrap();

        let second = session.create("Second", false).await.unwrap();
        assert!(second.id > first.id);
    }
}
