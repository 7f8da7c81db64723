use crate::error::{AppError, AppResult};
use crate::models::{DailyCount, NewResponse, Response, ResponseStats};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub type DbConnection = Arc<Mutex<Connection>>;

const RESPONSE_COLUMNS: &str = "id, first_name, email, question_1, question_2, question_3, \
     question_4, question_5, submitted_at, ip_address, user_agent";

pub struct Database {
    connection: DbConnection,
}

impl Database {
    pub fn new(db_path: &PathBuf) -> AppResult<Self> {
        // Ensure the database directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;

        let database = Database {
            connection: Arc::new(Mutex::new(conn)),
        };

        database.run_migrations()?;

        Ok(database)
    }

    #[allow(dead_code)]
    pub fn connection(&self) -> DbConnection {
        Arc::clone(&self.connection)
    }

    fn run_migrations(&self) -> AppResult<()> {
        let conn = self.lock_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                email TEXT NOT NULL,
                question_1 TEXT,
                question_2 TEXT,
                question_3 TEXT,
                question_4 TEXT,
                question_5 TEXT,
                submitted_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                ip_address TEXT,
                user_agent TEXT
            )",
            [],
        )?;

        // Listings, search and the daily breakdown all order by submission time
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_responses_submitted_at ON responses(submitted_at)",
            [],
        )?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    fn lock_connection(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to acquire database lock: {e}")))
    }

    /// Inserts one submission and returns the id the store assigned to it.
    /// `submitted_at` is filled in by the store clock.
    pub fn create_response(&self, response: &NewResponse) -> AppResult<i64> {
        let conn = self.lock_connection()?;

        conn.execute(
            "INSERT INTO responses
                (first_name, email, question_1, question_2, question_3,
                 question_4, question_5, ip_address, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                response.first_name,
                response.email,
                response.question_1,
                response.question_2,
                response.question_3,
                response.question_4,
                response.question_5,
                response.ip_address,
                response.user_agent,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!("Stored questionnaire response {id}");
        Ok(id)
    }

    /// All rows, most recent first. The id tie-break keeps the order
    /// deterministic for rows sharing a CURRENT_TIMESTAMP second.
    pub fn get_all_responses(&self) -> AppResult<Vec<Response>> {
        let conn = self.lock_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses ORDER BY submitted_at DESC, id DESC"
        ))?;

        let response_iter = stmt.query_map([], map_response_row)?;

        let mut responses = Vec::new();
        for response in response_iter {
            responses.push(response?);
        }

        Ok(responses)
    }

    pub fn get_response_by_id(&self, id: i64) -> AppResult<Response> {
        let conn = self.lock_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses WHERE id = ?1"
        ))?;

        let response = stmt
            .query_row([id], map_response_row)
            .optional()?
            .ok_or(AppError::ResponseNotFound(id))?;

        Ok(response)
    }

    pub fn delete_response(&self, id: i64) -> AppResult<()> {
        let conn = self.lock_connection()?;

        let rows_affected = conn.execute("DELETE FROM responses WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(AppError::ResponseNotFound(id));
        }

        tracing::info!("Deleted questionnaire response {id}");
        Ok(())
    }

    /// Case-insensitive substring match against name or email, most recent
    /// first. The query text is bound as a parameter inside the pattern.
    pub fn search_responses(&self, query: &str) -> AppResult<Vec<Response>> {
        let conn = self.lock_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses
             WHERE first_name LIKE ?1 OR email LIKE ?1
             ORDER BY submitted_at DESC, id DESC"
        ))?;

        let pattern = format!("%{query}%");
        let response_iter = stmt.query_map([pattern], map_response_row)?;

        let mut responses = Vec::new();
        for response in response_iter {
            responses.push(response?);
        }

        Ok(responses)
    }

    /// The three summary aggregates, plus the 30-day daily breakdown when
    /// `extended` is set. Any failing aggregate fails the whole call.
    pub fn get_stats(&self, extended: bool) -> AppResult<ResponseStats> {
        let conn = self.lock_connection()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;

        let today: i64 = conn.query_row(
            "SELECT COUNT(*) FROM responses WHERE DATE(submitted_at) = DATE('now')",
            [],
            |row| row.get(0),
        )?;

        let unique_emails: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT email) FROM responses",
            [],
            |row| row.get(0),
        )?;

        let daily = if extended {
            let mut stmt = conn.prepare(
                "SELECT DATE(submitted_at) AS day, COUNT(*) FROM responses
                 WHERE submitted_at >= DATETIME('now', '-30 days')
                 GROUP BY day ORDER BY day DESC",
            )?;

            let day_iter = stmt.query_map([], |row| {
                Ok(DailyCount {
                    date: row.get(0)?,
                    count: row.get(1)?,
                })
            })?;

            let mut days = Vec::new();
            for day in day_iter {
                days.push(day?);
            }
            Some(days)
        } else {
            None
        };

        Ok(ResponseStats {
            total,
            today,
            unique_emails,
            daily,
        })
    }
}

fn map_response_row(row: &rusqlite::Row) -> rusqlite::Result<Response> {
    Ok(Response {
        id: row.get(0)?,
        first_name: row.get(1)?,
        email: row.get(2)?,
        question_1: row.get(3)?,
        question_2: row.get(4)?,
        question_3: row.get(5)?,
        question_4: row.get(6)?,
        question_5: row.get(7)?,
        submitted_at: row.get(8)?,
        ip_address: row.get(9)?,
        user_agent: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn submission(first_name: &str, email: &str) -> NewResponse {
        NewResponse {
            first_name: first_name.to_string(),
            email: email.to_string(),
            question_1: None,
            question_2: None,
            question_3: None,
            question_4: None,
            question_5: None,
            ip_address: None,
            user_agent: None,
        }
    }

    #[test]
    fn create_then_get_round_trip() {
        let (_dir, db) = test_db();

        let mut new_response = submission("Ana", "a@x.com");
        new_response.question_1 = Some("yes".to_string());
        new_response.ip_address = Some("127.0.0.1".to_string());

        let id = db.create_response(&new_response).unwrap();
        assert_eq!(id, 1);

        let stored = db.get_response_by_id(id).unwrap();
        assert_eq!(stored.first_name, "Ana");
        assert_eq!(stored.email, "a@x.com");
        assert_eq!(stored.question_1.as_deref(), Some("yes"));
        assert_eq!(stored.question_2, None);
        assert!(!stored.submitted_at.is_empty());
    }

    #[test]
    fn get_missing_id_is_not_found() {
        let (_dir, db) = test_db();

        match db.get_response_by_id(42) {
            Err(AppError::ResponseNotFound(42)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn delete_is_idempotent_in_effect() {
        let (_dir, db) = test_db();

        let id = db.create_response(&submission("Bob", "b@x.com")).unwrap();

        db.delete_response(id).unwrap();
        match db.delete_response(id) {
            Err(AppError::ResponseNotFound(_)) => {}
            other => panic!("expected not found on second delete, got {other:?}"),
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, db) = test_db();

        let first = db.create_response(&submission("Ana", "a@x.com")).unwrap();
        db.delete_response(first).unwrap();

        let second = db.create_response(&submission("Bob", "b@x.com")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn listing_is_most_recent_first() {
        let (_dir, db) = test_db();

        for i in 1..=3 {
            db.create_response(&submission(&format!("User{i}"), &format!("u{i}@x.com")))
                .unwrap();
        }

        let responses = db.get_all_responses().unwrap();
        assert_eq!(responses.len(), 3);
        let ids: Vec<i64> = responses.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn search_matches_name_and_email_case_insensitively() {
        let (_dir, db) = test_db();

        db.create_response(&submission("Alice", "alice@example.com"))
            .unwrap();
        db.create_response(&submission("Bob", "bob@other.org"))
            .unwrap();

        let by_name = db.search_responses("aLiCe").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].first_name, "Alice");

        let by_email_domain = db.search_responses("example.com").unwrap();
        assert_eq!(by_email_domain.len(), 1);

        let none = db.search_responses("zzz").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn stats_count_totals_and_distinct_emails() {
        let (_dir, db) = test_db();

        db.create_response(&submission("Ana", "a@x.com")).unwrap();
        db.create_response(&submission("Ana Again", "a@x.com"))
            .unwrap();
        db.create_response(&submission("Bob", "b@x.com")).unwrap();

        let stats = db.get_stats(false).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.today, 3);
        assert_eq!(stats.unique_emails, 2);
        assert!(stats.daily.is_none());

        let extended = db.get_stats(true).unwrap();
        let daily = extended.daily.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].count, 3);
    }
}
