use crate::db::{Database, DbAccount, is_unique_violation};
use crate::error::NaviconomyError;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

pub const REGISTRATION_RACE: &str =
    "Conflict detected during registration. Please try a different username or email.";

const ACCOUNT_COLUMNS: &str =
    "id, username, email, hashed_password, is_active, created_at, updated_at";

/// Persistence-backed account lookup and creation.
#[derive(Clone)]
pub struct AccountDirectory {
    db: Database,
}

impl AccountDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<DbAccount>, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = fetch_by_username(&mut tx, username).await;
        self.db.finish(tx, result).await
    }

    /// First account already holding `username` or `email`, if any.
    pub async fn find_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<DbAccount>, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query_as::<_, DbAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ? OR email = ? \
             ORDER BY username = ? DESC LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .bind(username)
        .fetch_optional(&mut *tx)
        .await
        .map_err(NaviconomyError::from);
        self.db.finish(tx, result).await
    }

    /// Insert a new active account.
    ///
    /// A UNIQUE violation here means another registration won the race past
    /// the upfront check; it surfaces as `RegistrationConflict`.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<DbAccount, NaviconomyError> {
        let now = Utc::now();
        let account = DbAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            hashed_password: password_hash.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin_write().await?;
        let result = insert(&mut tx, &account).await.map(|()| account);
        self.db.finish(tx, result).await
    }

    /// Toggle the active flag; refreshes `updated_at`.
    ///
    /// Operator hook: no route exposes it. Deactivated accounts still log in
    /// but are refused by the identity guard. Returns `false` for unknown users.
    pub async fn set_active(&self, username: &str, active: bool) -> Result<bool, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE username = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(username)
            .execute(&mut *tx)
            .await
            .map(|done| done.rows_affected() > 0)
            .map_err(NaviconomyError::from);
        self.db.finish(tx, result).await
    }

    /// Number of registered accounts. Operator hook, used by tests to assert
    /// that rejected registrations wrote nothing.
    pub async fn count(&self) -> Result<i64, NaviconomyError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}

async fn fetch_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<DbAccount>, NaviconomyError> {
    Ok(sqlx::query_as::<_, DbAccount>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(conn)
    .await?)
}

async fn insert(conn: &mut SqliteConnection, account: &DbAccount) -> Result<(), NaviconomyError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, hashed_password, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.id)
    .bind(&account.username)
    .bind(&account.email)
    .bind(&account.hashed_password)
    .bind(account.is_active)
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            debug!(username = %account.username, "registration lost a uniqueness race");
            NaviconomyError::RegistrationConflict(REGISTRATION_RACE.to_string())
        } else {
            e.into()
        }
    })?;
    Ok(())
}
