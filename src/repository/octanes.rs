use super::unique_or;
use crate::db::{Database, DbOctane};
use crate::error::NaviconomyError;
use crate::types::{Octane, OctaneCreate, OctaneUpdate};
use sqlx::SqliteConnection;

const ENTITY: &str = "Octane";

#[derive(Clone)]
pub struct OctaneRepository {
    db: Database,
}

impl OctaneRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: OctaneCreate) -> Result<Octane, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = sqlx::query_as::<_, DbOctane>(
            "INSERT INTO dim_octanes (grade) VALUES (?) RETURNING id, grade",
        )
        .bind(params.grade)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_or("Octane already exists.", e));
        self.db.finish(tx, result).await.map(Octane::from)
    }

    pub async fn find(&self, id: i64) -> Result<DbOctane, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = find_in(&mut tx, id).await;
        self.db.finish(tx, result).await
    }

    pub async fn list(&self) -> Result<Vec<Octane>, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query_as::<_, DbOctane>("SELECT id, grade FROM dim_octanes ORDER BY id")
            .fetch_all(&mut *tx)
            .await
            .map_err(NaviconomyError::from);
        let rows = self.db.finish(tx, result).await?;
        Ok(rows.into_iter().map(Octane::from).collect())
    }

    pub async fn read(&self, id: i64) -> Result<Octane, NaviconomyError> {
        self.find(id).await.map(Octane::from)
    }

    pub async fn update(&self, id: i64, params: OctaneUpdate) -> Result<Octane, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = apply_update(&mut tx, id, params).await;
        self.db.finish(tx, result).await.map(Octane::from)
    }

    pub async fn delete(&self, id: i64) -> Result<Octane, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = remove(&mut tx, id).await;
        self.db.finish(tx, result).await.map(Octane::from)
    }
}

pub(crate) async fn fetch(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<DbOctane>, NaviconomyError> {
    Ok(sqlx::query_as::<_, DbOctane>("SELECT id, grade FROM dim_octanes WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<DbOctane, NaviconomyError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| NaviconomyError::not_found(ENTITY, id))
}

async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    params: OctaneUpdate,
) -> Result<DbOctane, NaviconomyError> {
    let mut row = find_in(conn, id).await?;
    if let Some(grade) = params.grade {
        row.grade = grade;
    }
    sqlx::query("UPDATE dim_octanes SET grade = ? WHERE id = ?")
        .bind(row.grade)
        .bind(row.id)
        .execute(conn)
        .await
        .map_err(|e| unique_or("Octane with this grade already exists.", e))?;
    Ok(row)
}

async fn remove(conn: &mut SqliteConnection, id: i64) -> Result<DbOctane, NaviconomyError> {
    let row = find_in(conn, id).await?;
    sqlx::query("DELETE FROM dim_octanes WHERE id = ?")
        .bind(row.id)
        .execute(conn)
        .await?;
    Ok(row)
}
