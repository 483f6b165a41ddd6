use super::{brands, octanes};
use crate::db::{Database, DbRefill};
use crate::error::{NaviconomyError, Relation};
use crate::types::{Refill, RefillCreate, RefillUpdate};
use chrono::Utc;
use sqlx::SqliteConnection;

const ENTITY: &str = "Refill";
const REFILL_COLUMNS: &str =
    "id, fill_date, odometer, liters_filled, brand_id, octane_id, ethanol_percent, cost";

#[derive(Clone)]
pub struct RefillRepository {
    db: Database,
}

impl RefillRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a refill after resolving both references in the same unit of work.
    pub async fn create(&self, params: RefillCreate) -> Result<Refill, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = insert(&mut tx, params).await;
        self.db.finish(tx, result).await.map(Refill::from)
    }

    pub async fn find(&self, id: i64) -> Result<DbRefill, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = find_in(&mut tx, id).await;
        self.db.finish(tx, result).await
    }

    pub async fn list(&self) -> Result<Vec<Refill>, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query_as::<_, DbRefill>(&format!(
            "SELECT {REFILL_COLUMNS} FROM fct_refills ORDER BY id"
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(NaviconomyError::from);
        let rows = self.db.finish(tx, result).await?;
        Ok(rows.into_iter().map(Refill::from).collect())
    }

    pub async fn read(&self, id: i64) -> Result<Refill, NaviconomyError> {
        self.find(id).await.map(Refill::from)
    }

    /// Apply only the supplied fields; changed references are resolved first.
    pub async fn update(&self, id: i64, params: RefillUpdate) -> Result<Refill, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = apply_update(&mut tx, id, params).await;
        self.db.finish(tx, result).await.map(Refill::from)
    }

    pub async fn delete(&self, id: i64) -> Result<Refill, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = remove(&mut tx, id).await;
        self.db.finish(tx, result).await.map(Refill::from)
    }
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<DbRefill>, NaviconomyError> {
    Ok(sqlx::query_as::<_, DbRefill>(&format!(
        "SELECT {REFILL_COLUMNS} FROM fct_refills WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<DbRefill, NaviconomyError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| NaviconomyError::not_found(ENTITY, id))
}

/// Fail with `RelatedEntityNotFound` unless both references exist.
async fn resolve_relations(
    conn: &mut SqliteConnection,
    brand_id: i64,
    octane_id: i64,
) -> Result<(), NaviconomyError> {
    if brands::fetch(conn, brand_id).await?.is_none() {
        return Err(NaviconomyError::related_not_found(Relation::Brand, brand_id));
    }
    if octanes::fetch(conn, octane_id).await?.is_none() {
        return Err(NaviconomyError::related_not_found(Relation::Octane, octane_id));
    }
    Ok(())
}

async fn insert(conn: &mut SqliteConnection, params: RefillCreate) -> Result<DbRefill, NaviconomyError> {
    resolve_relations(conn, params.brand_id, params.octane_id).await?;

    let fill_date = params.fill_date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(sqlx::query_as::<_, DbRefill>(&format!(
        r#"
        INSERT INTO fct_refills
            (fill_date, odometer, liters_filled, brand_id, octane_id, ethanol_percent, cost)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {REFILL_COLUMNS}
        "#
    ))
    .bind(fill_date)
    .bind(params.odometer)
    .bind(params.liters_filled)
    .bind(params.brand_id)
    .bind(params.octane_id)
    .bind(params.ethanol_percent)
    .bind(params.cost)
    .fetch_one(conn)
    .await?)
}

async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    params: RefillUpdate,
) -> Result<DbRefill, NaviconomyError> {
    let mut row = find_in(conn, id).await?;

    if let Some(fill_date) = params.fill_date {
        row.fill_date = fill_date;
    }
    if let Some(odometer) = params.odometer {
        row.odometer = odometer;
    }
    if let Some(liters_filled) = params.liters_filled {
        row.liters_filled = liters_filled;
    }
    if let Some(brand_id) = params.brand_id {
        row.brand_id = brand_id;
    }
    if let Some(octane_id) = params.octane_id {
        row.octane_id = octane_id;
    }
    if let Some(ethanol_percent) = params.ethanol_percent {
        row.ethanol_percent = ethanol_percent;
    }
    if let Some(cost) = params.cost {
        row.cost = cost;
    }

    resolve_relations(conn, row.brand_id, row.octane_id).await?;

    sqlx::query(
        r#"
        UPDATE fct_refills SET
            fill_date = ?,
            odometer = ?,
            liters_filled = ?,
            brand_id = ?,
            octane_id = ?,
            ethanol_percent = ?,
            cost = ?
          WHERE id = ?
        "#,
    )
    .bind(row.fill_date)
    .bind(row.odometer)
    .bind(row.liters_filled)
    .bind(row.brand_id)
    .bind(row.octane_id)
    .bind(row.ethanol_percent)
    .bind(row.cost)
    .bind(row.id)
    .execute(conn)
    .await?;
    Ok(row)
}

async fn remove(conn: &mut SqliteConnection, id: i64) -> Result<DbRefill, NaviconomyError> {
    let row = find_in(conn, id).await?;
    sqlx::query("DELETE FROM fct_refills WHERE id = ?")
        .bind(row.id)
        .execute(conn)
        .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::testing;
    use crate::repository::Repositories;
    use crate::types::{BrandCreate, BrandUpdate, OctaneCreate};
    use chrono::NaiveDate;

    async fn seeded() -> (Repositories, tempfile::TempDir) {
        let (db, dir) = testing::database().await;
        let repos = Repositories::new(db);
        for name in ["x", "y"] {
            repos
                .brands
                .create(BrandCreate { name: name.to_string() })
                .await
                .expect("seed brand");
        }
        for grade in [91, 95] {
            repos
                .octanes
                .create(OctaneCreate { grade })
                .await
                .expect("seed octane");
        }
        (repos, dir)
    }

    fn params(brand_id: i64, octane_id: i64) -> RefillCreate {
        RefillCreate {
            fill_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            odometer: 123.5,
            liters_filled: 3.5,
            brand_id,
            octane_id,
            ethanol_percent: 0.1,
            cost: 175.5,
        }
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let (repos, _dir) = seeded().await;
        let created = repos.refills.create(params(1, 2)).await.expect("create");
        assert_eq!(created.id, 1);
        assert_eq!(created.fill_date, NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
        assert_eq!(repos.refills.read(created.id).await.expect("read"), created);
    }

    #[tokio::test]
    async fn fill_date_defaults_to_today() {
        let (repos, _dir) = seeded().await;
        let before = Utc::now().date_naive();
        let created = repos
            .refills
            .create(RefillCreate {
                fill_date: None,
                ..params(1, 1)
            })
            .await
            .expect("create");
        let after = Utc::now().date_naive();
        assert!(created.fill_date == before || created.fill_date == after);
    }

    #[tokio::test]
    async fn unknown_references_name_the_relation() {
        let (repos, _dir) = seeded().await;

        let err = repos.refills.create(params(1000, 1)).await.expect_err("brand");
        assert!(matches!(
            err,
            NaviconomyError::RelatedEntityNotFound { relation: Relation::Brand, .. }
        ));
        let err = repos.refills.create(params(1, 1000)).await.expect_err("octane");
        assert!(matches!(
            err,
            NaviconomyError::RelatedEntityNotFound { relation: Relation::Octane, .. }
        ));
        assert!(repos.refills.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (repos, _dir) = seeded().await;
        let created = repos.refills.create(params(1, 1)).await.expect("create");

        let updated = repos
            .refills
            .update(
                created.id,
                RefillUpdate {
                    cost: Some(200.5),
                    brand_id: Some(2),
                    ..RefillUpdate::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(
            updated,
            Refill {
                cost: 200.5,
                brand_id: 2,
                ..created.clone()
            }
        );

        let err = repos
            .refills
            .update(
                created.id,
                RefillUpdate {
                    octane_id: Some(1000),
                    ..RefillUpdate::default()
                },
            )
            .await
            .expect_err("bad octane");
        assert!(matches!(
            err,
            NaviconomyError::RelatedEntityNotFound { relation: Relation::Octane, .. }
        ));
        assert_eq!(repos.refills.read(created.id).await.expect("read").octane_id, 1);
    }

    #[tokio::test]
    async fn delete_then_not_found() {
        let (repos, _dir) = seeded().await;
        let created = repos.refills.create(params(2, 2)).await.expect("create");
        assert_eq!(repos.refills.delete(created.id).await.expect("delete"), created);
        assert!(matches!(
            repos.refills.read(created.id).await,
            Err(NaviconomyError::NotFound(ref m)) if m == "Refill with id 1 does not exist."
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_writes_all_succeed() {
        let (repos, _dir) = seeded().await;

        let creates: Vec<_> = (0..32)
            .map(|_| {
                let repos = repos.clone();
                tokio::spawn(async move { repos.refills.create(params(1, 1)).await })
            })
            .collect();
        for task in creates {
            task.await.expect("join").expect("concurrent create");
        }
        assert_eq!(repos.refills.list().await.expect("list").len(), 32);

        let updates: Vec<_> = (0..32)
            .map(|i| {
                let repos = repos.clone();
                tokio::spawn(async move {
                    repos
                        .brands
                        .update(
                            1,
                            BrandUpdate {
                                name: Some(format!("brand-{i}")),
                            },
                        )
                        .await
                })
            })
            .collect();
        for task in updates {
            task.await.expect("join").expect("concurrent update");
        }
        assert!(repos.brands.read(1).await.expect("read").name.starts_with("brand-"));
    }

    #[tokio::test]
    async fn referenced_brand_cannot_be_deleted() {
        let (repos, _dir) = seeded().await;
        repos.refills.create(params(1, 1)).await.expect("create");

        let err = repos.brands.delete(1).await.expect_err("still referenced");
        assert!(matches!(err, NaviconomyError::ServiceUnavailable(_)));
        assert!(repos.brands.read(1).await.is_ok());
    }
}
