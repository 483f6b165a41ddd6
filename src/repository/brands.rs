use super::unique_or;
use crate::db::{Database, DbBrand};
use crate::error::NaviconomyError;
use crate::types::{Brand, BrandCreate, BrandUpdate};
use sqlx::SqliteConnection;

const ENTITY: &str = "Brand";

#[derive(Clone)]
pub struct BrandRepository {
    db: Database,
}

impl BrandRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: BrandCreate) -> Result<Brand, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = sqlx::query_as::<_, DbBrand>(
            "INSERT INTO dim_brands (name) VALUES (?) RETURNING id, name",
        )
        .bind(&params.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_or("Brand already exists.", e));
        self.db.finish(tx, result).await.map(Brand::from)
    }

    /// Storage row for `id`, or `NotFound`.
    pub async fn find(&self, id: i64) -> Result<DbBrand, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = find_in(&mut tx, id).await;
        self.db.finish(tx, result).await
    }

    pub async fn list(&self) -> Result<Vec<Brand>, NaviconomyError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query_as::<_, DbBrand>("SELECT id, name FROM dim_brands ORDER BY id")
            .fetch_all(&mut *tx)
            .await
            .map_err(NaviconomyError::from);
        let rows = self.db.finish(tx, result).await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    pub async fn read(&self, id: i64) -> Result<Brand, NaviconomyError> {
        self.find(id).await.map(Brand::from)
    }

    /// Apply only the supplied fields.
    pub async fn update(&self, id: i64, params: BrandUpdate) -> Result<Brand, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = apply_update(&mut tx, id, params).await;
        self.db.finish(tx, result).await.map(Brand::from)
    }

    /// Hard delete; returns what was removed.
    pub async fn delete(&self, id: i64) -> Result<Brand, NaviconomyError> {
        let mut tx = self.db.begin_write().await?;
        let result = remove(&mut tx, id).await;
        self.db.finish(tx, result).await.map(Brand::from)
    }
}

pub(crate) async fn fetch(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<DbBrand>, NaviconomyError> {
    Ok(sqlx::query_as::<_, DbBrand>("SELECT id, name FROM dim_brands WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<DbBrand, NaviconomyError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| NaviconomyError::not_found(ENTITY, id))
}

async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    params: BrandUpdate,
) -> Result<DbBrand, NaviconomyError> {
    let mut row = find_in(conn, id).await?;
    if let Some(name) = params.name {
        row.name = name;
    }
    sqlx::query("UPDATE dim_brands SET name = ? WHERE id = ?")
        .bind(&row.name)
        .bind(row.id)
        .execute(conn)
        .await
        .map_err(|e| unique_or("Brand with this name already exists.", e))?;
    Ok(row)
}

async fn remove(conn: &mut SqliteConnection, id: i64) -> Result<DbBrand, NaviconomyError> {
    let row = find_in(conn, id).await?;
    sqlx::query("DELETE FROM dim_brands WHERE id = ?")
        .bind(row.id)
        .execute(conn)
        .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::testing;

    fn named(name: &str) -> BrandCreate {
        BrandCreate { name: name.to_string() }
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);

        let created = brands.create(named("Shell")).await.expect("create");
        assert_eq!(created, Brand { id: 1, name: "Shell".into() });
        assert_eq!(brands.read(created.id).await.expect("read"), created);
    }

    #[tokio::test]
    async fn duplicate_name_already_exists() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);
        brands.create(named("X")).await.expect("first");

        let err = brands.create(named("X")).await.expect_err("second");
        assert!(matches!(err, NaviconomyError::AlreadyExists(ref m) if m == "Brand already exists."));
        assert_eq!(brands.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn list_is_ordered_and_possibly_empty() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);
        assert!(brands.list().await.expect("empty list").is_empty());

        for name in ["b", "a", "c"] {
            brands.create(named(name)).await.expect("create");
        }
        let ids: Vec<_> = brands.list().await.expect("list").into_iter().map(|b| b.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn update_applies_supplied_fields() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);
        let shell = brands.create(named("Shell")).await.expect("create");

        let unchanged = brands.update(shell.id, BrandUpdate::default()).await.expect("noop");
        assert_eq!(unchanged, shell);

        let renamed = brands
            .update(shell.id, BrandUpdate { name: Some("Esso".into()) })
            .await
            .expect("rename");
        assert_eq!(renamed.name, "Esso");
        assert_eq!(brands.read(shell.id).await.expect("read").name, "Esso");
    }

    #[tokio::test]
    async fn update_collision_and_missing_id() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);
        brands.create(named("A")).await.expect("a");
        let b = brands.create(named("B")).await.expect("b");

        let err = brands
            .update(b.id, BrandUpdate { name: Some("A".into()) })
            .await
            .expect_err("collision");
        assert!(matches!(err, NaviconomyError::AlreadyExists(_)));
        assert_eq!(brands.read(b.id).await.expect("read").name, "B");

        let err = brands.update(99, BrandUpdate::default()).await.expect_err("missing");
        assert!(matches!(err, NaviconomyError::NotFound(ref m) if m == "Brand with id 99 does not exist."));
    }

    #[tokio::test]
    async fn delete_returns_row_then_not_found() {
        let (db, _dir) = testing::database().await;
        let brands = BrandRepository::new(db);
        let shell = brands.create(named("Shell")).await.expect("create");

        assert_eq!(brands.delete(shell.id).await.expect("delete"), shell);
        assert!(matches!(brands.read(shell.id).await, Err(NaviconomyError::NotFound(_))));
        assert!(matches!(brands.delete(shell.id).await, Err(NaviconomyError::NotFound(_))));
    }
}
