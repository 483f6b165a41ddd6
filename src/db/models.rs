use crate::types::{Brand, Octane, Refill, User};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAccount> for User {
    fn from(d: DbAccount) -> Self {
        User {
            username: d.username,
            email: d.email,
            is_active: d.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbBrand {
    pub id: i64,
    pub name: String,
}

impl From<DbBrand> for Brand {
    fn from(d: DbBrand) -> Self {
        Brand {
            id: d.id,
            name: d.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbOctane {
    pub id: i64,
    pub grade: i64,
}

impl From<DbOctane> for Octane {
    fn from(d: DbOctane) -> Self {
        Octane {
            id: d.id,
            grade: d.grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbRefill {
    pub id: i64,
    pub fill_date: NaiveDate,
    pub odometer: f64,
    pub liters_filled: f64,
    pub brand_id: i64,
    pub octane_id: i64,
    pub ethanol_percent: f64,
    pub cost: f64,
}

impl From<DbRefill> for Refill {
    fn from(d: DbRefill) -> Self {
        Refill {
            id: d.id,
            fill_date: d.fill_date,
            odometer: d.odometer,
            liters_filled: d.liters_filled,
            brand_id: d.brand_id,
            octane_id: d.octane_id,
            ethanol_percent: d.ethanol_percent,
            cost: d.cost,
        }
    }
}
