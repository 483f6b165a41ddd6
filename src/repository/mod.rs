//! CRUD repositories for brands, octanes and refills.
//!
//! Every public operation runs in its own unit of work and hands back
//! immutable value types; storage rows stay inside the repository.

pub mod brands;
pub mod octanes;
pub mod refills;

pub use brands::BrandRepository;
pub use octanes::OctaneRepository;
pub use refills::RefillRepository;

use crate::db::{Database, is_unique_violation};
use crate::error::NaviconomyError;

/// The three repositories sharing one pool.
#[derive(Clone)]
pub struct Repositories {
    pub brands: BrandRepository,
    pub octanes: OctaneRepository,
    pub refills: RefillRepository,
}

impl Repositories {
    pub fn new(db: Database) -> Self {
        Self {
            brands: BrandRepository::new(db.clone()),
            octanes: OctaneRepository::new(db.clone()),
            refills: RefillRepository::new(db),
        }
    }
}

/// Map a UNIQUE violation to `AlreadyExists`; anything else is a storage failure.
pub(crate) fn unique_or(message: &str, e: sqlx::Error) -> NaviconomyError {
    if is_unique_violation(&e) {
        NaviconomyError::AlreadyExists(message.to_string())
    } else {
        e.into()
    }
}
