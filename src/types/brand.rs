use serde::{Deserialize, Serialize};

use super::{Validate, check_len};
use crate::error::NaviconomyError;

pub const BRAND_NAME_MAX_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandCreate {
    pub name: String,
}

impl Validate for BrandCreate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        check_len("name", &self.name, BRAND_NAME_MAX_LEN)
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandUpdate {
    #[serde(default)]
    pub name: Option<String>,
}

impl Validate for BrandUpdate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        match &self.name {
            Some(name) => check_len("name", name, BRAND_NAME_MAX_LEN),
            None => Ok(()),
        }
    }
}
