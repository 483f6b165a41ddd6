use serde::{Deserialize, Serialize};

use super::Validate;
use crate::error::NaviconomyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Octane {
    pub id: i64,
    pub grade: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OctaneCreate {
    pub grade: i64,
}

impl Validate for OctaneCreate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        check_grade(self.grade)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OctaneUpdate {
    #[serde(default)]
    pub grade: Option<i64>,
}

impl Validate for OctaneUpdate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        self.grade.map_or(Ok(()), check_grade)
    }
}

fn check_grade(grade: i64) -> Result<(), NaviconomyError> {
    if grade <= 0 {
        return Err(NaviconomyError::Validation(
            "grade must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
