use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Validate;
use crate::error::NaviconomyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refill {
    pub id: i64,
    pub fill_date: NaiveDate,
    pub odometer: f64,
    pub liters_filled: f64,
    pub brand_id: i64,
    pub octane_id: i64,
    pub ethanol_percent: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefillCreate {
    /// Defaults to today (UTC) when omitted.
    #[serde(default)]
    pub fill_date: Option<NaiveDate>,
    pub odometer: f64,
    pub liters_filled: f64,
    pub brand_id: i64,
    pub octane_id: i64,
    pub ethanol_percent: f64,
    pub cost: f64,
}

impl Validate for RefillCreate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        check_quantity("odometer", self.odometer)?;
        check_quantity("liters_filled", self.liters_filled)?;
        check_quantity("cost", self.cost)?;
        check_ethanol(self.ethanol_percent)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefillUpdate {
    #[serde(default)]
    pub fill_date: Option<NaiveDate>,
    #[serde(default)]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub liters_filled: Option<f64>,
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub octane_id: Option<i64>,
    #[serde(default)]
    pub ethanol_percent: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl Validate for RefillUpdate {
    fn validate(&self) -> Result<(), NaviconomyError> {
        for (field, value) in [
            ("odometer", self.odometer),
            ("liters_filled", self.liters_filled),
            ("cost", self.cost),
        ] {
            if let Some(v) = value {
                check_quantity(field, v)?;
            }
        }
        self.ethanol_percent.map_or(Ok(()), check_ethanol)
    }
}

fn check_quantity(field: &str, value: f64) -> Result<(), NaviconomyError> {
    if !value.is_finite() || value < 0.0 {
        return Err(NaviconomyError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

fn check_ethanol(value: f64) -> Result<(), NaviconomyError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(NaviconomyError::Validation(
            "ethanol_percent must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_types_reject_mistyped_fields() {
        let bad = [
            r#"{"odometer": true, "liters_filled": 3.5, "brand_id": 1, "octane_id": 1, "ethanol_percent": 0.1, "cost": 1.0}"#,
            r#"{"odometer": 1.0, "liters_filled": "full tank", "brand_id": 1, "octane_id": 1, "ethanol_percent": 0.1, "cost": 1.0}"#,
            r#"{"odometer": 1.0, "liters_filled": 3.5, "brand_id": false, "octane_id": 1, "ethanol_percent": 0.1, "cost": 1.0}"#,
            r#"{"fill_date": false, "odometer": 1.0, "liters_filled": 3.5, "brand_id": 1, "octane_id": 1, "ethanol_percent": 0.1, "cost": 1.0}"#,
            r#"{"odometer": 1.0, "liters_filled": 3.5, "brand_id": 1, "ethanol_percent": 0.1, "cost": 1.0}"#,
        ];
        for payload in bad {
            assert!(
                serde_json::from_str::<RefillCreate>(payload).is_err(),
                "{payload} should not deserialize"
            );
        }
    }

    #[test]
    fn fill_date_is_optional() {
        let refill: RefillCreate = serde_json::from_str(
            r#"{"odometer": 123.5, "liters_filled": 3.5, "brand_id": 1, "octane_id": 1, "ethanol_percent": 0.1, "cost": 175.5}"#,
        )
        .expect("payload should deserialize");
        assert!(refill.fill_date.is_none());
        assert!(refill.validate().is_ok());
    }

    #[test]
    fn update_checks_only_present_fields() {
        let update = RefillUpdate {
            ethanol_percent: Some(150.0),
            ..RefillUpdate::default()
        };
        assert!(update.validate().is_err());
        assert!(RefillUpdate::default().validate().is_ok());
    }
}
