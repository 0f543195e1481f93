use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for every door / fender operation count.
pub const MAX_PANEL_COUNT: u8 = 4;

/// Appraisal details, with English condition labels until translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageDetails {
    pub roof_status: String,
    pub hood_status: String,
    pub trunk_status: String,
    pub doors_changed: u8,
    pub doors_painted: u8,
    pub doors_local: u8,
    pub fenders_changed: u8,
    pub fenders_painted: u8,
    pub fenders_local: u8,
}

impl Default for DamageDetails {
    fn default() -> Self {
        Self {
            roof_status: "Original".to_string(),
            hood_status: "Original".to_string(),
            trunk_status: "Original".to_string(),
            doors_changed: 0,
            doors_painted: 0,
            doors_local: 0,
            fenders_changed: 0,
            fenders_painted: 0,
            fenders_local: 0,
        }
    }
}

impl DamageDetails {
    fn counts(&self) -> [(&'static str, u8); 6] {
        [
            ("doors_changed", self.doors_changed),
            ("doors_painted", self.doors_painted),
            ("doors_local", self.doors_local),
            ("fenders_changed", self.fenders_changed),
            ("fenders_painted", self.fenders_painted),
            ("fenders_local", self.fenders_local),
        ]
    }
}

/// Vehicle attributes submitted for a price estimate. Missing fields take
/// the form defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionInput {
    pub brand: String,
    pub series: String,
    pub model: String,
    pub year: u16,
    pub mileage: u32,
    pub transmission: String,
    pub fuel: String,
    pub body_type: String,
    pub engine_cc_val: u32,
    pub power_hp_val: u32,
    pub torque_nm: u32,
    pub cylinder_count: u8,
    pub kb_drivetrain: String,
    pub segment_clean: String,
    pub gb_warranty_status: String,
    /// 0 or 1.
    pub is_heavy_damaged: u8,
    pub damage_details: DamageDetails,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            brand: String::new(),
            series: String::new(),
            model: String::new(),
            year: 2020,
            mileage: 50_000,
            transmission: "Automatic".to_string(),
            fuel: "Gasoline".to_string(),
            body_type: "Sedan".to_string(),
            engine_cc_val: 1598,
            power_hp_val: 170,
            torque_nm: 250,
            cylinder_count: 4,
            kb_drivetrain: "RWD".to_string(),
            segment_clean: "D Segment".to_string(),
            gb_warranty_status: "No Warranty".to_string(),
            is_heavy_damaged: 0,
            damage_details: DamageDetails::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please complete Brand, Series, and Model selections.")]
    MissingIdentity,
    #[error("{field} must be between 0 and 4, got {value}")]
    PanelCountOutOfRange { field: &'static str, value: u8 },
}

impl PredictionInput {
    /// Default form values with the identity fields filled in.
    pub fn example(brand: &str, series: &str, model: &str) -> Self {
        Self {
            brand: brand.to_string(),
            series: series.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    /// Checks that must pass before any request is issued.
    pub fn validate(&self) -> Result<(), InputError> {
        let blank = |value: &str| value.trim().is_empty();
        if blank(&self.brand) || blank(&self.series) || blank(&self.model) {
            return Err(InputError::MissingIdentity);
        }
        for (field, value) in self.damage_details.counts() {
            if value > MAX_PANEL_COUNT {
                return Err(InputError::PanelCountOutOfRange {
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub margin_percent: f64,
}

/// Price estimate returned by `POST /predict/{version}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub price: f64,
    pub price_range: PriceRange,
    #[serde(default)]
    pub version: String,
    pub calculated_risk_score: f64,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_brand_series_and_model() {
        assert_eq!(PredictionInput::default().validate(), Err(InputError::MissingIdentity));
        assert_eq!(
            PredictionInput::example("BMW", "3 Serisi", " ").validate(),
            Err(InputError::MissingIdentity)
        );
        assert_eq!(PredictionInput::example("BMW", "3 Serisi", "320i").validate(), Ok(()));
    }

    #[test]
    fn validate_bounds_panel_counts() {
        let mut input = PredictionInput::example("BMW", "3 Serisi", "320i");
        input.damage_details.fenders_painted = 4;
        assert_eq!(input.validate(), Ok(()));

        input.damage_details.fenders_painted = 5;
        assert_eq!(
            input.validate(),
            Err(InputError::PanelCountOutOfRange {
                field: "fenders_painted",
                value: 5,
            })
        );
    }

    #[test]
    fn result_parses_service_payload() {
        let json = r#"{
            "price": 1250000.0,
            "price_range": {"min": 1100000.0, "max": 1400000.0, "margin_percent": 12.0},
            "version": "v3",
            "calculated_risk_score": 0.18,
            "currency": "TRY"
        }"#;
        let result: PredictionResult = serde_json::from_str(json).expect("parse result");
        assert_eq!(result.price_range.max, 1_400_000.0);
        assert_eq!(result.currency, "TRY");
    }
}
