use serde::{Deserialize, Serialize};

/// Significance level used to colour p-values.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// A trained model version. The service lists versions newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub version_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Paired density values of one histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBin {
    /// Bin label or centre; numeric or textual depending on the feature.
    pub bin: serde_json::Value,
    pub ref_density: f64,
    pub curr_density: f64,
}

/// Distribution comparison of one feature between two versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftFeatureResult {
    pub feature: String,
    /// Two-sample test p-value.
    pub p_value: f64,
    /// Earth-mover distance between the two samples.
    pub emd_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_emd: Option<f64>,
    pub drift_detected: bool,
    #[serde(default)]
    pub chart_data: Vec<DensityBin>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DriftResponse {
    #[serde(default)]
    pub results: Vec<DriftFeatureResult>,
}

impl DriftFeatureResult {
    pub fn is_significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_LEVEL
    }

    /// `< 0.001` for an exact zero, five decimals otherwise.
    pub fn p_value_label(&self) -> String {
        if self.p_value == 0.0 {
            "< 0.001".to_string()
        } else {
            format!("{:.5}", self.p_value)
        }
    }

    /// Gauge needle position in percent (0..=98).
    pub fn needle_position(&self) -> f64 {
        match self.normalized_emd {
            Some(normalized) => (normalized * 200.0).min(98.0),
            None if self.drift_detected => 85.0,
            None => 15.0,
        }
    }
}

/// Default `(reference, current)` pair: the previous version against the
/// newest one, or the newest against itself when only one exists.
pub fn default_comparison(versions: &[ModelVersion]) -> Option<(&str, &str)> {
    let current = versions.first()?;
    let reference = versions.get(1).unwrap_or(current);
    Some((reference.version_id.as_str(), current.version_id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str) -> ModelVersion {
        ModelVersion {
            version_id: id.to_string(),
            date: "2024-06-01".to_string(),
            description: None,
        }
    }

    fn feature(normalized_emd: Option<f64>, drift_detected: bool) -> DriftFeatureResult {
        DriftFeatureResult {
            feature: "mileage".to_string(),
            p_value: 0.0,
            emd_score: 1.5,
            normalized_emd,
            drift_detected,
            chart_data: vec![],
        }
    }

    #[test]
    fn default_comparison_uses_previous_and_newest() {
        let versions = vec![version("v3"), version("v2"), version("v1")];
        assert_eq!(default_comparison(&versions), Some(("v2", "v3")));
        assert_eq!(default_comparison(&versions[..1]), Some(("v3", "v3")));
        assert_eq!(default_comparison(&[]), None);
    }

    #[test]
    fn needle_position_clamps_and_falls_back() {
        assert_eq!(feature(Some(0.25), false).needle_position(), 50.0);
        assert_eq!(feature(Some(3.0), true).needle_position(), 98.0);
        assert_eq!(feature(None, true).needle_position(), 85.0);
        assert_eq!(feature(None, false).needle_position(), 15.0);
    }

    #[test]
    fn p_value_label_formats_zero_specially() {
        let mut item = feature(None, true);
        assert_eq!(item.p_value_label(), "< 0.001");
        assert!(item.is_significant());
        item.p_value = 0.123456;
        assert_eq!(item.p_value_label(), "0.12346");
        assert!(!item.is_significant());
    }

    #[test]
    fn drift_response_parses_chart_bins() {
        let json = r#"{"results": [{
            "feature": "year",
            "p_value": 0.2,
            "emd_score": 0.4,
            "drift_detected": false,
            "chart_data": [{"bin": 2015, "ref_density": 0.1, "curr_density": 0.2}]
        }]}"#;
        let response: DriftResponse = serde_json::from_str(json).expect("parse drift");
        assert_eq!(response.results[0].chart_data[0].bin, serde_json::json!(2015));
        assert_eq!(response.results[0].normalized_emd, None);
    }
}
