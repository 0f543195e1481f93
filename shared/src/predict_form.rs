//! State of the price prediction form and the drift comparison page.

use crate::{
    car_api::{CarService, CarTransport},
    drift::{default_comparison, DriftFeatureResult, ModelVersion},
    options::{LoadState, OptionLevel},
    prediction::{PredictionInput, PredictionResult},
};

pub const PREDICTION_FAILED: &str = "Prediction failed. Check service connection.";
pub const NO_VERSIONS: &str = "No model versions found in the system.";
pub const SAME_VERSION: &str = "You must select different versions for comparison.";
pub const VERSIONS_FAILED: &str =
    "Failed to fetch model versions from server. Backend service might be down.";
pub const ANALYSIS_FAILED: &str =
    "An error occurred during analysis. Datasets might be missing or server is not responding.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictStatus {
    #[default]
    Idle,
    Predicting,
    Done(PredictionResult),
    Failed(String),
}

/// Prediction form: vehicle attributes plus the brand, series and model
/// dropdowns, each reloaded when its parent changes.
#[derive(Debug, Clone, Default)]
pub struct PredictForm {
    input: PredictionInput,
    brands: OptionLevel,
    series: OptionLevel,
    models: OptionLevel,
    manual_model: bool,
    status: PredictStatus,
}

impl PredictForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &PredictionInput {
        &self.input
    }

    /// Non-cascading fields (year, mileage, damage counts, ...).
    pub fn input_mut(&mut self) -> &mut PredictionInput {
        &mut self.input
    }

    pub fn brands(&self) -> &OptionLevel {
        &self.brands
    }

    pub fn series(&self) -> &OptionLevel {
        &self.series
    }

    pub fn models(&self) -> &OptionLevel {
        &self.models
    }

    pub fn status(&self) -> &PredictStatus {
        &self.status
    }

    pub fn is_manual_model(&self) -> bool {
        self.manual_model
    }

    pub async fn load_brands<T: CarTransport>(&mut self, service: &CarService<T>) {
        let ticket = self.brands.begin("");
        let result = service.get_brands().await.map_err(|err| err.to_string());
        self.brands.finish(ticket, result);
    }

    /// New brand: series and model are cleared, series reloaded.
    pub async fn select_brand<T: CarTransport>(&mut self, service: &CarService<T>, brand: &str) {
        self.input.brand = brand.to_string();
        self.input.series.clear();
        self.input.model.clear();
        self.models.reset();

        if brand.trim().is_empty() {
            self.series.reset();
            return;
        }
        let ticket = self.series.begin(brand);
        let result = service
            .get_series_by_brand(brand)
            .await
            .map_err(|err| err.to_string());
        self.series.finish(ticket, result);
    }

    /// New series: model is cleared, models reloaded.
    pub async fn select_series<T: CarTransport>(&mut self, service: &CarService<T>, series: &str) {
        self.input.series = series.to_string();
        self.input.model.clear();

        if series.trim().is_empty() {
            self.models.reset();
            return;
        }
        let ticket = self.models.begin(series);
        let result = service
            .get_models_by_series(&self.input.brand, series)
            .await
            .map_err(|err| err.to_string());
        self.models.finish(ticket, result);
    }

    pub fn set_model(&mut self, model: &str) {
        self.input.model = model.to_string();
    }

    /// Switch between picking a listed model and typing one in.
    pub fn set_manual_model(&mut self, manual: bool) {
        if self.manual_model != manual {
            self.manual_model = manual;
            self.input.model.clear();
        }
    }

    pub async fn submit<T: CarTransport>(&mut self, service: &CarService<T>) -> &PredictStatus {
        if let Err(err) = self.input.validate() {
            self.status = PredictStatus::Failed(err.to_string());
            return &self.status;
        }

        self.status = PredictStatus::Predicting;
        self.status = match service.predict_price(&self.input).await {
            Ok(result) => PredictStatus::Done(result),
            Err(err) => {
                tracing::error!(
                    brand = %self.input.brand,
                    model = %self.input.model,
                    "prediction failed: {err}"
                );
                PredictStatus::Failed(PREDICTION_FAILED.to_string())
            },
        };
        &self.status
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Done,
    Failed(String),
}

/// Two-version drift comparison.
#[derive(Debug, Clone, Default)]
pub struct DriftComparison {
    versions: Vec<ModelVersion>,
    versions_state: LoadState,
    reference: Option<String>,
    current: Option<String>,
    results: Vec<DriftFeatureResult>,
    status: AnalysisStatus,
}

impl DriftComparison {
    pub fn versions(&self) -> &[ModelVersion] {
        &self.versions
    }

    pub fn versions_state(&self) -> &LoadState {
        &self.versions_state
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn results(&self) -> &[DriftFeatureResult] {
        &self.results
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    /// Message for the empty state once versions are loaded.
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.versions_state == LoadState::Loaded && self.versions.is_empty())
            .then_some(NO_VERSIONS)
    }

    pub async fn load_versions<T: CarTransport>(&mut self, service: &CarService<T>) {
        self.versions_state = LoadState::Loading;
        match service.get_versions().await {
            Ok(versions) => self.apply_versions(versions),
            Err(err) => {
                tracing::warn!("version list failed: {err}");
                self.versions_state = LoadState::Failed(VERSIONS_FAILED.to_string());
            },
        }
    }

    pub fn apply_versions(&mut self, versions: Vec<ModelVersion>) {
        let defaults = default_comparison(&versions)
            .map(|(reference, current)| (reference.to_string(), current.to_string()));
        self.reference = defaults.as_ref().map(|(reference, _)| reference.clone());
        self.current = defaults.map(|(_, current)| current);
        self.versions = versions;
        self.versions_state = LoadState::Loaded;
    }

    pub fn set_reference(&mut self, version_id: &str) {
        self.reference = Some(version_id.to_string());
    }

    pub fn set_current(&mut self, version_id: &str) {
        self.current = Some(version_id.to_string());
    }

    /// The pair to compare, or the message explaining why it cannot be.
    pub fn selection(&self) -> Result<(&str, &str), &'static str> {
        match (self.reference.as_deref(), self.current.as_deref()) {
            (Some(reference), Some(current)) if reference == current => Err(SAME_VERSION),
            (Some(reference), Some(current)) => Ok((reference, current)),
            _ => Err(NO_VERSIONS),
        }
    }

    pub async fn analyze<T: CarTransport>(&mut self, service: &CarService<T>) -> &AnalysisStatus {
        let selection = self
            .selection()
            .map(|(reference, current)| (reference.to_string(), current.to_string()));
        let (reference, current) = match selection {
            Ok(pair) => pair,
            Err(message) => {
                self.status = AnalysisStatus::Failed(message.to_string());
                return &self.status;
            },
        };

        self.status = AnalysisStatus::Analyzing;
        match service.get_drift_analysis(&reference, &current).await {
            Ok(results) => {
                tracing::info!(
                    %reference,
                    %current,
                    features = results.len(),
                    "drift analysis loaded"
                );
                self.results = results;
                self.status = AnalysisStatus::Done;
            },
            Err(err) => {
                tracing::warn!(%reference, %current, "drift analysis failed: {err}");
                self.results.clear();
                self.status = AnalysisStatus::Failed(ANALYSIS_FAILED.to_string());
            },
        }
        &self.status
    }
}
