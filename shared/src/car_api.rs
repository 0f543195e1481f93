//! Client for the car price prediction service.
//!
//! [`CarTransport`] is the raw JSON seam (HTTP in production, in-memory in
//! tests); [`CarService`] layers the typed operations on top of it, including
//! the client-side short-circuits and vocabulary translation.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    dashboard_data::DashboardData,
    drift::{DriftFeatureResult, DriftResponse, ModelVersion},
    filters::{is_sentinel, DashboardFilters},
    prediction::{InputError, PredictionInput, PredictionResult},
    vocabulary,
};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Failures of a car service call. `Display` is short enough to show to a
/// user as-is.
#[derive(Debug, Error)]
pub enum CarApiError {
    #[error("{0}")]
    Validation(#[from] InputError),
    #[error("No active model version found.")]
    NoModelVersion,
    #[error("Could not connect to the server ({endpoint}).")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Server returned HTTP {status} for {endpoint}.")]
    Status { endpoint: String, status: u16 },
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl CarApiError {
    /// True when the request never left the client.
    pub fn is_client_side(&self) -> bool {
        matches!(self, CarApiError::Validation(_))
    }
}

/// Image bytes served by `GET /api/shap/{version}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Raw request primitives against the service.
#[async_trait]
pub trait CarTransport: Send + Sync {
    /// Public URL for `path`, used for resources consumed directly (images).
    fn url(&self, path: &str) -> String;

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CarApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CarApiError>;

    async fn get_bytes(&self, path: &str) -> Result<ShapImage, CarApiError>;
}

/// `reqwest` transport. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CarApiError> {
        let response = request.send().await.map_err(|source| CarApiError::Network {
            endpoint: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = path,
                status = status.as_u16(),
                "car service returned an error status"
            );
            return Err(CarApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn read_json(path: &str, response: reqwest::Response) -> Result<Value, CarApiError> {
        response.json().await.map_err(|err| CarApiError::Decode {
            endpoint: path.to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl CarTransport for HttpTransport {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CarApiError> {
        tracing::debug!(endpoint = path, params = query.len(), "GET");
        let request = self.client.get(self.url(path)).query(query);
        let response = self.send(path, request).await?;
        Self::read_json(path, response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CarApiError> {
        tracing::debug!(endpoint = path, "POST");
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(path, request).await?;
        Self::read_json(path, response).await
    }

    async fn get_bytes(&self, path: &str) -> Result<ShapImage, CarApiError> {
        tracing::debug!(endpoint = path, "GET bytes");
        let response = self.send(path, self.client.get(self.url(path))).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|source| CarApiError::Network {
            endpoint: path.to_string(),
            source,
        })?;
        Ok(ShapImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct OptionsResponse {
    #[serde(default)]
    brands: Vec<String>,
    #[serde(default)]
    series: Vec<String>,
    #[serde(default)]
    models: Vec<String>,
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, CarApiError> {
    serde_json::from_value(value).map_err(|err| CarApiError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// One method per service endpoint.
#[derive(Debug, Clone)]
pub struct CarService<T = HttpTransport> {
    transport: T,
}

impl<T: CarTransport> CarService<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Aggregate dashboard payload. Empty and sentinel filters are not sent.
    pub async fn get_dashboard_data(
        &self,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, CarApiError> {
        const PATH: &str = "/api/dashboard-data";
        let value = self.transport.get_json(PATH, &filters.query_pairs()).await?;
        decode(PATH, value)
    }

    pub async fn get_brands(&self) -> Result<Vec<String>, CarApiError> {
        Ok(self.options(&[]).await?.brands)
    }

    /// Series of `brand`; empty without a request when no brand is chosen.
    pub async fn get_series_by_brand(&self, brand: &str) -> Result<Vec<String>, CarApiError> {
        if is_sentinel(brand) {
            return Ok(Vec::new());
        }
        Ok(self.options(&[("brand", brand.to_string())]).await?.series)
    }

    /// Models of `series`; empty without a request unless both parents are chosen.
    pub async fn get_models_by_series(
        &self,
        brand: &str,
        series: &str,
    ) -> Result<Vec<String>, CarApiError> {
        if is_sentinel(brand) || is_sentinel(series) {
            return Ok(Vec::new());
        }
        let query = [("brand", brand.to_string()), ("series", series.to_string())];
        Ok(self.options(&query).await?.models)
    }

    /// Model versions, newest first.
    pub async fn get_versions(&self) -> Result<Vec<ModelVersion>, CarApiError> {
        const PATH: &str = "/versions";
        let value = self.transport.get_json(PATH, &[]).await?;
        decode(PATH, value)
    }

    pub async fn get_drift_analysis(
        &self,
        reference_version: &str,
        current_version: &str,
    ) -> Result<Vec<DriftFeatureResult>, CarApiError> {
        let path = format!("/drift/{}/{}", segment(reference_version), segment(current_version));
        let value = self.transport.get_json(&path, &[]).await?;
        let response: DriftResponse = decode(&path, value)?;
        Ok(response.results)
    }

    /// Validate, resolve the newest model version, translate the input to
    /// the service vocabulary and request an estimate from that version.
    pub async fn predict_price(
        &self,
        input: &PredictionInput,
    ) -> Result<PredictionResult, CarApiError> {
        input.validate()?;

        let versions = self.get_versions().await?;
        let latest = versions.first().ok_or(CarApiError::NoModelVersion)?;

        let payload = vocabulary::localize_input(input);
        let body = serde_json::to_value(&payload).map_err(|err| CarApiError::Decode {
            endpoint: "/predict".to_string(),
            message: err.to_string(),
        })?;

        let path = format!("/predict/{}", segment(&latest.version_id));
        tracing::info!(
            version = %latest.version_id,
            brand = %input.brand,
            "requesting price estimate"
        );
        let value = self.transport.post_json(&path, &body).await?;
        decode(&path, value)
    }

    /// Address of the feature-importance image for `version_id`.
    pub fn shap_image_url(&self, version_id: &str) -> String {
        self.transport
            .url(&format!("/api/shap/{}", segment(version_id)))
    }

    pub async fn fetch_shap_image(&self, version_id: &str) -> Result<ShapImage, CarApiError> {
        self.transport
            .get_bytes(&format!("/api/shap/{}", segment(version_id)))
            .await
    }

    async fn options(&self, query: &[(&str, String)]) -> Result<OptionsResponse, CarApiError> {
        const PATH: &str = "/api/options";
        let value = self.transport.get_json(PATH, query).await?;
        decode(PATH, value)
    }
}
