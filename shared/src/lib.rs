//! Shared building blocks for the folio workspace.
//!
//! Model types (posts, projects, dashboard payloads, predictions, drift
//! results) compile for every target, including `wasm32`. Filesystem access
//! and the HTTP client for the car price service are native-only.

pub mod dashboard_data;
pub mod drift;
pub mod filters;
pub mod post;
pub mod prediction;
pub mod project;
pub mod vocabulary;

#[cfg(not(target_arch = "wasm32"))]
pub mod car_api;
#[cfg(not(target_arch = "wasm32"))]
pub mod content;
#[cfg(not(target_arch = "wasm32"))]
pub mod dashboard;
#[cfg(not(target_arch = "wasm32"))]
pub mod options;
#[cfg(not(target_arch = "wasm32"))]
pub mod predict_form;

pub use dashboard_data::{DamagePoint, DashboardData, HeatmapCell, Kpi};
pub use drift::{DensityBin, DriftFeatureResult, ModelVersion};
pub use filters::{is_sentinel, DashboardFilters, FilterField, SENTINEL_ALL, SENTINEL_ALL_TR};
pub use post::{BackLink, Post, PostMeta};
pub use prediction::{DamageDetails, PredictionInput, PredictionResult, PriceRange};
pub use project::{FeatureBadge, NavLink, ProjectInfo};
