use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use folio_shared::{
    car_api::{CarService, CarTransport},
    dashboard_data::heatmap_scale_max,
    options::LoadState,
    predict_form::{AnalysisStatus, DriftComparison},
    vocabulary, DashboardFilters, PredictionInput,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::to_json;

pub async fn dashboard<T: CarTransport>(
    service: &CarService<T>,
    filters: &DashboardFilters,
) -> Result<Value> {
    let data = service.get_dashboard_data(filters).await?;
    let heatmap = data.damage_heatmap();
    let applied: BTreeMap<&str, String> = filters.query_pairs().into_iter().collect();
    Ok(json!({
        "filters": applied,
        "brandAverages": to_json(&data.brand_averages())?,
        "damageHeatmap": {
            "scaleMax": heatmap_scale_max(&heatmap),
            "cells": to_json(&heatmap)?,
        },
        "data": to_json(&data)?,
    }))
}

pub async fn options<T: CarTransport>(
    service: &CarService<T>,
    brand: Option<&str>,
    series: Option<&str>,
) -> Result<Value> {
    match (brand, series) {
        (None, None) => Ok(json!({ "brands": service.get_brands().await? })),
        (Some(brand), None) => Ok(json!({ "series": service.get_series_by_brand(brand).await? })),
        (Some(brand), Some(series)) => Ok(json!({
            "models": service.get_models_by_series(brand, series).await?,
        })),
        (None, Some(_)) => bail!("--series requires --brand"),
    }
}

pub async fn versions<T: CarTransport>(service: &CarService<T>) -> Result<Value> {
    to_json(&service.get_versions().await?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DriftRow<'a> {
    feature: &'a str,
    p_value: String,
    significant: bool,
    emd_score: f64,
    drift_detected: bool,
    needle_position: f64,
}

pub async fn drift<T: CarTransport>(
    service: &CarService<T>,
    reference: Option<&str>,
    current: Option<&str>,
) -> Result<Value> {
    let mut comparison = DriftComparison::default();
    comparison.load_versions(service).await;
    if let LoadState::Failed(message) = comparison.versions_state() {
        bail!("{message}");
    }
    if let Some(reference) = reference {
        comparison.set_reference(reference);
    }
    if let Some(current) = current {
        comparison.set_current(current);
    }

    if let AnalysisStatus::Failed(message) = comparison.analyze(service).await {
        bail!("{message}");
    }

    let rows: Vec<DriftRow<'_>> = comparison
        .results()
        .iter()
        .map(|result| DriftRow {
            feature: &result.feature,
            p_value: result.p_value_label(),
            significant: result.is_significant(),
            emd_score: result.emd_score,
            drift_detected: result.drift_detected,
            needle_position: result.needle_position(),
        })
        .collect();
    Ok(json!({
        "reference": comparison.reference(),
        "current": comparison.current(),
        "results": to_json(&rows)?,
    }))
}

pub async fn predict<T: CarTransport>(service: &CarService<T>, path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input: PredictionInput = serde_json::from_str(&raw)
        .with_context(|| format!("invalid prediction input in {}", path.display()))?;

    for (field, value) in vocabulary::unmapped_fields(&input) {
        tracing::warn!(
            field,
            value = %value,
            "value has no service vocabulary entry, sending as-is"
        );
    }

    let result = service.predict_price(&input).await?;
    to_json(&result)
}

pub async fn shap<T: CarTransport>(
    service: &CarService<T>,
    version: Option<&str>,
    out: &Path,
) -> Result<Value> {
    let version = match version {
        Some(version) => version.to_string(),
        None => service
            .get_versions()
            .await?
            .into_iter()
            .next()
            .map(|version| version.version_id)
            .ok_or_else(|| anyhow!("no model versions available"))?,
    };

    let image = service.fetch_shap_image(&version).await?;
    fs::write(out, &image.bytes)
        .with_context(|| format!("failed to write image to {}", out.display()))?;

    Ok(json!({
        "version": version,
        "url": service.shap_image_url(&version),
        "contentType": image.content_type,
        "bytes": image.bytes.len(),
        "output": out.display().to_string(),
    }))
}
