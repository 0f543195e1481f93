use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate figures shown in the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub avg_price: f64,
}

/// Damage frequency for one named body panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagePoint {
    pub part: String,
    pub value: f64,
}

/// Payload of `GET /api/dashboard-data`.
///
/// Fields the client reads are typed; chart series that only the renderer
/// interprets are kept as raw JSON, and so is any key this client does not
/// know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub kpi: Kpi,
    /// Brand -> listing prices.
    #[serde(default)]
    pub boxplot_data: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub damage_chart_data: Vec<DamagePoint>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub series_list: Vec<String>,
    #[serde(default)]
    pub scatter_data: serde_json::Value,
    #[serde(default)]
    pub line_chart_data: serde_json::Value,
    #[serde(default)]
    pub donut_chart_data: serde_json::Value,
    #[serde(default)]
    pub radar_chart_data: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandAverage {
    pub brand: String,
    pub avg: f64,
}

/// One cell of the top-view damage heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// Column: 0 left, 1 centre, 2 right.
    pub x: u8,
    /// Row: 0 rear .. 4 front.
    pub y: u8,
    pub value: f64,
    pub part: String,
}

pub const HEATMAP_COLUMNS: [&str; 3] = ["Sol", "Orta", "Sağ"];
pub const HEATMAP_ROWS: [&str; 5] = ["Arka", "Arka-Yan", "Orta", "Ön-Yan", "Ön"];

const PART_GRID: &[(&str, (u8, u8))] = &[
    ("Kaput", (1, 4)),
    ("Sol Ön Çamurluk", (0, 4)),
    ("Sağ Ön Çamurluk", (2, 4)),
    ("Sol Ön Kapı", (0, 3)),
    ("Sağ Ön Kapı", (2, 3)),
    ("Tavan", (1, 2)),
    ("Sol Arka Kapı", (0, 2)),
    ("Sağ Arka Kapı", (2, 2)),
    ("Sol Arka Çamurluk", (0, 1)),
    ("Sağ Arka Çamurluk", (2, 1)),
    ("Bagaj", (1, 0)),
];

/// Grid coordinate of a body panel label.
pub fn part_coordinates(part: &str) -> Option<(u8, u8)> {
    PART_GRID
        .iter()
        .find(|(name, _)| *name == part)
        .map(|(_, coords)| *coords)
}

impl DashboardData {
    /// Average listing price per brand, most expensive first. Brands without
    /// prices average to zero.
    pub fn brand_averages(&self) -> Vec<BrandAverage> {
        let mut stats: Vec<BrandAverage> = self
            .boxplot_data
            .iter()
            .map(|(brand, prices)| {
                let avg = if prices.is_empty() {
                    0.0
                } else {
                    prices.iter().sum::<f64>() / prices.len() as f64
                };
                BrandAverage {
                    brand: brand.clone(),
                    avg,
                }
            })
            .collect();
        stats.sort_by(|a, b| b.avg.total_cmp(&a.avg));
        stats
    }

    /// Damage points placed on the 3x5 panel grid. Parts missing from the
    /// grid table are dropped.
    pub fn damage_heatmap(&self) -> Vec<HeatmapCell> {
        self.damage_chart_data
            .iter()
            .filter_map(|point| {
                let (x, y) = part_coordinates(&point.part)?;
                Some(HeatmapCell {
                    x,
                    y,
                    value: point.value,
                    part: point.part.clone(),
                })
            })
            .collect()
    }
}

/// Upper bound of the heatmap colour scale; never below 1.
pub fn heatmap_scale_max(cells: &[HeatmapCell]) -> f64 {
    cells.iter().map(|cell| cell.value).fold(1.0, f64::max)
}

/// Millions with two decimals, as on the KPI cards: `₺1.25M`.
pub fn format_million_try(value: f64) -> String {
    format!("₺{:.2}M", value / 1e6)
}
