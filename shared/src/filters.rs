use serde::{Deserialize, Serialize};

/// Placeholder meaning "no filter" as sent by English UI controls.
pub const SENTINEL_ALL: &str = "All";
/// Placeholder meaning "no filter" as used by the Turkish dropdowns.
pub const SENTINEL_ALL_TR: &str = "Tümü";

/// True for values that must never reach the service as a literal filter.
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == SENTINEL_ALL || value == SENTINEL_ALL_TR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Brand,
    Series,
    MinPrice,
    MaxPrice,
    MinYear,
    MaxYear,
    MinKm,
    MaxKm,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::Brand,
        FilterField::Series,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::MinYear,
        FilterField::MaxYear,
        FilterField::MinKm,
        FilterField::MaxKm,
    ];

    /// Query parameter name understood by `/api/dashboard-data`.
    pub fn query_key(self) -> &'static str {
        match self {
            FilterField::Brand => "brand",
            FilterField::Series => "series",
            FilterField::MinPrice => "min_price",
            FilterField::MaxPrice => "max_price",
            FilterField::MinYear => "min_year",
            FilterField::MaxYear => "max_year",
            FilterField::MinKm => "min_km",
            FilterField::MaxKm => "max_km",
        }
    }

    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.query_key() == key)
    }
}

/// Flat dashboard filter record. Every field is an optional string exactly as
/// typed by the user; numeric bounds are not parsed client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_km: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_km: Option<String>,
}

impl DashboardFilters {
    /// Filters the dashboard starts with: both dropdowns on the sentinel,
    /// all ranges empty.
    pub fn initial() -> Self {
        Self {
            brand: Some(SENTINEL_ALL_TR.to_string()),
            series: Some(SENTINEL_ALL_TR.to_string()),
            min_price: Some(String::new()),
            max_price: Some(String::new()),
            min_year: Some(String::new()),
            max_year: Some(String::new()),
            min_km: Some(String::new()),
            max_km: Some(String::new()),
        }
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn clear(&mut self, field: FilterField) {
        *self.slot_mut(field) = None;
    }

    /// Brand filter with sentinels folded into `None`.
    pub fn effective_brand(&self) -> Option<&str> {
        self.brand.as_deref().filter(|brand| !is_sentinel(brand))
    }

    /// Fields that survive sentinel stripping, in declaration order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| {
                self.get(field)
                    .filter(|value| !is_sentinel(value))
                    .map(|value| (field.query_key(), value.trim().to_string()))
            })
            .collect()
    }

    fn slot(&self, field: FilterField) -> &Option<String> {
        match field {
            FilterField::Brand => &self.brand,
            FilterField::Series => &self.series,
            FilterField::MinPrice => &self.min_price,
            FilterField::MaxPrice => &self.max_price,
            FilterField::MinYear => &self.min_year,
            FilterField::MaxYear => &self.max_year,
            FilterField::MinKm => &self.min_km,
            FilterField::MaxKm => &self.max_km,
        }
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::Brand => &mut self.brand,
            FilterField::Series => &mut self.series,
            FilterField::MinPrice => &mut self.min_price,
            FilterField::MaxPrice => &mut self.max_price,
            FilterField::MinYear => &mut self.min_year,
            FilterField::MaxYear => &mut self.max_year,
            FilterField::MinKm => &mut self.min_km,
            FilterField::MaxKm => &mut self.max_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_drop_sentinels_and_empty_values() {
        let filters = DashboardFilters {
            brand: Some("Tümü".to_string()),
            min_price: Some("1000".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.query_pairs(), vec![("min_price", "1000".to_string())]);

        let mut initial = DashboardFilters::initial();
        assert!(initial.query_pairs().is_empty());

        initial.set(FilterField::Series, "All");
        initial.set(FilterField::MaxKm, "  ");
        assert!(initial.query_pairs().is_empty());
    }

    #[test]
    fn query_pairs_keep_declaration_order() {
        let mut filters = DashboardFilters::default();
        filters.set(FilterField::MaxKm, "90000");
        filters.set(FilterField::Brand, "Toyota");
        filters.set(FilterField::MinYear, "2018");

        let keys: Vec<_> = filters.query_pairs().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["brand", "min_year", "max_km"]);
    }

    #[test]
    fn effective_brand_folds_sentinels() {
        let mut filters = DashboardFilters::initial();
        assert_eq!(filters.effective_brand(), None);
        filters.set(FilterField::Brand, "BMW");
        assert_eq!(filters.effective_brand(), Some("BMW"));
        filters.clear(FilterField::Brand);
        assert_eq!(filters.effective_brand(), None);
    }

    #[test]
    fn query_keys_round_trip() {
        for field in FilterField::ALL {
            assert_eq!(FilterField::from_query_key(field.query_key()), Some(field));
        }
        assert_eq!(FilterField::from_query_key("fuel"), None);
    }
}
