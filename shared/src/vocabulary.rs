//! English UI labels to the Turkish enum values the prediction service was
//! trained on.
//!
//! Translation is fail-open: a value without an entry is sent unchanged.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::prediction::{DamageDetails, PredictionInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyCategory {
    Fuel,
    Transmission,
    BodyType,
    Damage,
    Warranty,
    Drivetrain,
}

impl VocabularyCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyCategory::Fuel => "fuel",
            VocabularyCategory::Transmission => "transmission",
            VocabularyCategory::BodyType => "body_type",
            VocabularyCategory::Damage => "damage",
            VocabularyCategory::Warranty => "warranty",
            VocabularyCategory::Drivetrain => "drivetrain",
        }
    }
}

const FUEL: &[(&str, &str)] = &[
    ("Gasoline", "Benzin"),
    ("Diesel", "Dizel"),
    ("LPG", "LPG & Benzin"),
    ("Hybrid", "Benzin & Elektrik"),
];

const TRANSMISSION: &[(&str, &str)] = &[
    ("Automatic", "Otomatik"),
    ("Manual", "Düz"),
    ("Semi-Automatic", "Yarı Otomatik"),
];

const BODY_TYPE: &[(&str, &str)] = &[
    ("Sedan", "Sedan"),
    ("Hatchback", "Hatchback/5"),
    ("Station Wagon", "Station wagon"),
    ("Coupe", "Coupe"),
    ("Cabrio", "Cabrio"),
    ("SUV", "SUV"),
    ("MPV", "MPV"),
];

const DAMAGE: &[(&str, &str)] = &[
    ("Original", "Orjinal"),
    ("Painted", "Boyalı"),
    ("Locally Painted", "Lokal Boyalı"),
    ("Changed", "Değişen"),
];

const WARRANTY: &[(&str, &str)] = &[
    ("No Warranty", "Garantisi Yok"),
    ("Warranty Continues", "Garantisi Var"),
];

const DRIVETRAIN: &[(&str, &str)] = &[
    ("RWD", "Arkadan İtiş"),
    ("FWD", "Önden Çekiş"),
    ("4WD", "4WD (Sürekli)"),
    ("AWD", "AWD (Elektronik)"),
];

static TABLES: Lazy<HashMap<VocabularyCategory, HashMap<&'static str, &'static str>>> =
    Lazy::new(|| {
        [
            (VocabularyCategory::Fuel, FUEL),
            (VocabularyCategory::Transmission, TRANSMISSION),
            (VocabularyCategory::BodyType, BODY_TYPE),
            (VocabularyCategory::Damage, DAMAGE),
            (VocabularyCategory::Warranty, WARRANTY),
            (VocabularyCategory::Drivetrain, DRIVETRAIN),
        ]
        .into_iter()
        .map(|(category, pairs)| (category, pairs.iter().copied().collect()))
        .collect()
    });

/// Mapped backend value, or `None` when the table has no entry.
pub fn lookup(category: VocabularyCategory, value: &str) -> Option<&'static str> {
    TABLES
        .get(&category)
        .and_then(|table| table.get(value))
        .copied()
}

/// Mapped backend value, falling back to the input unchanged.
pub fn translate(category: VocabularyCategory, value: &str) -> &str {
    match lookup(category, value) {
        Some(mapped) => mapped,
        None => {
            tracing::debug!(
                category = category.as_str(),
                value,
                "no vocabulary entry, passing through"
            );
            value
        },
    }
}

/// UI labels accepted for a category, in table order.
pub fn ui_values(category: VocabularyCategory) -> Vec<&'static str> {
    let pairs = match category {
        VocabularyCategory::Fuel => FUEL,
        VocabularyCategory::Transmission => TRANSMISSION,
        VocabularyCategory::BodyType => BODY_TYPE,
        VocabularyCategory::Damage => DAMAGE,
        VocabularyCategory::Warranty => WARRANTY,
        VocabularyCategory::Drivetrain => DRIVETRAIN,
    };
    pairs.iter().map(|(ui, _)| *ui).collect()
}

/// Copy of `input` with every enum-valued field translated.
pub fn localize_input(input: &PredictionInput) -> PredictionInput {
    use VocabularyCategory::*;

    let damage = &input.damage_details;
    PredictionInput {
        fuel: translate(Fuel, &input.fuel).to_string(),
        transmission: translate(Transmission, &input.transmission).to_string(),
        body_type: translate(BodyType, &input.body_type).to_string(),
        gb_warranty_status: translate(Warranty, &input.gb_warranty_status).to_string(),
        kb_drivetrain: translate(Drivetrain, &input.kb_drivetrain).to_string(),
        damage_details: DamageDetails {
            roof_status: translate(Damage, &damage.roof_status).to_string(),
            hood_status: translate(Damage, &damage.hood_status).to_string(),
            trunk_status: translate(Damage, &damage.trunk_status).to_string(),
            ..damage.clone()
        },
        ..input.clone()
    }
}

/// `(field, value)` pairs that `localize_input` would pass through untranslated.
pub fn unmapped_fields(input: &PredictionInput) -> Vec<(&'static str, String)> {
    use VocabularyCategory::*;

    let damage = &input.damage_details;
    [
        ("fuel", Fuel, &input.fuel),
        ("transmission", Transmission, &input.transmission),
        ("body_type", BodyType, &input.body_type),
        ("gb_warranty_status", Warranty, &input.gb_warranty_status),
        ("kb_drivetrain", Drivetrain, &input.kb_drivetrain),
        ("damage_details.roof_status", Damage, &damage.roof_status),
        ("damage_details.hood_status", Damage, &damage.hood_status),
        ("damage_details.trunk_status", Damage, &damage.trunk_status),
    ]
    .into_iter()
    .filter(|(_, category, value)| lookup(*category, value).is_none())
    .map(|(field, _, value)| (field, value.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_maps_known_values() {
        assert_eq!(translate(VocabularyCategory::Fuel, "Diesel"), "Dizel");
        assert_eq!(translate(VocabularyCategory::Transmission, "Manual"), "Düz");
        assert_eq!(translate(VocabularyCategory::Drivetrain, "AWD"), "AWD (Elektronik)");
        assert_eq!(translate(VocabularyCategory::Damage, "Locally Painted"), "Lokal Boyalı");
    }

    #[test]
    fn translate_passes_unknown_values_through() {
        assert_eq!(translate(VocabularyCategory::Fuel, "Electric"), "Electric");
        assert_eq!(lookup(VocabularyCategory::Fuel, "Electric"), None);
        // Tables are scoped per category.
        assert_eq!(translate(VocabularyCategory::Warranty, "Diesel"), "Diesel");
    }

    #[test]
    fn localize_input_translates_every_enum_field() {
        let mut input = PredictionInput::example("BMW", "3 Serisi", "320i");
        input.fuel = "Diesel".to_string();
        input.damage_details.hood_status = "Painted".to_string();

        let localized = localize_input(&input);
        assert_eq!(localized.fuel, "Dizel");
        assert_eq!(localized.transmission, "Otomatik");
        assert_eq!(localized.body_type, "Sedan");
        assert_eq!(localized.gb_warranty_status, "Garantisi Yok");
        assert_eq!(localized.kb_drivetrain, "Arkadan İtiş");
        assert_eq!(localized.damage_details.roof_status, "Orjinal");
        assert_eq!(localized.damage_details.hood_status, "Boyalı");
        assert_eq!(localized.brand, "BMW");
        assert_eq!(localized.engine_cc_val, input.engine_cc_val);
    }

    #[test]
    fn unmapped_fields_reports_passthrough_values() {
        let mut input = PredictionInput::example("BMW", "3 Serisi", "320i");
        assert!(unmapped_fields(&input).is_empty());

        input.fuel = "Electric".to_string();
        input.damage_details.trunk_status = "Dented".to_string();
        assert_eq!(
            unmapped_fields(&input),
            vec![
                ("fuel", "Electric".to_string()),
                ("damage_details.trunk_status", "Dented".to_string()),
            ]
        );
    }

    #[test]
    fn ui_values_follow_table_order() {
        assert_eq!(
            ui_values(VocabularyCategory::Warranty),
            vec!["No Warranty", "Warranty Continues"]
        );
    }
}
