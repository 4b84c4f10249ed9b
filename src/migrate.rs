//! Load-time migration of the favorites collection.
//!
//! Early favorites stored `ingredients` as plain name strings. Each stored
//! entry is classified once, here, and handed on in the current shape.

use serde::{Deserialize, Deserializer};

use crate::store::StoreError;
use crate::types::{Ingredient, Prescription, RelatedPrescription};

/// Origin written into ingredients converted from the legacy shape
pub const LEGACY_ORIGIN: &str = "Legacy record";

/// Buying tips written into ingredients converted from the legacy shape
pub const LEGACY_BUYING_TIPS: &str = "No buying guide";

/// Stored representation of the favorites collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteShape {
    /// `ingredients` holds name strings
    V1Legacy,
    /// `ingredients` holds full records
    V2Current,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredIngredient {
    Record(Ingredient),
    Name(String),
}

impl StoredIngredient {
    fn into_current(self) -> Ingredient {
        match self {
            StoredIngredient::Record(ingredient) => ingredient,
            StoredIngredient::Name(name) => Ingredient {
                name,
                dosage: String::new(),
                origin: LEGACY_ORIGIN.to_string(),
                buying_tips: LEGACY_BUYING_TIPS.to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPrescription {
    prescription_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    ingredients: Vec<StoredIngredient>,
    #[serde(default)]
    source_chapter: String,
    #[serde(default)]
    original_text: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    usage_method: String,
    #[serde(default)]
    precautions: String,
    #[serde(default)]
    pharmacology: String,
    #[serde(default)]
    matched_symptoms: String,
    #[serde(default)]
    related_prescriptions: Option<Vec<RelatedPrescription>>,
}

/// `"ingredients": null` loads as an empty list
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<StoredIngredient>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<StoredIngredient>>::deserialize(deserializer)?.unwrap_or_default())
}

impl StoredPrescription {
    fn shape(&self) -> FavoriteShape {
        if self
            .ingredients
            .iter()
            .any(|i| matches!(i, StoredIngredient::Name(_)))
        {
            FavoriteShape::V1Legacy
        } else {
            FavoriteShape::V2Current
        }
    }

    fn into_current(self) -> Prescription {
        Prescription {
            prescription_name: self.prescription_name,
            ingredients: self
                .ingredients
                .into_iter()
                .map(StoredIngredient::into_current)
                .collect(),
            source_chapter: self.source_chapter,
            original_text: self.original_text,
            translation: self.translation,
            usage_method: self.usage_method,
            precautions: self.precautions,
            pharmacology: self.pharmacology,
            matched_symptoms: self.matched_symptoms,
            related_prescriptions: self.related_prescriptions,
        }
    }
}

/// Outcome counters of one migration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
}

/// Parse a stored favorites value, upgrading legacy entries.
///
/// A value that is not a JSON array is an error. Individual entries that
/// cannot be read are dropped and counted in `skipped`.
pub fn migrate_favorites(raw: &str) -> Result<(Vec<Prescription>, MigrationReport), StoreError> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| StoreError::Deserialization(e.to_string()))?;

    let mut report = MigrationReport::default();
    let mut favorites = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<StoredPrescription>(entry) {
            Ok(stored) => {
                if stored.shape() == FavoriteShape::V1Legacy {
                    report.migrated += 1;
                }
                favorites.push(stored.into_current());
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable favorite");
                report.skipped += 1;
            }
        }
    }

    Ok((favorites, report))
}
