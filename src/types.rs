use serde::{Deserialize, Serialize};

/// Display text for an empty origin or buying tip
pub const NO_RECORD: &str = "No record";

/// A single medicinal ingredient of a prescription
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub buying_tips: String,
}

impl Ingredient {
    pub fn origin_or_default(&self) -> &str {
        non_empty_or(&self.origin, NO_RECORD)
    }

    pub fn buying_tips_or_default(&self) -> &str {
        non_empty_or(&self.buying_tips, NO_RECORD)
    }
}

/// A similar prescription mentioned alongside a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelatedPrescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

/// A classical formula with its supporting detail.
///
/// `prescription_name` is the identity key for favorites. Two distinct
/// formulas sharing a name are treated as the same favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub prescription_name: String,
    pub ingredients: Vec<Ingredient>,
    pub source_chapter: String,
    pub original_text: String,
    pub translation: String,
    pub usage_method: String,
    pub precautions: String,
    pub pharmacology: String,
    pub matched_symptoms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_prescriptions: Option<Vec<RelatedPrescription>>,
}

impl Prescription {
    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }

    /// Whether `other` refers to the same favorite
    pub fn same_identity(&self, other: &Prescription) -> bool {
        self.prescription_name == other.prescription_name
    }

    pub fn related(&self) -> &[RelatedPrescription] {
        self.related_prescriptions.as_deref().unwrap_or(&[])
    }
}

/// Outcome of one consultation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResult {
    pub symptom_analysis: String,
    pub prescriptions: Vec<Prescription>,
    pub comparison: String,
    pub recommendation: String,
}

/// A previously submitted query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub query: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn prescription(name: &str) -> Prescription {
        Prescription {
            prescription_name: name.to_string(),
            ingredients: vec![Ingredient {
                name: "桂枝".to_string(),
                dosage: "9g".to_string(),
                origin: "广西".to_string(),
                buying_tips: "色棕红、香气浓者佳".to_string(),
            }],
            source_chapter: "《伤寒论》·辨太阳病脉证并治".to_string(),
            original_text: "太阳中风，阳浮而阴弱".to_string(),
            translation: "受了风，出汗怕风".to_string(),
            usage_method: "水煎服".to_string(),
            precautions: "表实无汗者忌用".to_string(),
            pharmacology: "解肌发表，调和营卫".to_string(),
            matched_symptoms: "汗出恶风".to_string(),
            related_prescriptions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_display_defaults() {
        let ingredient = Ingredient {
            name: "白芍".to_string(),
            dosage: "9g".to_string(),
            origin: String::new(),
            buying_tips: "  ".to_string(),
        };

        assert_eq!(ingredient.origin_or_default(), NO_RECORD);
        assert_eq!(ingredient.buying_tips_or_default(), NO_RECORD);
    }

    #[test]
    fn test_prescription_wire_names() {
        let p = fixtures::prescription("桂枝汤");
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["prescriptionName"], "桂枝汤");
        assert_eq!(json["ingredients"][0]["buyingTips"], "色棕红、香气浓者佳");
        assert!(json.get("relatedPrescriptions").is_none());
    }

    #[test]
    fn test_identity_is_by_name() {
        let a = fixtures::prescription("桂枝汤");
        let mut b = fixtures::prescription("桂枝汤");
        b.usage_method = "different".to_string();

        assert!(a.same_identity(&b));
        assert!(a.has_ingredients());
        assert!(a.related().is_empty());
    }
}
