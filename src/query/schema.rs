use serde_json::{json, Value};

/// Fields every prescription object must carry
pub const PRESCRIPTION_REQUIRED: &[&str] = &[
    "prescriptionName",
    "ingredients",
    "sourceChapter",
    "originalText",
    "translation",
    "usageMethod",
    "precautions",
    "pharmacology",
    "matchedSymptoms",
];

/// Fields the top-level consultation object must carry
pub const CONSULTATION_REQUIRED: &[&str] =
    &["symptomAnalysis", "prescriptions", "comparison", "recommendation"];

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn ingredient_schema() -> Value {
    // Inner fields are optional; the parser defaults them to "".
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string("Medicine name (e.g. 桂枝)"),
            "dosage": string("Dosage (e.g. 9g)"),
            "origin": string("Recommended Dao Di origin (e.g. 广东新会 for Chenpi)"),
            "buyingTips": string("How to identify high quality material (e.g. 油性大、气味浓者佳)"),
        }
    })
}

fn prescription_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "prescriptionName": string("Name of the prescription"),
            "ingredients": {
                "type": "ARRAY",
                "items": ingredient_schema(),
                "description": "Ingredients with dosages, origins and selection tips",
            },
            "sourceChapter": string("Book and chapter (e.g. 《伤寒论》·辨太阳病脉证并治)"),
            "originalText": string("Original classical text"),
            "translation": string("Modern colloquial translation"),
            "usageMethod": string("Decoction and usage instructions"),
            "precautions": string("Contraindications and warnings"),
            "pharmacology": string("Modern pharmacology or TCM mechanism"),
            "matchedSymptoms": string("Why this prescription fits the symptoms"),
            "relatedPrescriptions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "reason": { "type": "STRING" },
                    }
                },
                "description": "1-2 similar prescriptions (optional)",
            },
        },
        "required": PRESCRIPTION_REQUIRED,
    })
}

/// Response schema sent with every consultation request
pub fn consultation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "symptomAnalysis": string("TCM analysis of the symptoms (pathology and mechanism)"),
            "prescriptions": {
                "type": "ARRAY",
                "items": prescription_schema(),
                "description": "2-3 distinct prescriptions from different reference works",
            },
            "comparison": string("Comparison of the prescriptions: focus, strength, suitable constitutions"),
            "recommendation": string("Which prescription suits this user best and why"),
        },
        "required": CONSULTATION_REQUIRED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_required_fields() {
        let schema = consultation_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(required, CONSULTATION_REQUIRED);
    }

    #[test]
    fn test_inner_fields_not_required() {
        let schema = consultation_schema();
        let prescription = &schema["properties"]["prescriptions"]["items"];

        assert_eq!(prescription["required"].as_array().unwrap().len(), 9);
        assert!(prescription["required"]
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f != "relatedPrescriptions"));
        assert!(prescription["properties"]["ingredients"]["items"]
            .get("required")
            .is_none());
    }
}
