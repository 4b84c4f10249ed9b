use super::QueryError;
use crate::types::ConsultationResult;

/// Parse the provider's JSON text into a consultation.
///
/// Either every required field is present and well-typed, or the whole
/// response is rejected.
pub fn parse_consultation(response: &str) -> Result<ConsultationResult, QueryError> {
    let json_str = strip_code_fence(response);

    if json_str.is_empty() {
        return Err(QueryError::EmptyResponse);
    }

    serde_json::from_str::<ConsultationResult>(json_str)
        .map_err(|e| QueryError::MalformedResponse(e.to_string()))
}

/// Unwrap a ```json fenced block if the model added one
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);

    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_response() -> String {
        r#"{
  "symptomAnalysis": "风寒表虚，营卫不和",
  "prescriptions": [
    {
      "prescriptionName": "桂枝汤",
      "ingredients": [
        {"name": "桂枝", "dosage": "9g", "origin": "广西", "buyingTips": "色棕红、香气浓者佳"},
        {"name": "白芍", "dosage": "9g", "origin": "浙江", "buyingTips": "质坚实、粉性足者佳"}
      ],
      "sourceChapter": "《伤寒论》·辨太阳病脉证并治",
      "originalText": "太阳中风，阳浮而阴弱",
      "translation": "受了风，出汗怕风",
      "usageMethod": "水煎服，啜热稀粥",
      "precautions": "表实无汗者忌用",
      "pharmacology": "解肌发表，调和营卫",
      "matchedSymptoms": "汗出恶风",
      "relatedPrescriptions": [{"name": "桂枝加葛根汤", "reason": "兼项背强"}]
    },
    {
      "prescriptionName": "玉屏风散",
      "ingredients": [{"name": "黄芪", "dosage": "18g"}],
      "sourceChapter": "《千金药方》·卷十",
      "originalText": "治腠理不密，易于感冒",
      "translation": "老是感冒的人用",
      "usageMethod": "研末冲服",
      "precautions": "外感实邪者慎用",
      "pharmacology": "益气固表",
      "matchedSymptoms": "自汗易感"
    }
  ],
  "comparison": "桂枝汤重在调和营卫，玉屏风散重在益气固表",
  "recommendation": "先用桂枝汤"
}"#
        .to_string()
    }

    #[test]
    fn test_parse_full_response() {
        let result = parse_consultation(&sample_response()).unwrap();

        assert_eq!(result.symptom_analysis, "风寒表虚，营卫不和");
        assert_eq!(result.comparison, "桂枝汤重在调和营卫，玉屏风散重在益气固表");
        assert_eq!(result.recommendation, "先用桂枝汤");
        assert_eq!(result.prescriptions.len(), 2);

        let first = &result.prescriptions[0];
        assert_eq!(first.prescription_name, "桂枝汤");
        assert_eq!(first.source_chapter, "《伤寒论》·辨太阳病脉证并治");
        assert_eq!(first.usage_method, "水煎服，啜热稀粥");
        assert_eq!(first.ingredients[1].buying_tips, "质坚实、粉性足者佳");
        assert_eq!(first.related()[0].name, "桂枝加葛根汤");
    }

    #[test]
    fn test_missing_inner_ingredient_fields_default() {
        let result = parse_consultation(&sample_response()).unwrap();
        let second = &result.prescriptions[1];

        assert_eq!(second.ingredients[0].name, "黄芪");
        assert_eq!(second.ingredients[0].origin, "");
        assert_eq!(second.ingredients[0].buying_tips, "");
        assert!(second.related_prescriptions.is_none());
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(&sample_response()).unwrap();
        value["prescriptions"][0]
            .as_object_mut()
            .unwrap()
            .remove("pharmacology");

        let err = parse_consultation(&value.to_string()).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_top_level_field_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(&sample_response()).unwrap();
        value.as_object_mut().unwrap().remove("recommendation");

        let err = parse_consultation(&value.to_string()).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = parse_consultation("抱歉，我无法回答").unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_fenced_response() {
        let fenced = format!("```json\n{}\n```", sample_response());
        let result = parse_consultation(&fenced).unwrap();
        assert_eq!(result.prescriptions[0].prescription_name, "桂枝汤");
    }

    #[test]
    fn test_empty_fence_is_empty_response() {
        assert_eq!(parse_consultation("```json\n```"), Err(QueryError::EmptyResponse));
    }
}
