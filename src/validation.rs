// Input validation - required fields and inclusive ranges
// Live validation runs per keystroke, full validation runs on submit

use crate::error::ValidationError;
use crate::fields::FieldDefinition;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;
use std::collections::HashMap;

// ============================================================================
// PAYLOAD
// ============================================================================

/// Parsed form values, in field order
///
/// Serializes as the flat JSON object the prediction API expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    values: Vec<(String, f64)>,
}

impl Payload {
    pub fn new() -> Self {
        Payload { values: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Value or 0.0 when absent
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().map(|(_, v)| v).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Payload {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (name, value) in iter {
            payload.insert(name, value);
        }
        payload
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a raw input into a finite number
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn out_of_range(field: &FieldDefinition) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.name.clone(),
        label: field.label.clone(),
        min: field.min,
        max: field.max,
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate one input as the user types
///
/// Empty input clears the message; anything unparsable or outside the
/// range yields the range message.
pub fn validate_field(field: &FieldDefinition, raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    match parse_number(raw) {
        Some(value) if field.contains(value) => None,
        _ => Some(out_of_range(field).to_string()),
    }
}

/// Validate every field in declared order and build the request payload
pub fn validate_submission(
    fields: &[FieldDefinition],
    values: &HashMap<String, String>,
) -> Result<Payload, ValidationError> {
    let mut payload = Payload::new();

    for field in fields {
        let raw = values.get(&field.name).map(String::as_str).unwrap_or("");

        if raw.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: field.name.clone(),
            });
        }

        match parse_number(raw) {
            Some(value) if field.contains(value) => payload.insert(field.name.clone(), value),
            _ => return Err(out_of_range(field)),
        }
    }

    Ok(payload)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MISSING_FIELDS_MESSAGE;
    use crate::fields::FieldRegistry;
    use crate::forms::FormKind;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_live_validation_out_of_range() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let bmi = registry.get("bmi").unwrap();

        assert_eq!(
            validate_field(bmi, "75"),
            Some("BMI must be between 10 and 60".to_string())
        );
        assert_eq!(
            validate_field(bmi, "9.99"),
            Some("BMI must be between 10 and 60".to_string())
        );
    }

    #[test]
    fn test_live_validation_in_range_clears() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let glucose = registry.get("glucose").unwrap();

        assert_eq!(validate_field(glucose, "50"), None);
        assert_eq!(validate_field(glucose, " 250 "), None);
        assert_eq!(validate_field(glucose, "120.5"), None);
    }

    #[test]
    fn test_live_validation_empty_clears() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        assert_eq!(validate_field(registry.get("age").unwrap(), ""), None);
        assert_eq!(validate_field(registry.get("age").unwrap(), "   "), None);
    }

    #[test]
    fn test_live_validation_rejects_garbage() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let age = registry.get("age").unwrap();

        assert!(validate_field(age, "abc").is_some());
        assert!(validate_field(age, "NaN").is_some());
        assert!(validate_field(age, "inf").is_some());
    }

    #[test]
    fn test_every_field_rejects_values_outside_range() {
        for kind in FormKind::all() {
            let registry = FieldRegistry::for_form(*kind);
            for field in registry.fields() {
                let below = (field.min - 1.0).to_string();
                let above = (field.max + 1.0).to_string();
                let expected = format!("{} must be between {} and {}", field.label, field.min, field.max);

                assert_eq!(validate_field(field, &below), Some(expected.clone()));
                assert_eq!(validate_field(field, &above), Some(expected));
                assert_eq!(validate_field(field, &field.max.to_string()), None);
            }
        }
    }

    #[test]
    fn test_submission_requires_all_fields() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let result = validate_submission(registry.fields(), &values(&[("age", "45"), ("bmi", "")]));

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
        assert_eq!(err.field(), "bmi");
    }

    #[test]
    fn test_submission_reports_first_failing_field() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let result = validate_submission(
            registry.fields(),
            &values(&[("age", "10"), ("bmi", "70"), ("glucose", "100")]),
        );

        assert_eq!(result.unwrap_err().to_string(), "Age must be between 18 and 80");
    }

    #[test]
    fn test_submission_builds_payload_in_order() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        let payload = validate_submission(
            registry.fields(),
            &values(&[("glucose", "110"), ("age", "45"), ("bmi", "27.5")]),
        )
        .unwrap();

        let names: Vec<&str> = payload.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["age", "bmi", "glucose"]);
        assert_eq!(payload.get("bmi"), Some(27.5));
    }

    #[test]
    fn test_payload_serializes_as_flat_object() {
        let payload: Payload = vec![("age", 45.0), ("bmi", 27.5)].into_iter().collect();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json, serde_json::json!({"age": 45.0, "bmi": 27.5}));
    }

    #[test]
    fn test_payload_insert_overwrites() {
        let mut payload = Payload::new();
        payload.insert("age", 40.0);
        payload.insert("age", 41.0);

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.value("age"), 41.0);
        assert_eq!(payload.value("missing"), 0.0);
    }
}
