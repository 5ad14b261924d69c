// Field Registry - what each questionnaire asks for
// Every input is a number with an inclusive [min, max] range

use crate::forms::FormKind;
use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// FieldDefinition - one numeric question on a form
///
/// `name` doubles as the JSON key sent to the prediction API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// JSON key (e.g., "blood_pressure")
    pub name: String,

    /// Human-readable label used in messages (e.g., "Blood Pressure")
    pub label: String,

    /// Display unit, empty when unitless
    pub unit: String,

    /// Inclusive lower bound
    pub min: f64,

    /// Inclusive upper bound
    pub max: f64,

    /// Initial value; sliders start at a value, text inputs start empty
    pub default: Option<f64>,

    /// Hint shown under the input
    pub hint: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, min: f64, max: f64) -> Self {
        FieldDefinition {
            name: name.into(),
            label: label.into(),
            unit: String::new(),
            min,
            max,
            default: None,
            hint: String::new(),
        }
    }

    /// Builder: add display unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Builder: add initial value
    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    /// Builder: add input hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// "Range: 50 - 250 mg/dL"
    pub fn range_text(&self) -> String {
        if self.unit.is_empty() {
            format!("Range: {} - {}", self.min, self.max)
        } else {
            format!("Range: {} - {} {}", self.min, self.max, self.unit)
        }
    }

    /// Initial raw input text
    pub fn default_text(&self) -> String {
        self.default.map(|v| v.to_string()).unwrap_or_default()
    }
}

// ============================================================================
// FIELD REGISTRY
// ============================================================================

/// FieldRegistry - ordered field table for one form
///
/// Order matters: submission validation reports the first failing field.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
}

impl FieldRegistry {
    pub fn empty() -> Self {
        FieldRegistry { fields: Vec::new() }
    }

    /// Build the field table for a form
    pub fn for_form(kind: FormKind) -> Self {
        let mut registry = FieldRegistry::empty();

        match kind {
            FormKind::PreDiabetes => registry.register_pre_diabetes(),
            FormKind::PreHeart => registry.register_pre_heart(),
            FormKind::PreParkinsons => registry.register_pre_parkinsons(),
            FormKind::PreBreast => registry.register_pre_breast(),
            FormKind::Diabetes => registry.register_diabetes(),
            FormKind::Heart => registry.register_heart(),
            FormKind::Parkinsons => registry.register_parkinsons(),
            FormKind::Breast => registry.register_breast(),
            FormKind::Symptom => registry.register_symptom(),
        }

        registry
    }

    fn register_pre_diabetes(&mut self) {
        self.register(
            FieldDefinition::new("age", "Age", 18.0, 80.0)
                .with_unit("years")
                .with_hint("Enter your age (18-80)"),
        );
        self.register(
            FieldDefinition::new("bmi", "BMI", 10.0, 60.0)
                .with_hint("Enter your BMI (10-60)"),
        );
        self.register(
            FieldDefinition::new("glucose", "Glucose", 50.0, 250.0)
                .with_unit("mg/dL")
                .with_hint("Enter glucose level (50-250)"),
        );
    }

    fn register_pre_heart(&mut self) {
        self.register(FieldDefinition::new("age", "Age", 18.0, 90.0).with_unit("years"));
        self.register(
            FieldDefinition::new("cholesterol", "Cholesterol", 100.0, 400.0).with_unit("mg/dL"),
        );
        self.register(
            FieldDefinition::new("blood_pressure", "Blood pressure", 80.0, 200.0)
                .with_unit("mmHg")
                .with_hint("Systolic reading"),
        );
        self.register(
            FieldDefinition::new("heart_rate", "Heart rate", 40.0, 200.0).with_unit("bpm"),
        );
    }

    fn register_pre_parkinsons(&mut self) {
        self.register(FieldDefinition::new("age", "Age", 30.0, 90.0).with_unit("years"));
        self.register(
            FieldDefinition::new("tremor_severity", "Tremor severity", 0.0, 10.0)
                .with_hint("0 = none, 10 = severe"),
        );
        self.register(
            FieldDefinition::new("movement_difficulty", "Movement difficulty", 0.0, 10.0)
                .with_hint("0 = none, 10 = severe"),
        );
        self.register(
            FieldDefinition::new("voice_changes", "Voice changes", 0.0, 10.0)
                .with_hint("0 = none, 10 = severe"),
        );
    }

    fn register_pre_breast(&mut self) {
        self.register(FieldDefinition::new("age", "Age", 20.0, 90.0).with_unit("years"));
        self.register(
            FieldDefinition::new("family_history", "Family history", 0.0, 1.0)
                .with_hint("1 = yes, 0 = no"),
        );
        self.register(
            FieldDefinition::new("lump_detected", "Lump detected", 0.0, 1.0)
                .with_hint("1 = yes, 0 = no"),
        );
        self.register(
            FieldDefinition::new("pain_level", "Pain level", 0.0, 10.0)
                .with_hint("0 = none, 10 = severe"),
        );
    }

    fn register_diabetes(&mut self) {
        self.register(FieldDefinition::new("pregnancies", "Number of Pregnancies", 0.0, 15.0));
        self.register(
            FieldDefinition::new("glucose", "Glucose Level", 50.0, 250.0).with_unit("mg/dL"),
        );
        self.register(
            FieldDefinition::new("blood_pressure", "Blood Pressure", 40.0, 150.0).with_unit("mmHg"),
        );
        self.register(
            FieldDefinition::new("skin_thickness", "Skin Thickness", 5.0, 60.0).with_unit("mm"),
        );
        self.register(
            FieldDefinition::new("insulin", "Insulin Level", 15.0, 276.0).with_unit("mu U/ml"),
        );
        self.register(FieldDefinition::new("bmi", "Body Mass Index", 10.0, 60.0));
        self.register(FieldDefinition::new("diabetes_pedigree", "Diabetes Pedigree", 0.05, 2.5));
        self.register(FieldDefinition::new("age", "Age", 18.0, 80.0).with_unit("years"));
    }

    fn register_heart(&mut self) {
        self.register(FieldDefinition::new("age", "Age", 29.0, 77.0).with_unit("years"));
        self.register(FieldDefinition::new("sex", "Sex (0=Female, 1=Male)", 0.0, 1.0));
        self.register(FieldDefinition::new("cp", "Chest Pain Type (0-3)", 0.0, 3.0));
        self.register(
            FieldDefinition::new("trestbps", "Resting Blood Pressure", 94.0, 200.0).with_unit("mmHg"),
        );
        self.register(FieldDefinition::new("chol", "Cholesterol", 126.0, 564.0).with_unit("mg/dL"));
        self.register(FieldDefinition::new("fbs", "Fasting Blood Sugar (0/1)", 0.0, 1.0));
        self.register(FieldDefinition::new("restecg", "Resting ECG (0-2)", 0.0, 2.0));
        self.register(FieldDefinition::new("thalach", "Max Heart Rate", 71.0, 202.0).with_unit("bpm"));
        self.register(FieldDefinition::new("exang", "Exercise Angina (0/1)", 0.0, 1.0));
        self.register(FieldDefinition::new("oldpeak", "ST Depression", 0.0, 6.2));
        self.register(FieldDefinition::new("slope", "Slope (0-2)", 0.0, 2.0));
        self.register(FieldDefinition::new("ca", "Vessels Colored (0-4)", 0.0, 4.0));
        self.register(FieldDefinition::new("thal", "Thalassemia (0-3)", 0.0, 3.0));
    }

    fn register_parkinsons(&mut self) {
        self.register(FieldDefinition::new("mdvp_fo", "MDVP:Fo", 80.0, 300.0).with_unit("Hz"));
        self.register(FieldDefinition::new("mdvp_fhi", "MDVP:Fhi", 100.0, 400.0).with_unit("Hz"));
        self.register(FieldDefinition::new("mdvp_flo", "MDVP:Flo", 50.0, 150.0).with_unit("Hz"));
        self.register(FieldDefinition::new("jitter_percent", "Jitter", 0.0, 1.0).with_unit("%"));
        self.register(FieldDefinition::new("shimmer", "Shimmer", 0.0, 1.0));
        self.register(FieldDefinition::new("nhr", "NHR", 0.0, 0.3));
        self.register(FieldDefinition::new("hnr", "HNR", 5.0, 40.0));
        self.register(FieldDefinition::new("rpde", "RPDE", 0.0, 1.0));
    }

    fn register_breast(&mut self) {
        self.register(FieldDefinition::new("radius_mean", "Radius Mean", 6.0, 30.0));
        self.register(FieldDefinition::new("texture_mean", "Texture Mean", 9.0, 40.0));
        self.register(FieldDefinition::new("perimeter_mean", "Perimeter Mean", 40.0, 200.0));
        self.register(FieldDefinition::new("area_mean", "Area Mean", 140.0, 2500.0));
        self.register(FieldDefinition::new("concavity_mean", "Concavity Mean", 0.0, 0.43));
        self.register(FieldDefinition::new("symmetry_mean", "Symmetry Mean", 0.1, 0.3));
    }

    fn register_symptom(&mut self) {
        let symptoms = [
            ("fever", "Fever", "No fever / High fever"),
            ("cough", "Cough", "No cough / Severe cough"),
            ("headache", "Headache", "No pain / Severe pain"),
            ("fatigue", "Fatigue", "Energetic / Exhausted"),
            ("nausea", "Nausea", "No nausea / Severe nausea"),
            ("chest_pain", "Chest Pain", "No pain / Severe pain"),
            ("dizziness", "Dizziness", "None / Severe"),
            ("sore_throat", "Sore Throat", "No pain / Severe pain"),
        ];

        for (name, label, hint) in symptoms {
            self.register(
                FieldDefinition::new(name, label, 0.0, 10.0)
                    .with_default(0.0)
                    .with_hint(hint),
            );
        }
    }

    /// Register a field; a field with the same name is replaced in place
    pub fn register(&mut self, field: FieldDefinition) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_form_has_fields() {
        for kind in FormKind::all() {
            let registry = FieldRegistry::for_form(*kind);
            assert!(registry.count() > 0, "{:?} should have fields", kind);
        }
    }

    #[test]
    fn test_field_counts_match_questionnaires() {
        assert_eq!(FieldRegistry::for_form(FormKind::PreDiabetes).count(), 3);
        assert_eq!(FieldRegistry::for_form(FormKind::PreHeart).count(), 4);
        assert_eq!(FieldRegistry::for_form(FormKind::Diabetes).count(), 8);
        assert_eq!(FieldRegistry::for_form(FormKind::Heart).count(), 13);
        assert_eq!(FieldRegistry::for_form(FormKind::Breast).count(), 6);
        assert_eq!(FieldRegistry::for_form(FormKind::Symptom).count(), 8);
    }

    #[test]
    fn test_ranges_are_well_formed() {
        for kind in FormKind::all() {
            for field in FieldRegistry::for_form(*kind).fields() {
                assert!(field.min < field.max, "{}.{} has an empty range", kind.endpoint(), field.name);
            }
        }
    }

    #[test]
    fn test_field_order_is_preserved() {
        let registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        assert_eq!(registry.names(), vec!["age", "bmi", "glucose"]);
    }

    #[test]
    fn test_symptom_fields_start_at_zero() {
        let registry = FieldRegistry::for_form(FormKind::Symptom);
        assert!(registry.fields().iter().all(|f| f.default == Some(0.0)));
        assert_eq!(registry.get("chest_pain").unwrap().default_text(), "0");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = FieldRegistry::for_form(FormKind::PreDiabetes);
        registry.register(FieldDefinition::new("bmi", "BMI", 15.0, 50.0));

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.get("bmi").unwrap().min, 15.0);
        assert_eq!(registry.names(), vec!["age", "bmi", "glucose"]);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let field = FieldDefinition::new("glucose", "Glucose", 50.0, 250.0);
        assert!(field.contains(50.0));
        assert!(field.contains(250.0));
        assert!(!field.contains(49.9));
        assert!(!field.contains(250.1));
    }

    #[test]
    fn test_range_text() {
        let field = FieldDefinition::new("glucose", "Glucose", 50.0, 250.0).with_unit("mg/dL");
        assert_eq!(field.range_text(), "Range: 50 - 250 mg/dL");
        assert_eq!(FieldDefinition::new("nhr", "NHR", 0.0, 0.3).range_text(), "Range: 0 - 0.3");
    }
}
