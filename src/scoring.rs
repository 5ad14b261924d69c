// Scoring Rules - Rules as Data
// Point tables for the pre-screenings, criteria counts for the detailed forms

use crate::forms::FormKind;
use crate::risk::{Outcome, RiskBand};
use crate::validation::Payload;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONDITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// value < x
    Below(f64),
    /// value > x
    Above(f64),
    /// value >= x
    AtLeast(f64),
    /// lo <= value <= hi
    Between(f64, f64),
    /// value == x
    Equals(f64),
}

impl Condition {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Condition::Below(x) => value < x,
            Condition::Above(x) => value > x,
            Condition::AtLeast(x) => value >= x,
            Condition::Between(lo, hi) => value >= lo && value <= hi,
            Condition::Equals(x) => value == x,
        }
    }
}

// ============================================================================
// POINT TABLES (pre-screenings)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier {
    pub when: Condition,
    pub points: f64,
}

/// One factor of a risk score; the first matching tier wins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorRule {
    pub field: String,
    pub tiers: Vec<Tier>,
    /// Points when no tier matches
    pub otherwise: f64,
}

impl FactorRule {
    fn new(field: &str, otherwise: f64) -> Self {
        FactorRule {
            field: field.to_string(),
            tiers: Vec::new(),
            otherwise,
        }
    }

    fn tier(mut self, when: Condition, points: f64) -> Self {
        self.tiers.push(Tier { when, points });
        self
    }

    /// Shorthand for ascending "< bound" tiers
    fn below(field: &str, steps: &[(f64, f64)], otherwise: f64) -> Self {
        steps
            .iter()
            .fold(FactorRule::new(field, otherwise), |rule, (bound, points)| {
                rule.tier(Condition::Below(*bound), *points)
            })
    }

    pub fn points(&self, value: f64) -> f64 {
        self.tiers
            .iter()
            .find(|t| t.when.holds(value))
            .map(|t| t.points)
            .unwrap_or(self.otherwise)
    }
}

/// Additive point model, capped at 100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModel {
    pub factors: Vec<FactorRule>,
}

impl RiskModel {
    pub fn score(&self, payload: &Payload) -> f64 {
        let total: f64 = self
            .factors
            .iter()
            .map(|f| f.points(payload.value(&f.field)))
            .sum();
        total.min(100.0)
    }

    /// Model for a pre-screening form
    pub fn for_form(kind: FormKind) -> Option<Self> {
        let factors = match kind {
            FormKind::PreDiabetes => vec![
                FactorRule::below("age", &[(40.0, 5.0), (50.0, 10.0), (60.0, 15.0)], 25.0),
                FactorRule::below("bmi", &[(25.0, 5.0), (30.0, 15.0), (35.0, 25.0)], 35.0),
                FactorRule::below("glucose", &[(100.0, 5.0), (126.0, 20.0), (180.0, 30.0)], 40.0),
            ],
            FormKind::PreHeart => vec![
                FactorRule::below("age", &[(40.0, 5.0), (50.0, 10.0), (60.0, 20.0)], 30.0),
                FactorRule::below("cholesterol", &[(200.0, 5.0), (240.0, 15.0), (300.0, 25.0)], 35.0),
                FactorRule::below("blood_pressure", &[(120.0, 5.0), (140.0, 10.0), (160.0, 18.0)], 25.0),
                FactorRule::new("heart_rate", 5.0)
                    .tier(Condition::Between(60.0, 100.0), 2.0)
                    .tier(Condition::Below(60.0), 10.0)
                    .tier(Condition::Above(120.0), 10.0),
            ],
            FormKind::PreParkinsons => vec![
                FactorRule::below("age", &[(50.0, 5.0), (60.0, 10.0), (70.0, 15.0)], 25.0),
                FactorRule::below("tremor_severity", &[(2.0, 0.0), (4.0, 10.0), (7.0, 20.0)], 30.0),
                FactorRule::below("movement_difficulty", &[(3.0, 0.0), (5.0, 10.0), (7.0, 18.0)], 25.0),
                FactorRule::below("voice_changes", &[(3.0, 0.0), (5.0, 8.0), (7.0, 15.0)], 20.0),
            ],
            FormKind::PreBreast => vec![
                FactorRule::below(
                    "age",
                    &[(30.0, 5.0), (40.0, 10.0), (50.0, 15.0), (60.0, 20.0)],
                    30.0,
                ),
                FactorRule::new("family_history", 0.0).tier(Condition::Equals(1.0), 35.0),
                FactorRule::new("lump_detected", 0.0).tier(Condition::Equals(1.0), 30.0),
                FactorRule::below("pain_level", &[(3.0, 0.0), (6.0, 2.0)], 5.0),
            ],
            _ => return None,
        };

        Some(RiskModel { factors })
    }
}

// ============================================================================
// CRITERIA MODELS (detailed forms)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub field: String,
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Minimum number of criteria met
    pub min_met: usize,
    pub label: String,
    pub band: RiskBand,
}

/// Counts how many criteria hold and picks the strongest verdict reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaModel {
    pub criteria: Vec<Criterion>,
    /// Sorted by `min_met`, highest first; the last entry has `min_met == 0`
    pub verdicts: Vec<Verdict>,
}

impl CriteriaModel {
    fn new(criteria: &[(&str, Condition)], verdicts: &[(usize, &str, RiskBand)]) -> Self {
        let mut verdicts: Vec<Verdict> = verdicts
            .iter()
            .map(|(min_met, label, band)| Verdict {
                min_met: *min_met,
                label: label.to_string(),
                band: *band,
            })
            .collect();
        verdicts.sort_by(|a, b| b.min_met.cmp(&a.min_met));

        CriteriaModel {
            criteria: criteria
                .iter()
                .map(|(field, when)| Criterion {
                    field: field.to_string(),
                    when: *when,
                })
                .collect(),
            verdicts,
        }
    }

    pub fn met(&self, payload: &Payload) -> usize {
        self.criteria
            .iter()
            .filter(|c| c.when.holds(payload.value(&c.field)))
            .count()
    }

    /// Strongest verdict reached; the weakest one when none is, `None` without verdicts
    pub fn evaluate(&self, payload: &Payload) -> Option<&Verdict> {
        let met = self.met(payload);
        self.verdicts
            .iter()
            .find(|v| met >= v.min_met)
            .or_else(|| self.verdicts.last())
    }

    pub fn for_form(kind: FormKind) -> Option<Self> {
        let model = match kind {
            FormKind::Diabetes => CriteriaModel::new(
                &[
                    ("glucose", Condition::AtLeast(140.0)),
                    ("bmi", Condition::AtLeast(30.0)),
                    ("diabetes_pedigree", Condition::AtLeast(1.2)),
                ],
                &[
                    (2, "Diabetic (High risk)", RiskBand::High),
                    (1, "At Risk (Caution)", RiskBand::Moderate),
                    (0, "Not Diabetic", RiskBand::Low),
                ],
            ),
            FormKind::Heart => CriteriaModel::new(
                &[
                    ("chol", Condition::Above(240.0)),
                    ("trestbps", Condition::Above(140.0)),
                    ("thalach", Condition::Below(120.0)),
                ],
                &[
                    (2, "High Risk of Heart Disease", RiskBand::High),
                    (1, "Moderate Risk", RiskBand::Moderate),
                    (0, "Normal", RiskBand::Low),
                ],
            ),
            FormKind::Parkinsons => CriteriaModel::new(
                &[
                    ("jitter_percent", Condition::Above(0.3)),
                    ("nhr", Condition::Above(0.1)),
                ],
                &[
                    (1, "Parkinson's Detected", RiskBand::High),
                    (0, "No Parkinson's Signs", RiskBand::Low),
                ],
            ),
            FormKind::Breast => CriteriaModel::new(
                &[
                    ("radius_mean", Condition::Above(15.0)),
                    ("concavity_mean", Condition::Above(0.3)),
                ],
                &[
                    (1, "Malignant (High Risk)", RiskBand::High),
                    (0, "Benign (Low Risk)", RiskBand::Low),
                ],
            ),
            _ => return None,
        };

        Some(model)
    }
}

// ============================================================================
// SYMPTOM SCORING
// ============================================================================

const SYMPTOM_TOTAL_LABELS: [(&str, RiskBand); 3] = [
    ("Severe Symptoms - Seek Medical Help", RiskBand::High),
    ("Moderate Symptoms", RiskBand::Moderate),
    ("Mild Symptoms", RiskBand::Low),
];

const SYMPTOM_AVERAGE_LABELS: [(&str, RiskBand); 3] = [
    ("High risk - Please consult a healthcare professional immediately", RiskBand::High),
    ("Moderate symptoms - Consider scheduling a doctor's appointment", RiskBand::Moderate),
    ("Mild symptoms - Monitor your condition and rest", RiskBand::Low),
];

fn tiered_label(labels: &[(&str, RiskBand); 3], value: f64, high: f64, moderate: f64) -> Outcome {
    let idx = if value > high {
        0
    } else if value > moderate {
        1
    } else {
        2
    };
    let (label, band) = labels[idx];
    Outcome::label(label, Some(band))
}

/// Service rule: thresholds on the sum of all eight ratings
pub fn symptom_total_outcome(payload: &Payload) -> Outcome {
    tiered_label(&SYMPTOM_TOTAL_LABELS, payload.sum(), 40.0, 20.0)
}

/// Local rule: thresholds on the average rating
pub fn symptom_average_outcome(payload: &Payload) -> Outcome {
    let avg = if payload.is_empty() {
        0.0
    } else {
        payload.sum() / payload.len() as f64
    };
    tiered_label(&SYMPTOM_AVERAGE_LABELS, avg, 6.0, 3.0)
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Deterministic answer for any form, as the prediction service gives it
pub fn evaluate(kind: FormKind, payload: &Payload) -> Outcome {
    if let Some(model) = RiskModel::for_form(kind) {
        return Outcome::risk(model.score(payload));
    }

    if let Some(verdict) = CriteriaModel::for_form(kind)
        .as_ref()
        .and_then(|model| model.evaluate(payload))
    {
        return Outcome::label(verdict.label.clone(), Some(verdict.band));
    }

    symptom_total_outcome(payload)
}

/// Band for a prediction label the service is known to produce
pub fn label_severity(kind: FormKind, prediction: &str) -> Option<RiskBand> {
    if let Some(model) = CriteriaModel::for_form(kind) {
        if let Some(v) = model.verdicts.iter().find(|v| v.label == prediction) {
            return Some(v.band);
        }
    }

    if let Some((positive, negative)) = coin_flip_labels(kind) {
        if prediction == positive {
            return Some(RiskBand::High);
        }
        if prediction == negative {
            return Some(RiskBand::Low);
        }
    }

    SYMPTOM_TOTAL_LABELS
        .iter()
        .chain(SYMPTOM_AVERAGE_LABELS.iter())
        .find(|(label, _)| *label == prediction)
        .map(|(_, band)| *band)
}

// ============================================================================
// COIN FLIP
// ============================================================================

/// (positive, negative) labels of the forms answered by a coin flip
pub fn coin_flip_labels(kind: FormKind) -> Option<(&'static str, &'static str)> {
    match kind {
        FormKind::Diabetes => Some(("Likely Diabetic", "Not Diabetic")),
        FormKind::Heart => Some(("Heart Disease Risk Detected", "No Heart Disease")),
        FormKind::Breast => Some(("Malignant", "Benign")),
        _ => None,
    }
}

/// Placeholder predictor: `random > 0.5` picks the positive label
pub struct CoinFlip {
    rng: StdRng,
}

impl CoinFlip {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        CoinFlip { rng }
    }

    pub fn flip(&mut self, kind: FormKind) -> Option<Outcome> {
        let (positive, negative) = coin_flip_labels(kind)?;

        if self.rng.gen::<f64>() > 0.5 {
            Some(Outcome::label(positive, Some(RiskBand::High)))
        } else {
            Some(Outcome::label(negative, Some(RiskBand::Low)))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, f64)]) -> Payload {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_condition_holds() {
        assert!(Condition::Below(40.0).holds(39.9));
        assert!(!Condition::Below(40.0).holds(40.0));
        assert!(Condition::AtLeast(140.0).holds(140.0));
        assert!(Condition::Between(60.0, 100.0).holds(60.0));
        assert!(Condition::Between(60.0, 100.0).holds(100.0));
        assert!(!Condition::Above(0.3).holds(0.3));
    }

    #[test]
    fn test_pre_diabetes_score() {
        let model = RiskModel::for_form(FormKind::PreDiabetes).unwrap();

        // 10 (age 45) + 15 (bmi 27) + 20 (glucose 110)
        assert_eq!(model.score(&payload(&[("age", 45.0), ("bmi", 27.0), ("glucose", 110.0)])), 45.0);

        // 25 + 35 + 40 = 100
        assert_eq!(model.score(&payload(&[("age", 70.0), ("bmi", 40.0), ("glucose", 200.0)])), 100.0);

        // minimum
        assert_eq!(model.score(&payload(&[("age", 20.0), ("bmi", 20.0), ("glucose", 80.0)])), 15.0);
    }

    #[test]
    fn test_pre_heart_heart_rate_tiers() {
        let model = RiskModel::for_form(FormKind::PreHeart).unwrap();
        let base = [("age", 30.0), ("cholesterol", 180.0), ("blood_pressure", 110.0)];

        let score = |hr: f64| {
            let mut p = payload(&base);
            p.insert("heart_rate", hr);
            model.score(&p)
        };

        // 5 + 5 + 5 = 15 before heart rate
        assert_eq!(score(72.0), 17.0);
        assert_eq!(score(50.0), 25.0);
        assert_eq!(score(130.0), 25.0);
        assert_eq!(score(110.0), 20.0);
    }

    #[test]
    fn test_pre_parkinsons_score() {
        let model = RiskModel::for_form(FormKind::PreParkinsons).unwrap();
        let p = payload(&[
            ("age", 65.0),
            ("tremor_severity", 5.0),
            ("movement_difficulty", 4.0),
            ("voice_changes", 1.0),
        ]);

        // 15 + 20 + 10 + 0
        assert_eq!(model.score(&p), 45.0);
    }

    #[test]
    fn test_pre_breast_score_is_capped() {
        let model = RiskModel::for_form(FormKind::PreBreast).unwrap();
        let p = payload(&[
            ("age", 65.0),
            ("family_history", 1.0),
            ("lump_detected", 1.0),
            ("pain_level", 8.0),
        ]);

        // 30 + 35 + 30 + 5
        assert_eq!(model.score(&p), 100.0);

        let low = payload(&[("age", 25.0), ("family_history", 0.0), ("lump_detected", 0.0), ("pain_level", 0.0)]);
        assert_eq!(model.score(&low), 5.0);
    }

    #[test]
    fn test_diabetes_criteria() {
        let model = CriteriaModel::for_form(FormKind::Diabetes).unwrap();

        let none = payload(&[("glucose", 100.0), ("bmi", 22.0), ("diabetes_pedigree", 0.4)]);
        assert_eq!(model.evaluate(&none).unwrap().label, "Not Diabetic");

        let one = payload(&[("glucose", 150.0), ("bmi", 22.0), ("diabetes_pedigree", 0.4)]);
        assert_eq!(model.evaluate(&one).unwrap().label, "At Risk (Caution)");

        let two = payload(&[("glucose", 150.0), ("bmi", 31.0), ("diabetes_pedigree", 0.4)]);
        assert_eq!(model.evaluate(&two).unwrap().label, "Diabetic (High risk)");
        assert_eq!(model.evaluate(&two).unwrap().band, RiskBand::High);
    }

    #[test]
    fn test_criteria_model_without_verdicts() {
        let model = CriteriaModel::new(&[("chol", Condition::Above(240.0))], &[]);
        assert_eq!(model.met(&payload(&[("chol", 300.0)])), 1);
        assert!(model.evaluate(&payload(&[("chol", 300.0)])).is_none());
    }

    #[test]
    fn test_heart_criteria() {
        let model = CriteriaModel::for_form(FormKind::Heart).unwrap();
        let p = payload(&[("chol", 250.0), ("trestbps", 150.0), ("thalach", 150.0)]);
        assert_eq!(model.met(&p), 2);
        assert_eq!(model.evaluate(&p).unwrap().label, "High Risk of Heart Disease");
    }

    #[test]
    fn test_parkinsons_and_breast_any_criterion() {
        let parkinsons = CriteriaModel::for_form(FormKind::Parkinsons).unwrap();
        assert_eq!(parkinsons.evaluate(&payload(&[("nhr", 0.2)])).unwrap().label, "Parkinson's Detected");
        assert_eq!(
            parkinsons.evaluate(&payload(&[("jitter_percent", 0.01), ("nhr", 0.02)])).unwrap().label,
            "No Parkinson's Signs"
        );

        let breast = CriteriaModel::for_form(FormKind::Breast).unwrap();
        assert_eq!(breast.evaluate(&payload(&[("radius_mean", 18.0)])).unwrap().label, "Malignant (High Risk)");
        assert_eq!(breast.evaluate(&payload(&[("radius_mean", 12.0)])).unwrap().label, "Benign (Low Risk)");
    }

    #[test]
    fn test_symptom_rules() {
        let mild = payload(&[("fever", 2.0), ("cough", 2.0)]);
        assert_eq!(symptom_total_outcome(&mild).headline(), "Mild Symptoms");

        let all_sixes: Payload = ["fever", "cough", "headache", "fatigue", "nausea", "chest_pain", "dizziness", "sore_throat"]
            .iter()
            .map(|n| (*n, 6.0))
            .collect();
        // sum 48, average 6
        assert_eq!(symptom_total_outcome(&all_sixes).headline(), "Severe Symptoms - Seek Medical Help");
        assert_eq!(
            symptom_average_outcome(&all_sixes).band(),
            Some(RiskBand::Moderate)
        );
    }

    #[test]
    fn test_evaluate_dispatches_by_form() {
        let p = payload(&[("age", 45.0), ("bmi", 27.0), ("glucose", 110.0)]);
        assert_eq!(evaluate(FormKind::PreDiabetes, &p), Outcome::risk(45.0));

        let s = payload(&[("fever", 1.0)]);
        assert_eq!(evaluate(FormKind::Symptom, &s).headline(), "Mild Symptoms");
    }

    #[test]
    fn test_label_severity_lookup() {
        assert_eq!(label_severity(FormKind::Heart, "Normal"), Some(RiskBand::Low));
        assert_eq!(label_severity(FormKind::Heart, "Heart Disease Risk Detected"), Some(RiskBand::High));
        assert_eq!(label_severity(FormKind::Symptom, "Moderate Symptoms"), Some(RiskBand::Moderate));
        assert_eq!(label_severity(FormKind::Diabetes, "Something else"), None);
    }

    #[test]
    fn test_coin_flip_is_deterministic_with_seed() {
        let mut a = CoinFlip::new(Some(7));
        let mut b = CoinFlip::new(Some(7));

        for _ in 0..20 {
            assert_eq!(a.flip(FormKind::Diabetes), b.flip(FormKind::Diabetes));
        }
    }

    #[test]
    fn test_coin_flip_only_yields_known_labels() {
        let mut coin = CoinFlip::new(Some(42));
        for _ in 0..50 {
            let outcome = coin.flip(FormKind::Breast).unwrap();
            let headline = outcome.headline();
            assert!(headline == "Malignant" || headline == "Benign");
        }
        assert!(coin.flip(FormKind::PreDiabetes).is_none());
    }
}
