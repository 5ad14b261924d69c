// Screening forms - catalogue, routes and per-form state
// One FormState per visible form; it is dropped on navigation

use crate::error::ScreeningError;
use crate::fields::{FieldDefinition, FieldRegistry};
use crate::risk::ScreeningResult;
use crate::validation::{validate_field, validate_submission, Payload};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// FORM KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    PreDiabetes,
    PreHeart,
    PreParkinsons,
    PreBreast,
    Diabetes,
    Heart,
    Parkinsons,
    Breast,
    Symptom,
}

/// Where a form gets its answer when nothing overrides it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    /// POST to the prediction API
    Remote,
    /// Pseudo-random coin flip between two labels
    CoinFlip,
    /// Average of slider values against fixed thresholds
    Average,
    /// The bundled scoring rules, same as the prediction service
    Rules,
}

const ALL_FORMS: [FormKind; 9] = [
    FormKind::PreDiabetes,
    FormKind::PreHeart,
    FormKind::PreParkinsons,
    FormKind::PreBreast,
    FormKind::Diabetes,
    FormKind::Heart,
    FormKind::Parkinsons,
    FormKind::Breast,
    FormKind::Symptom,
];

impl FormKind {
    pub fn all() -> &'static [FormKind] {
        &ALL_FORMS
    }

    /// Path segment under /predict/ and under the router
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::PreDiabetes => "pre-diabetes",
            FormKind::PreHeart => "pre-heart",
            FormKind::PreParkinsons => "pre-parkinsons",
            FormKind::PreBreast => "pre-breast",
            FormKind::Diabetes => "diabetes",
            FormKind::Heart => "heart",
            FormKind::Parkinsons => "parkinsons",
            FormKind::Breast => "breast",
            FormKind::Symptom => "symptom",
        }
    }

    pub fn from_endpoint(name: &str) -> Option<Self> {
        ALL_FORMS.iter().copied().find(|k| k.endpoint() == name)
    }

    pub fn route(&self) -> String {
        format!("/{}", self.endpoint())
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormKind::PreDiabetes => "Diabetes Pre-Screening",
            FormKind::PreHeart => "Heart Health Pre-Screening",
            FormKind::PreParkinsons => "Parkinson's Pre-Screening",
            FormKind::PreBreast => "Breast Cancer Pre-Screening",
            FormKind::Diabetes => "Diabetes Prediction",
            FormKind::Heart => "Heart Disease Prediction",
            FormKind::Parkinsons => "Parkinson's Detection",
            FormKind::Breast => "Breast Cancer Screening",
            FormKind::Symptom => "Symptom Analyzer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormKind::PreDiabetes => "Quick 3-question screening of diabetes risk",
            FormKind::PreHeart => "Quick cardiovascular risk check",
            FormKind::PreParkinsons => "Early signs of Parkinson's disease",
            FormKind::PreBreast => "Quick breast cancer risk evaluation",
            FormKind::Diabetes => "Full diabetes assessment with clinical values",
            FormKind::Heart => "Comprehensive cardiovascular disease assessment",
            FormKind::Parkinsons => "Voice measurement based assessment",
            FormKind::Breast => "Cell nucleus measurement based assessment",
            FormKind::Symptom => "Rate eight common symptoms from 0 to 10",
        }
    }

    pub fn prediction_source(&self) -> PredictionSource {
        match self {
            FormKind::PreDiabetes
            | FormKind::PreHeart
            | FormKind::PreParkinsons
            | FormKind::PreBreast
            | FormKind::Parkinsons => PredictionSource::Remote,
            FormKind::Diabetes | FormKind::Heart | FormKind::Breast => PredictionSource::CoinFlip,
            FormKind::Symptom => PredictionSource::Average,
        }
    }

    /// Pre-screenings answer with a risk percentage
    pub fn is_pre_screening(&self) -> bool {
        matches!(
            self,
            FormKind::PreDiabetes | FormKind::PreHeart | FormKind::PreParkinsons | FormKind::PreBreast
        )
    }

    /// The detailed form a pre-screening leads to
    pub fn detailed(&self) -> Option<FormKind> {
        match self {
            FormKind::PreDiabetes => Some(FormKind::Diabetes),
            FormKind::PreHeart => Some(FormKind::Heart),
            FormKind::PreParkinsons => Some(FormKind::Parkinsons),
            FormKind::PreBreast => Some(FormKind::Breast),
            _ => None,
        }
    }

    /// Fields drawn on the radar chart; empty means all of them
    pub fn radar_fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Heart => &["age", "trestbps", "chol", "thalach", "oldpeak", "ca"],
            _ => &[],
        }
    }
}

// ============================================================================
// ROUTES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Form(FormKind),
}

impl Route {
    /// "/" -> Home, "/pre-heart" -> Form(PreHeart); trailing slash tolerated
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Some(Route::Home);
        }

        let segment = trimmed.trim_start_matches('/').trim_end_matches('/');
        FormKind::from_endpoint(segment).map(Route::Form)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Form(kind) => kind.route(),
        }
    }

    /// Screens listed on the home page, in display order
    pub fn home_entries() -> Vec<Route> {
        vec![
            Route::Form(FormKind::PreDiabetes),
            Route::Form(FormKind::PreHeart),
            Route::Form(FormKind::PreParkinsons),
            Route::Form(FormKind::PreBreast),
            Route::Form(FormKind::Symptom),
        ]
    }
}

// ============================================================================
// FORM STATE
// ============================================================================

/// FormState - values, inline error and result of one form
pub struct FormState {
    kind: FormKind,
    registry: FieldRegistry,
    values: HashMap<String, String>,
    pub error: Option<String>,
    pub result: Option<ScreeningResult>,
    pub loading: bool,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        let registry = FieldRegistry::for_form(kind);
        let values = Self::initial_values(&registry);

        FormState {
            kind,
            registry,
            values,
            error: None,
            result: None,
            loading: false,
        }
    }

    fn initial_values(registry: &FieldRegistry) -> HashMap<String, String> {
        registry
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.default_text()))
            .collect()
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        self.registry.fields()
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Store a raw input and run live validation on it
    ///
    /// Unknown field names are ignored.
    pub fn set_value(&mut self, name: &str, raw: impl Into<String>) {
        let Some(field) = self.registry.get(name) else {
            debug!(form = self.kind.endpoint(), field = name, "ignoring unknown field");
            return;
        };

        let raw = raw.into();
        self.error = validate_field(field, &raw);
        self.values.insert(name.to_string(), raw);
    }

    /// Validate everything and mark the form as loading
    ///
    /// Returns `None` when validation fails (the error is set) or a
    /// request is already in flight.
    pub fn submit_payload(&mut self) -> Option<Payload> {
        if self.loading {
            debug!(form = self.kind.endpoint(), "submit ignored, request in flight");
            return None;
        }

        match validate_submission(self.registry.fields(), &self.values) {
            Ok(payload) => {
                self.error = None;
                self.loading = true;
                Some(payload)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the outcome of the in-flight request
    pub fn finish(&mut self, outcome: Result<ScreeningResult, ScreeningError>) {
        self.loading = false;

        match outcome {
            Ok(result) => {
                self.error = None;
                self.result = Some(result);
            }
            Err(e) => {
                self.error = Some(e.user_message());
            }
        }
    }

    /// Back to the freshly-mounted state
    pub fn reset(&mut self) {
        self.values = Self::initial_values(&self.registry);
        self.error = None;
        self.result = None;
        self.loading = false;
    }
}

// ============================================================================
// TESTS
// ============================================================================
