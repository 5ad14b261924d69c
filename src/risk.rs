// Result view-models - risk bands, metric status and chart data
// Everything here is derived; nothing outlives the form that produced it

use crate::fields::FieldRegistry;
use crate::forms::FormKind;
use crate::validation::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RISK BAND
// ============================================================================

/// Traffic-light band for a risk percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// <= 30 Low, <= 50 Moderate, otherwise High
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 30.0 {
            RiskBand::Low
        } else if percentage <= 50.0 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    /// Parse the `risk_level` string sent by the API
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskBand::Low),
            "moderate" => Some(RiskBand::Moderate),
            "high" => Some(RiskBand::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }

    /// Hex colour of the band
    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Low => "#10b981",
            RiskBand::Moderate => "#f59e0b",
            RiskBand::High => "#ef4444",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskBand::Low | RiskBand::Moderate => {
                "Your preliminary screening shows low to moderate risk. Continue maintaining a healthy lifestyle and regular check-ups."
            }
            RiskBand::High => {
                "Your preliminary screening indicates elevated risk. We recommend proceeding with a comprehensive assessment."
            }
        }
    }
}

// ============================================================================
// METRIC STATUS
// ============================================================================

/// Status of a single input relative to its range maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    Good,
    Moderate,
    High,
}

impl MetricStatus {
    /// < 50% of max Good, < 75% Moderate, otherwise High
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 50.0 {
            MetricStatus::Good
        } else if percentage < 75.0 {
            MetricStatus::Moderate
        } else {
            MetricStatus::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Good => "Good",
            MetricStatus::Moderate => "Moderate",
            MetricStatus::High => "High",
        }
    }
}

// ============================================================================
// CHART DATA
// ============================================================================

/// One spoke of the radar chart / one bar of the bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub subject: String,
    pub value: f64,
    pub range_max: f64,
    /// value / range_max * 100, one decimal
    pub percentage: f64,
}

impl ChartPoint {
    pub fn status(&self) -> MetricStatus {
        MetricStatus::from_percentage(self.percentage)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Strip the hint suffix from a label: "Chest Pain Type (0-3)" -> "Chest Pain Type"
fn short_subject(label: &str) -> String {
    let trimmed = match label.find(" (") {
        Some(idx) => &label[..idx],
        None => label,
    };
    trimmed.trim_end_matches(" Mean").to_string()
}

/// Bar chart data: every submitted field
pub fn chart_points(kind: FormKind, payload: &Payload) -> Vec<ChartPoint> {
    let registry = FieldRegistry::for_form(kind);

    registry
        .fields()
        .iter()
        .filter_map(|field| {
            let value = payload.get(&field.name)?;
            let percentage = if field.max > 0.0 {
                round1(value / field.max * 100.0)
            } else {
                0.0
            };

            Some(ChartPoint {
                subject: short_subject(&field.label),
                value,
                range_max: field.max,
                percentage,
            })
        })
        .collect()
}

/// Radar chart data: the form's radar subset, or every field
pub fn radar_points(kind: FormKind, payload: &Payload) -> Vec<ChartPoint> {
    let points = chart_points(kind, payload);
    let subset = kind.radar_fields();

    if subset.is_empty() {
        return points;
    }

    let registry = FieldRegistry::for_form(kind);
    subset
        .iter()
        .filter_map(|name| {
            let subject = short_subject(&registry.get(name)?.label);
            points.iter().find(|p| p.subject == subject).cloned()
        })
        .collect()
}

// ============================================================================
// SCREENING RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Pre-screenings: a percentage in [0, 100]
    Risk { percentage: f64, band: RiskBand },

    /// Detailed forms: a prediction label, with a band when it is known
    Label {
        prediction: String,
        severity: Option<RiskBand>,
    },
}

impl Outcome {
    /// Risk outcome; out-of-range percentages are clamped for display
    pub fn risk(percentage: f64) -> Self {
        let percentage = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Outcome::Risk {
            percentage,
            band: RiskBand::from_percentage(percentage),
        }
    }

    pub fn label(prediction: impl Into<String>, severity: Option<RiskBand>) -> Self {
        Outcome::Label {
            prediction: prediction.into(),
            severity,
        }
    }

    pub fn band(&self) -> Option<RiskBand> {
        match self {
            Outcome::Risk { band, .. } => Some(*band),
            Outcome::Label { severity, .. } => *severity,
        }
    }

    /// Headline of the result card
    pub fn headline(&self) -> String {
        match self {
            Outcome::Risk { percentage, band } => {
                format!("{:.1}% Risk Score - {} Risk", percentage, band.label())
            }
            Outcome::Label { prediction, .. } => prediction.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSource {
    /// Answered by the prediction API
    Remote,
    /// Computed on this machine
    Local,
}

/// ScreeningResult - what the result card, radar and bar chart show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub kind: FormKind,
    pub outcome: Outcome,
    pub chart: Vec<ChartPoint>,
    pub radar: Vec<ChartPoint>,
    pub source: ResultSource,
    pub computed_at: DateTime<Utc>,
}

impl ScreeningResult {
    pub fn new(kind: FormKind, outcome: Outcome, payload: &Payload, source: ResultSource) -> Self {
        ScreeningResult {
            kind,
            outcome,
            chart: chart_points(kind, payload),
            radar: radar_points(kind, payload),
            source,
            computed_at: Utc::now(),
        }
    }

    /// Plain-text card for the one-shot CLI
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.kind.title()));
        out.push_str(&format!("  Result: {}\n", self.outcome.headline()));
        if let Outcome::Risk { band, .. } = &self.outcome {
            out.push_str(&format!("  {}\n", band.message()));
        }
        for point in &self.chart {
            out.push_str(&format!(
                "  {:<24} {:>9} {:>6.1}% of max  {}\n",
                point.subject,
                point.value,
                point.percentage,
                point.status().label()
            ));
        }
        let source = match self.source {
            ResultSource::Remote => "prediction API",
            ResultSource::Local => "local estimate",
        };
        out.push_str(&format!(
            "  Source: {} at {}\n",
            source,
            self.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================
