// Health Screening - Core Library
// Exposes all modules for use in the TUI, the CLI, the prediction server and tests

pub mod error;
pub mod fields;
pub mod validation;
pub mod forms;
pub mod risk;
pub mod scoring;
pub mod client;
pub mod config;
pub mod predictor;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::{ScreeningError, ValidationError};
pub use fields::{FieldDefinition, FieldRegistry};
pub use validation::{parse_number, validate_field, validate_submission, Payload};
pub use forms::{FormKind, FormState, PredictionSource, Route};
pub use risk::{ChartPoint, MetricStatus, Outcome, ResultSource, RiskBand, ScreeningResult};
pub use scoring::{CoinFlip, CriteriaModel, RiskModel};
pub use client::{PredictionClient, PredictionResponse};
pub use config::{Config, PredictionMode};
pub use predictor::Predictor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
