// Predictor - picks the API or a local rule for each form
// Remote answers are consumed optimistically: whichever of risk_percentage
// or prediction is present wins

use crate::client::{PredictionClient, PredictionResponse};
use crate::config::{Config, PredictionMode};
use crate::error::{Result, ScreeningError, API_FALLBACK_MESSAGE};
use crate::forms::{FormKind, PredictionSource};
use crate::risk::{Outcome, ResultSource, RiskBand, ScreeningResult};
use crate::scoring::{self, CoinFlip};
use crate::validation::Payload;
use tracing::{info, instrument};

pub struct Predictor {
    mode: PredictionMode,
    client: PredictionClient,
    coin: CoinFlip,
}

impl Predictor {
    pub fn new(mode: PredictionMode, client: PredictionClient, seed: Option<u64>) -> Self {
        Predictor {
            mode,
            client,
            coin: CoinFlip::new(seed),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = PredictionClient::new(config.api.base_url.clone(), config.api.timeout())?;
        Ok(Self::new(config.prediction.mode, client, config.prediction.seed))
    }

    pub fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Source actually used for a form under the current mode
    pub fn effective_source(&self, kind: FormKind) -> PredictionSource {
        match self.mode {
            PredictionMode::Default => kind.prediction_source(),
            PredictionMode::Remote => PredictionSource::Remote,
            PredictionMode::Local => match kind.prediction_source() {
                PredictionSource::Remote => PredictionSource::Rules,
                other => other,
            },
        }
    }

    #[instrument(skip(self, payload), fields(form = kind.endpoint()))]
    pub async fn predict(&mut self, kind: FormKind, payload: &Payload) -> Result<ScreeningResult> {
        let (outcome, source) = match self.effective_source(kind) {
            PredictionSource::Remote => {
                let response = self.client.predict(kind, payload).await?;
                (outcome_from_response(kind, &response)?, ResultSource::Remote)
            }
            PredictionSource::Rules => (scoring::evaluate(kind, payload), ResultSource::Local),
            PredictionSource::Average => {
                (scoring::symptom_average_outcome(payload), ResultSource::Local)
            }
            PredictionSource::CoinFlip => {
                let outcome = self
                    .coin
                    .flip(kind)
                    .ok_or_else(|| ScreeningError::UnknownForm(kind.endpoint().to_string()))?;
                (outcome, ResultSource::Local)
            }
        };

        info!(headline = %outcome.headline(), ?source, "screening result");
        Ok(ScreeningResult::new(kind, outcome, payload, source))
    }
}

/// Turn an API body into an outcome
pub fn outcome_from_response(kind: FormKind, response: &PredictionResponse) -> Result<Outcome> {
    if let Some(percentage) = response.risk_percentage {
        return Ok(Outcome::risk(percentage));
    }

    if let Some(prediction) = &response.prediction {
        let severity = scoring::label_severity(kind, prediction).or_else(|| {
            response
                .risk_level
                .as_deref()
                .and_then(RiskBand::from_label)
        });
        return Ok(Outcome::label(prediction.clone(), severity));
    }

    Err(ScreeningError::Api(
        response
            .error
            .clone()
            .unwrap_or_else(|| API_FALLBACK_MESSAGE.to_string()),
    ))
}
