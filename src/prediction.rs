//! Prediction envelope builder.
//!
//! Prefers live backend data; when the gateway fails or no identifier is
//! available yet, synthesizes a deterministic placeholder envelope. The
//! placeholder figures are presentation stand-ins, not statistics, and every
//! envelope carries a provenance tag so views can disclose which kind the
//! user is looking at.

use crate::errors::AppError;
use crate::gateway_client::GatewayClient;
use crate::models::{
    ConfidenceInterval, Direction, FactorAttribution, PredictionEnvelope, PredictionResponse,
    ProductRecommendation, Provenance,
};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// Multiplier applied to a known current income for the placeholder estimate.
pub const FALLBACK_INCOME_RATIO: f64 = 1.34;
/// Confidence reported for placeholder envelopes.
pub const FALLBACK_CONFIDENCE: f64 = 0.85;
/// Lower interval bound as a ratio of the point estimate.
pub const INTERVAL_LOWER_RATIO: f64 = 0.9;
/// Upper interval bound as a ratio of the point estimate.
pub const INTERVAL_UPPER_RATIO: f64 = 1.1;
/// Point estimate used when the current income is unknown.
pub const DEFAULT_PREDICTED_INCOME: f64 = 255_000.0;

/// Interval paired with [`DEFAULT_PREDICTED_INCOME`].
const DEFAULT_INTERVAL: ConfidenceInterval = ConfidenceInterval {
    min: 229_500.0,
    max: 280_500.0,
};

/// Builds the envelope for display, falling back deterministically.
///
/// Never fails: a gateway error is logged and degrades to the placeholder
/// path, per the error-handling contract for transport failures.
pub async fn fetch_envelope(
    gateway: &GatewayClient,
    client_id: &str,
    current_income: Option<f64>,
) -> PredictionEnvelope {
    match gateway.predict_income(client_id, json!({})).await {
        Ok(response) => live_envelope(response),
        Err(e) => {
            tracing::warn!("Prediction for client {} unavailable: {}", client_id, e);
            placeholder_envelope(current_income)
        }
    }
}

/// Wraps a validated backend response verbatim, tagged as live data.
pub fn live_envelope(response: PredictionResponse) -> PredictionEnvelope {
    PredictionEnvelope {
        predicted_income: response.predicted_income,
        confidence: response.confidence,
        confidence_interval: response.confidence_interval,
        factors: response.factors,
        recommendations: response.recommendations,
        provenance: Provenance::Live,
        generated_at: Utc::now(),
    }
}

/// Synthesizes the placeholder envelope.
///
/// Interval bounds are exactly estimate × 0.9 and × 1.1 — a presentation
/// placeholder, not a statistical guarantee.
pub fn placeholder_envelope(current_income: Option<f64>) -> PredictionEnvelope {
    let (predicted_income, confidence_interval) = match current_income {
        Some(income) => {
            let estimate = income * FALLBACK_INCOME_RATIO;
            (
                estimate,
                ConfidenceInterval {
                    min: estimate * INTERVAL_LOWER_RATIO,
                    max: estimate * INTERVAL_UPPER_RATIO,
                },
            )
        }
        None => (DEFAULT_PREDICTED_INCOME, DEFAULT_INTERVAL),
    };

    PredictionEnvelope {
        predicted_income,
        confidence: FALLBACK_CONFIDENCE,
        confidence_interval,
        factors: vec!["возраст".to_string(), "кредитная история".to_string()],
        recommendations: vec![ProductRecommendation {
            product: "Кредитная карта".to_string(),
            reason: "Доход позволяет".to_string(),
        }],
        provenance: Provenance::Placeholder,
        generated_at: Utc::now(),
    }
}

/// Fixed factor attribution list shown by the explainer view.
pub fn factor_attributions() -> Vec<FactorAttribution> {
    let rows: [(&str, f64, &str, Direction); 5] = [
        ("Стаж работы", 23.0, "7+ лет", Direction::Positive),
        ("Высшее образование", 15.0, "Да", Direction::Positive),
        ("Регион", 12.0, "Москва", Direction::Positive),
        ("Возраст", -8.0, "35 лет", Direction::Negative),
        ("Кредитная история", 10.0, "Отличная", Direction::Positive),
    ];
    rows.into_iter()
        .map(|(feature, impact, value, direction)| FactorAttribution {
            feature: feature.to_string(),
            impact,
            value: value.to_string(),
            direction,
        })
        .collect()
}

/// Per-client refresh sequencing.
///
/// Re-triggering a prediction before a prior round trip resolves has no
/// defined winner at the transport level; tickets make the last *issued*
/// request win. Completions holding a superseded ticket are discarded so a
/// slow response can never overwrite newer state with stale data.
#[derive(Debug, Default)]
pub struct PredictionSession {
    latest: Mutex<HashMap<String, u64>>,
}

impl PredictionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket for a client, superseding any in-flight request.
    pub fn begin(&self, client_id: &str) -> u64 {
        // A poisoned map still holds valid tickets; recover instead of panicking.
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let ticket = latest.entry(client_id.to_string()).or_insert(0);
        *ticket += 1;
        *ticket
    }

    /// Whether a ticket is still the latest issued for its client.
    pub fn is_current(&self, client_id: &str, ticket: u64) -> bool {
        let latest = self
            .latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        latest.get(client_id).copied() == Some(ticket)
    }

    /// Fetches an envelope under a ticket; returns `None` when superseded.
    pub async fn refresh(
        &self,
        gateway: &GatewayClient,
        client_id: &str,
        current_income: Option<f64>,
    ) -> Option<PredictionEnvelope> {
        let ticket = self.begin(client_id);
        let envelope = fetch_envelope(gateway, client_id, current_income).await;
        if self.is_current(client_id, ticket) {
            Some(envelope)
        } else {
            tracing::debug!(
                "Discarding superseded prediction for client {} (ticket {})",
                client_id,
                ticket
            );
            None
        }
    }
}

/// Validation applied before issuing a prediction request from user input.
pub fn validate_client_id(client_id: &str) -> Result<(), AppError> {
    if client_id.trim().is_empty() {
        return Err(AppError::BadRequest("Введите ID клиента".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_scales_known_income() {
        let envelope = placeholder_envelope(Some(100_000.0));
        assert_eq!(envelope.predicted_income, 100_000.0 * FALLBACK_INCOME_RATIO);
        assert_eq!(
            envelope.confidence_interval.min,
            envelope.predicted_income * INTERVAL_LOWER_RATIO
        );
        assert_eq!(
            envelope.confidence_interval.max,
            envelope.predicted_income * INTERVAL_UPPER_RATIO
        );
        assert_eq!(envelope.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(envelope.provenance, Provenance::Placeholder);
    }

    #[test]
    fn placeholder_uses_fixed_default_when_income_unknown() {
        let envelope = placeholder_envelope(None);
        assert_eq!(envelope.predicted_income, 255_000.0);
        assert_eq!(envelope.confidence_interval.min, 229_500.0);
        assert_eq!(envelope.confidence_interval.max, 280_500.0);
        assert_eq!(envelope.provenance, Provenance::Placeholder);
    }

    #[test]
    fn placeholder_carries_fixed_factors_and_recommendation() {
        let envelope = placeholder_envelope(Some(50_000.0));
        assert_eq!(envelope.factors, vec!["возраст", "кредитная история"]);
        assert_eq!(envelope.recommendations.len(), 1);
        assert_eq!(envelope.recommendations[0].product, "Кредитная карта");
    }

    #[test]
    fn attributions_are_ordered_and_signed() {
        let attributions = factor_attributions();
        assert_eq!(attributions.len(), 5);
        assert_eq!(attributions[0].feature, "Стаж работы");
        assert_eq!(attributions[0].impact, 23.0);
        assert_eq!(attributions[3].direction, Direction::Negative);
        assert!(attributions[3].impact < 0.0);
    }

    #[test]
    fn session_tickets_increase_per_client() {
        let session = PredictionSession::new();
        let first = session.begin("12345");
        let second = session.begin("12345");
        let other = session.begin("99999");
        assert!(second > first);
        assert_eq!(other, 1);
        assert!(!session.is_current("12345", first));
        assert!(session.is_current("12345", second));
        assert!(session.is_current("99999", other));
    }

    #[test]
    fn session_survives_poisoned_lock() {
        let session = PredictionSession::new();
        let first = session.begin("12345");

        // Poison the ticket map by panicking while holding its lock.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = session.latest.lock().unwrap();
            panic!("poison");
        }));
        assert!(result.is_err());

        let second = session.begin("12345");
        assert!(second > first);
        assert!(session.is_current("12345", second));
        assert!(!session.is_current("12345", first));
    }

    #[test]
    fn empty_client_id_rejected_before_network() {
        assert!(validate_client_id("  ").is_err());
        assert!(validate_client_id("12345").is_ok());
    }
}
