//! Analytics snapshot presentation policy.
//!
//! Fetches the model-monitoring snapshot with a static fallback when the
//! endpoint fails, and picks qualitative messages by fixed thresholds. The
//! thresholds are presentation policy, not computed statistics, and live in
//! [`Thresholds`] so deployments can tune them.

use crate::gateway_client::GatewayClient;
use crate::models::{
    AnalyticsSnapshot, BusinessMetrics, ModelPerformance, Provenance, Segment, SegmentShare,
};

/// Threshold constants driving qualitative messaging.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Accuracy above this reads as "model stable".
    pub accuracy_stable: f64,
    /// Conversion rate above this reads as "good".
    pub conversion_good: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            accuracy_stable: 85.0,
            conversion_good: 20.0,
        }
    }
}

/// Fetches the snapshot, degrading to the static fallback on failure.
///
/// The provenance tag tells the view whether the figures are backend data.
pub async fn fetch_snapshot(gateway: &GatewayClient) -> (AnalyticsSnapshot, Provenance) {
    match gateway.get_analytics().await {
        Ok(snapshot) => (snapshot, Provenance::Live),
        Err(e) => {
            tracing::warn!("Analytics snapshot unavailable: {}", e);
            (fallback_snapshot(), Provenance::Placeholder)
        }
    }
}

/// Static placeholder snapshot rendered when the analytics endpoint fails.
pub fn fallback_snapshot() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        model_performance: ModelPerformance {
            accuracy: 87.5,
            precision: 85.2,
            recall: 89.1,
        },
        segmentation: Segment::ALL
            .into_iter()
            .map(|segment| SegmentShare {
                segment,
                count: 0,
                percentage: 0.0,
            })
            .collect(),
        business_metrics: BusinessMetrics {
            conversion_rate: 0.0,
            average_ticket: 0.0,
            roi: 0.0,
        },
    }
}

/// Qualitative model-health message chosen by the accuracy threshold.
pub fn model_health_message(performance: &ModelPerformance, thresholds: &Thresholds) -> &'static str {
    if performance.accuracy > thresholds.accuracy_stable {
        "Модель стабильна. Дрифт данных не обнаружен за последние 30 дней."
    } else {
        "Требуется дообучение модели. Рекомендуется проверить данные."
    }
}

/// Qualitative conversion-rate message chosen by the conversion threshold.
pub fn conversion_message(metrics: &BusinessMetrics, thresholds: &Thresholds) -> &'static str {
    if metrics.conversion_rate > thresholds.conversion_good {
        "+5.2% к прошлому месяцу"
    } else {
        "Требуется оптимизация"
    }
}
