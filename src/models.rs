use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Segments ============

/// Client tier segment.
///
/// The backend transmits segments as localized display strings; this enum is
/// the closed set behind those labels so that styling and filtering match on
/// variants instead of string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Segment {
    Vip,
    Premium,
    Standard,
    Base,
}

impl Segment {
    /// All segments, ordered from the highest tier down.
    pub const ALL: [Segment; 4] = [
        Segment::Vip,
        Segment::Premium,
        Segment::Standard,
        Segment::Base,
    ];

    /// Registered display label, as transmitted on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Vip => "VIP",
            Segment::Premium => "Премиум",
            Segment::Standard => "Стандарт",
            Segment::Base => "Базовый",
        }
    }

    /// Badge marker used by the text views for conditional styling.
    pub fn badge(&self) -> &'static str {
        match self {
            Segment::Vip => "★★★",
            Segment::Premium => "★★",
            Segment::Standard => "★",
            Segment::Base => "·",
        }
    }

    /// Classifies an income amount into a segment.
    ///
    /// Thresholds mirror the backend's segmentation rules.
    pub fn from_income(income: f64) -> Segment {
        if income >= 150_000.0 {
            Segment::Vip
        } else if income >= 100_000.0 {
            Segment::Premium
        } else if income >= 50_000.0 {
            Segment::Standard
        } else {
            Segment::Base
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Segment {
    type Error = String;

    /// Parses a wire label into a segment.
    ///
    /// Unknown labels are rejected at the gateway boundary rather than
    /// silently mapped to a default tier.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "VIP" => Ok(Segment::Vip),
            "Премиум" => Ok(Segment::Premium),
            "Стандарт" => Ok(Segment::Standard),
            "Базовый" => Ok(Segment::Base),
            other => Err(format!("unknown segment label: {:?}", other)),
        }
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> String {
        segment.label().to_string()
    }
}

// ============ Clients ============

/// A client record as returned by the backend.
///
/// Read-only, request-scoped copy; the backend owns the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Current income in currency units, non-negative.
    pub income: f64,
    /// Tier segment.
    pub segment: Segment,
    /// Credit score on a 0..10 scale.
    pub score: f64,
    /// Free-text region label.
    pub region: String,
    /// Age in years, when known.
    #[serde(default)]
    pub age: Option<u32>,
    /// Education level, when known.
    #[serde(default)]
    pub education: Option<String>,
    /// Years of work experience, when known.
    #[serde(default)]
    pub experience: Option<u32>,
    /// Marital status, when known.
    #[serde(default, rename = "maritalStatus")]
    pub marital_status: Option<String>,
}

/// Filter options for the client search operation.
///
/// `segment`/`region` values of `"all"` mean "no filter" and are omitted from
/// the outgoing request, matching the behavior of the directory view.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub query: Option<String>,
    pub segment: Option<String>,
    pub region: Option<String>,
}

impl SearchFilter {
    /// Builds the outgoing query parameters, dropping empty and `"all"` values.
    pub fn to_query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(q) = self.query.as_deref() {
            if !q.is_empty() {
                params.push(("q", q));
            }
        }
        if let Some(segment) = self.segment.as_deref() {
            if !segment.is_empty() && segment != "all" {
                params.push(("segment", segment));
            }
        }
        if let Some(region) = self.region.as_deref() {
            if !region.is_empty() && region != "all" {
                params.push(("region", region));
            }
        }
        params
    }
}

// ============ Predictions ============

/// Confidence interval bounds around a point estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub min: f64,
    pub max: f64,
}

/// A recommended product with a free-text rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecommendation {
    /// Product label.
    pub product: String,
    /// Why the product is recommended.
    pub reason: String,
}

/// Wire format of the backend's income prediction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted income point estimate.
    pub predicted_income: f64,
    /// Model confidence as a fraction in [0, 1].
    pub confidence: f64,
    /// Interval bounds; expected to contain the point estimate.
    pub confidence_interval: ConfidenceInterval,
    /// Human-readable contributing factors.
    pub factors: Vec<String>,
    /// Recommended products. The backend spells the field "recomendations".
    #[serde(rename = "recomendations")]
    pub recommendations: Vec<ProductRecommendation>,
}

/// Marker distinguishing backend-sourced data from locally synthesized
/// placeholder data. Required output of the envelope builder so that views
/// can disclose data provenance to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Placeholder,
}

impl Provenance {
    /// Disclosure label shown next to the prediction.
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Live => "Реальные данные",
            Provenance::Placeholder => "Моковые данные",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live)
    }
}

/// The presented prediction bundle: point estimate, interval, factors and
/// recommendations, tagged with data provenance.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionEnvelope {
    pub predicted_income: f64,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub factors: Vec<String>,
    pub recommendations: Vec<ProductRecommendation>,
    /// Whether the figures came from the backend or were synthesized locally.
    pub provenance: Provenance,
    /// When the envelope was built.
    pub generated_at: DateTime<Utc>,
}

impl PredictionEnvelope {
    /// Relative change of the prediction against a known current income, in percent.
    pub fn uplift_percent(&self, current_income: f64) -> f64 {
        if current_income == 0.0 {
            return 0.0;
        }
        (self.predicted_income - current_income) / current_income * 100.0
    }
}

/// Direction of a factor's influence on the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

/// A single SHAP-style factor attribution for the explainer view.
#[derive(Debug, Clone, Serialize)]
pub struct FactorAttribution {
    /// Feature label.
    pub feature: String,
    /// Signed percentage impact on the prediction.
    pub impact: f64,
    /// Display value of the feature for this client.
    pub value: String,
    pub direction: Direction,
}

// ============ Segment comparison ============

/// Reference income figures positioning a client within their segment.
///
/// Derived from the client's own income by fixed ratios; explicitly not a
/// population statistic.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentComparison {
    /// The client's own figure.
    pub client_income: f64,
    /// Fixed-ratio stand-in for the segment average.
    pub segment_average: f64,
    /// Fixed-ratio stand-in for the segment top.
    pub segment_top: f64,
    /// Percentile-rank label, placeholder text.
    pub percentile_label: String,
}

// ============ Analytics ============

/// Model-quality metrics, each a percentage in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

/// One slice of the segmentation breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentShare {
    pub segment: Segment,
    pub count: u64,
    /// Share of the roster in [0, 100]. Shares should sum to ~100 across the
    /// set but this is not enforced.
    pub percentage: f64,
}

/// Business metrics with display-only semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub conversion_rate: f64,
    pub average_ticket: f64,
    pub roi: f64,
}

/// The analytics page payload: model quality, segmentation and business metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub model_performance: ModelPerformance,
    pub segmentation: Vec<SegmentShare>,
    pub business_metrics: BusinessMetrics,
}
