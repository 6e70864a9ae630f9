use crate::errors::AppError;
use crate::models::{AnalyticsSnapshot, Client, PredictionResponse, SearchFilter};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Typed gateway to the prediction backend REST API.
///
/// One operation per resource, each a single best-effort round trip: no
/// retries, no caching, no batching. Non-success responses surface as
/// [`AppError::FetchFailed`] keyed by resource name; callers degrade to empty
/// or fallback states instead of propagating.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Creates a new `GatewayClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend API (e.g. `http://host:8080/api`).
    /// * `timeout` - Per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::FetchFailed {
                resource: "gateway",
                detail: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Lists the full client roster.
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let url = format!("{}/clients", self.base_url);
        tracing::info!("Fetching client roster: {}", url);
        self.get_json(&url, "clients").await
    }

    /// Searches clients by free-text query plus optional segment/region filters.
    ///
    /// Filtering lives server-side; the result list is rendered in API
    /// response order with no client-side re-filtering.
    pub async fn search_clients(&self, filter: &SearchFilter) -> Result<Vec<Client>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/clients/search", self.base_url),
            filter.to_query_params(),
        )
        .map_err(|e| AppError::FetchFailed {
            resource: "clients/search",
            detail: format!("failed to build URL: {}", e),
        })?;

        tracing::info!("Searching clients: {}", url);
        self.get_json(url.as_str(), "clients/search").await
    }

    /// Fetches one client by identifier. A 404 maps to [`AppError::NotFound`].
    pub async fn get_client(&self, id: &str) -> Result<Client, AppError> {
        let url = format!("{}/clients/{}", self.base_url, id);
        tracing::info!("Fetching client {}: {}", id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::FetchFailed {
                resource: "client",
                detail: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("client {}", id)));
        }
        if !response.status().is_success() {
            return Err(AppError::FetchFailed {
                resource: "client",
                detail: format!("status {}", response.status()),
            });
        }

        response.json().await.map_err(|e| AppError::InvalidResponse {
            resource: "client",
            detail: e.to_string(),
        })
    }

    /// Fetches the model-monitoring and business-metrics snapshot.
    pub async fn get_analytics(&self) -> Result<AnalyticsSnapshot, AppError> {
        let url = format!("{}/analytics", self.base_url);
        tracing::info!("Fetching analytics snapshot: {}", url);
        self.get_json(&url, "analytics").await
    }

    /// Requests an income prediction for a client.
    ///
    /// The response body is validated at this boundary: the interval must
    /// contain the point estimate and all amounts must be non-negative.
    pub async fn predict_income(
        &self,
        client_id: &str,
        features: serde_json::Value,
    ) -> Result<PredictionResponse, AppError> {
        let url = format!("{}/predict/income", self.base_url);
        tracing::info!("Requesting income prediction for client {}", client_id);

        let body = json!({
            "client_id": client_id,
            "features": features,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::FetchFailed {
                resource: "predict",
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AppError::FetchFailed {
                resource: "predict",
                detail: format!("status {}", response.status()),
            });
        }

        let prediction: PredictionResponse =
            response.json().await.map_err(|e| AppError::InvalidResponse {
                resource: "predict",
                detail: e.to_string(),
            })?;

        validate_prediction(&prediction)?;
        Ok(prediction)
    }

    /// Resolves the single best-match client for a free-text query.
    ///
    /// Returns the first element of the search result, or `Ok(None)` when the
    /// result list is empty. "No match" is never an error; transport and
    /// server failures still are. An empty query is rejected before any
    /// network call.
    pub async fn search_best_match(&self, query: &str) -> Result<Option<Client>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest(
                "Введите ID или имя клиента".to_string(),
            ));
        }

        let filter = SearchFilter {
            query: Some(query.to_string()),
            ..SearchFilter::default()
        };
        let mut results = self.search_clients(&filter).await?;
        if results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(results.remove(0)))
        }
    }

    /// Shared GET round trip translating failures into the error taxonomy.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        resource: &'static str,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::FetchFailed {
                resource,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("{} returned {}: {}", resource, status, error_text);
            return Err(AppError::FetchFailed {
                resource,
                detail: format!("status {}: {}", status, error_text),
            });
        }

        response.json().await.map_err(|e| AppError::InvalidResponse {
            resource,
            detail: e.to_string(),
        })
    }
}

/// Boundary validation of a backend prediction body.
fn validate_prediction(prediction: &PredictionResponse) -> Result<(), AppError> {
    let interval = prediction.confidence_interval;
    if prediction.predicted_income < 0.0 || interval.min < 0.0 || interval.max < 0.0 {
        return Err(AppError::InvalidResponse {
            resource: "predict",
            detail: "negative income amounts".to_string(),
        });
    }
    if interval.min > prediction.predicted_income || prediction.predicted_income > interval.max {
        return Err(AppError::InvalidResponse {
            resource: "predict",
            detail: format!(
                "interval [{}, {}] does not contain estimate {}",
                interval.min, interval.max, prediction.predicted_income
            ),
        });
    }
    if !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(AppError::InvalidResponse {
            resource: "predict",
            detail: format!("confidence {} outside [0, 1]", prediction.confidence),
        });
    }
    Ok(())
}
