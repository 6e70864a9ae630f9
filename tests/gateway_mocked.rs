/// Integration tests with a mocked backend API
/// Tests the gateway contract without hitting a real prediction service
use alphapredict_dash::errors::AppError;
use alphapredict_dash::gateway_client::GatewayClient;
use alphapredict_dash::models::{SearchFilter, Segment};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a gateway pointed at a mock server
fn gateway_for(server: &MockServer) -> GatewayClient {
    GatewayClient::new(format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

fn client_json(id: &str, name: &str, income: f64, segment: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "income": income,
        "segment": segment,
        "score": 7.5,
        "region": "Москва"
    })
}

#[tokio::test]
async fn list_clients_returns_typed_roster() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!([
        client_json("12345", "Иванов Иван Иванович", 127500.0, "Премиум"),
        client_json("12346", "Петрова Мария Сергеевна", 89200.0, "Стандарт"),
    ]);

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let clients = gateway.list_clients().await.unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].id, "12345");
    assert_eq!(clients[0].segment, Segment::Premium);
    assert_eq!(clients[1].segment, Segment::Standard);
}

#[tokio::test]
async fn list_clients_server_error_is_fetch_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.list_clients().await;

    match result {
        Err(AppError::FetchFailed { resource, .. }) => assert_eq!(resource, "clients"),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn search_passes_filters_and_omits_all_values() {
    let mock_server = MockServer::start().await;

    // "all" segment must be dropped from the outgoing request
    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .and(query_param("q", "Иванов"))
        .and(query_param("region", "Москва"))
        .and(query_param_is_missing("segment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            client_json("12345", "Иванов Иван Иванович", 127500.0, "Премиум")
        ])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let filter = SearchFilter {
        query: Some("Иванов".to_string()),
        segment: Some("all".to_string()),
        region: Some("Москва".to_string()),
    };
    let clients = gateway.search_clients(&filter).await.unwrap();

    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Иванов Иван Иванович");
}

#[tokio::test]
async fn search_empty_result_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let filter = SearchFilter {
        query: Some("Нет такого".to_string()),
        ..SearchFilter::default()
    };
    let clients = gateway.search_clients(&filter).await.unwrap();
    assert!(clients.is_empty());
}

#[tokio::test]
async fn get_client_not_found_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/99999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "Client not found"
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.get_client("99999").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn get_client_success_returns_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/12345"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(client_json("12345", "Иванов Иван Иванович", 100000.0, "Премиум")),
        )
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let client = gateway.get_client("12345").await.unwrap();

    assert_eq!(client.id, "12345");
    assert_eq!(client.income, 100000.0);
    assert_eq!(client.segment, Segment::Premium);
}

#[tokio::test]
async fn get_analytics_returns_snapshot() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "model_performance": {"accuracy": 91.0, "precision": 88.0, "recall": 90.0},
        "segmentation": [
            {"segment": "VIP", "count": 120, "percentage": 12.0},
            {"segment": "Премиум", "count": 380, "percentage": 38.0}
        ],
        "business_metrics": {"conversion_rate": 24.0, "average_ticket": 85430.0, "roi": 156.0}
    });

    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let snapshot = gateway.get_analytics().await.unwrap();

    assert_eq!(snapshot.model_performance.accuracy, 91.0);
    assert_eq!(snapshot.segmentation.len(), 2);
    assert_eq!(snapshot.segmentation[0].segment, Segment::Vip);
    assert_eq!(snapshot.business_metrics.conversion_rate, 24.0);
}

#[tokio::test]
async fn predict_income_posts_client_id_and_features() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "predicted_income": 255000.0,
        "confidence": 0.85,
        "confidence_interval": {"min": 229500.0, "max": 280500.0},
        "factors": ["возраст", "кредитная история"],
        "recomendations": [{"product": "Кредитная карта", "reason": "Доход позволяет"}]
    });

    Mock::given(method("POST"))
        .and(path("/api/predict/income"))
        .and(body_partial_json(serde_json::json!({"client_id": "12345"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let prediction = gateway
        .predict_income("12345", serde_json::json!({}))
        .await
        .unwrap();

    assert_eq!(prediction.predicted_income, 255000.0);
    assert_eq!(prediction.factors.len(), 2);
    assert_eq!(prediction.recommendations[0].product, "Кредитная карта");
}

#[tokio::test]
async fn predict_income_rejects_interval_missing_estimate() {
    let mock_server = MockServer::start().await;

    // Estimate outside its own interval violates the backend contract
    let body = serde_json::json!({
        "predicted_income": 400000.0,
        "confidence": 0.85,
        "confidence_interval": {"min": 229500.0, "max": 280500.0},
        "factors": [],
        "recomendations": []
    });

    Mock::given(method("POST"))
        .and(path("/api/predict/income"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.predict_income("12345", serde_json::json!({})).await;

    assert!(matches!(
        result,
        Err(AppError::InvalidResponse {
            resource: "predict",
            ..
        })
    ));
}

#[tokio::test]
async fn best_match_returns_first_element() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .and(query_param("q", "Иванов"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            client_json("12345", "Иванов Иван Иванович", 127500.0, "Премиум"),
            client_json("12399", "Иванова Анна Петровна", 64000.0, "Стандарт"),
        ])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let best = gateway.search_best_match("Иванов").await.unwrap();

    assert_eq!(best.unwrap().id, "12345");
}

#[tokio::test]
async fn best_match_empty_result_is_explicit_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let best = gateway.search_best_match("Нет такого").await.unwrap();

    assert!(best.is_none());
}

#[tokio::test]
async fn best_match_empty_query_never_hits_network() {
    let mock_server = MockServer::start().await;

    // Expect zero requests; validation must fire before the round trip
    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.search_best_match("   ").await;

    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Введите ID или имя клиента"),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn best_match_server_failure_still_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.search_best_match("Иванов").await;

    assert!(matches!(result, Err(AppError::FetchFailed { .. })));
}

#[tokio::test]
async fn unknown_segment_label_rejected_at_boundary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            client_json("1", "Тест", 10000.0, "Gold")
        ])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.list_clients().await;

    assert!(matches!(
        result,
        Err(AppError::InvalidResponse {
            resource: "clients",
            ..
        })
    ));
}

#[tokio::test]
async fn concurrent_gateway_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(10)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);

    // Fire 10 concurrent requests; each is an independent round trip
    let mut handles = vec![];
    for _ in 0..10 {
        let gateway = gateway.clone();
        handles.push(tokio::spawn(async move { gateway.list_clients().await }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }
}
