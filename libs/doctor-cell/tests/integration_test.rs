use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::json;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use doctor_cell::models::{CreateDoctorRequest, UpdateDoctorRequest};
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockRestResponses, TestConfig};

async fn create_test_app(config: AppConfig) -> Router {
    doctor_routes(Arc::new(config))
}

fn test_config_for(mock_server: &MockServer) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.database_url = mock_server.uri();
    config
}

fn sample_create_request() -> CreateDoctorRequest {
    CreateDoctorRequest {
        name: "Dr. Sarah Johnson".to_string(),
        specialization: "Cardiology".to_string(),
        email: "sarah.johnson@hospital.test".to_string(),
        phone_number: "+15550100".to_string(),
        description: Some("Senior cardiologist".to_string()),
        visiting_start_time: "09:00:00".parse().unwrap(),
        visiting_end_time: "17:00:00".parse().unwrap(),
        consultation_fee: Some(150.0),
        is_available: None,
    }
}

#[tokio::test]
async fn test_list_doctors() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let first = Uuid::new_v4().to_string();
    let second = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&first),
            MockRestResponses::doctor_row_with_hours(&second, "10:00:00", "18:00:00"),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/?specialization=cardio&available=true")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(json_response["doctors"].is_array());
    assert_eq!(json_response["total"], 2);
}

#[tokio::test]
async fn test_get_doctor_success() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", doctor_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["id"], json!(doctor_id));
    assert_eq!(json_response["visiting_start_time"], json!("09:00:00"));
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", doctor_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_doctor_by_email() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.sarah.johnson@hospital.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/by-email/sarah.johnson%40hospital.test")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["id"], json!(doctor_id));
    assert_eq!(json_response["email"], json!("sarah.johnson@hospital.test"));
}

#[tokio::test]
async fn test_create_doctor_success() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    // Email uniqueness pre-check finds nothing
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.sarah.johnson@hospital.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&sample_create_request()).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["email"], json!("sarah.johnson@hospital.test"));
}

#[tokio::test]
async fn test_create_doctor_duplicate_email() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let existing_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.sarah.johnson@hospital.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&existing_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&sample_create_request()).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_doctor_rejects_inverted_visiting_window() {
    // Validation fails before any storage call, so no mocks are mounted
    let app = create_test_app(TestConfig::default().to_app_config()).await;

    let mut body = sample_create_request();
    body.visiting_start_time = "17:00:00".parse().unwrap();
    body.visiting_end_time = "09:00:00".parse().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_doctor_success() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let mut updated = MockRestResponses::doctor_row(&doctor_id);
    updated["consultation_fee"] = json!(175.0);
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .mount(&mock_server)
        .await;

    let request_body = UpdateDoctorRequest {
        name: None,
        specialization: None,
        email: None,
        phone_number: None,
        description: None,
        visiting_start_time: None,
        visiting_end_time: None,
        consultation_fee: Some(175.0),
        is_available: None,
    };

    let request = Request::builder()
        .method("PATCH")
        .uri(&format!("/{}", doctor_id))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["consultation_fee"], json!(175.0));
}

#[tokio::test]
async fn test_delete_doctor_blocked_by_active_appointments() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let appointment_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::appointment_row(&appointment_id, &doctor_id, "2030-06-01", "10:00:00", "pending")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(&format!("/{}", doctor_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_doctor_success() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(test_config_for(&mock_server)).await;

    let doctor_id = Uuid::new_v4().to_string();
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRestResponses::doctor_row(&doctor_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(&format!("/{}", doctor_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["message"], json!("Doctor removed from roster"));
}
