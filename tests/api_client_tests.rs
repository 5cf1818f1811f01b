use serde_json::json;
use wayfarer::api::{ApiClient, ApiError, SpotQuery, UserQuery};
use wayfarer::models::{ProfileUpdate, UserRole};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

/// Canonical-shaped user document
fn user_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": "ava@example.com",
        "full_name": "Ava Example",
        "role": "tourist",
        "is_active": true
    })
}

/// Canonical-shaped spot document
fn spot_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "A quiet cove",
        "status": "approved",
        "rating": 4.0,
        "total_ratings": 12,
        "location": {"latitude": 27.7, "longitude": 85.3, "address": "12 Harbor Road"}
    })
}

// ============================================================================
// Auth Calls
// ============================================================================

#[tokio::test]
async fn test_login_sends_form_and_normalizes_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("email=ava%40example.com"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T",
            "token_type": "bearer",
            "user": user_json("1")
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let session = client.login("ava@example.com", "secret").await.unwrap();

    assert_eq!(session.access_token, "T");
    assert_eq!(session.user.id, "1");
    assert_eq!(session.user.role, UserRole::Tourist);
}

#[tokio::test]
async fn test_login_missing_token_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json("1")
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let result = client.login("ava@example.com", "secret").await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_bearer_token_attached_once_installed() {
    let mock_server = MockServer::start().await;

    // The mock only matches when the Authorization header is present, so a
    // successful call proves the token went out with the request.
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("1")))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    client.set_token("T").await;
    let user = client.me().await.unwrap();

    assert_eq!(user.id, "1");
}

// ============================================================================
// Response Normalization
// ============================================================================

#[tokio::test]
async fn test_spot_list_unwraps_data_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tourist-spots/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [spot_json("s1", "Hidden Cove"), spot_json("s2", "High Pass")]
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let spots = client.list_spots(&SpotQuery::default()).await.unwrap();

    assert_eq!(spots.len(), 2);
    assert_eq!(spots[0].name, "Hidden Cove");
}

#[tokio::test]
async fn test_spot_list_accepts_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tourist-spots/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([spot_json("s1", "Hidden Cove")])),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let spots = client.list_spots(&SpotQuery::default()).await.unwrap();

    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].id, "s1");
}

#[tokio::test]
async fn test_legacy_package_document_normalizes() {
    let mock_server = MockServer::start().await;

    // Mongo-era documents: `_id`, `title`, `group_size`, split coordinates
    Mock::given(method("GET"))
        .and(path("/tour-packages/p9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "p9",
            "title": "Island Hop",
            "description": "Three islands in three days",
            "price": 999.5,
            "duration_days": 3,
            "group_size": 12,
            "latitude": 4.1,
            "longitude": 73.5,
            "address": "Main Jetty",
            "included_spots": ["North Isle", "South Isle"],
            "rating": 4.5,
            "created_by": "c1"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let package = client.get_package("p9").await.unwrap();

    assert_eq!(package.id, "p9");
    assert_eq!(package.name, "Island Hop");
    assert_eq!(package.max_participants, 12);
    assert_eq!(package.location.latitude, 4.1);
    assert_eq!(package.location.address, "Main Jetty");
    assert_eq!(package.destinations, vec!["North Isle", "South Isle"]);
    assert_eq!(package.average_rating, 4.5);
    assert_eq!(package.travel_company_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_available_dates_collapse_to_distinct_days() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tour-packages/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "name": "Island Hop",
            "price": 100.0,
            "available_dates": [
                "2025-07-01T08:00:00",
                "2025-07-01T15:30:00",
                "2025-07-02"
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let package = client.get_package("p1").await.unwrap();

    assert_eq!(package.available_dates.len(), 2);
    assert_eq!(
        package.available_dates[0].to_rfc3339(),
        "2025-07-01T00:00:00+00:00"
    );
    assert_eq!(
        package.available_dates[1].to_rfc3339(),
        "2025-07-02T00:00:00+00:00"
    );
}

#[tokio::test]
async fn test_booking_mutation_envelope_unwraps() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/bookings/b1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Booking cancelled successfully",
            "booking": {
                "id": "b1",
                "tourist_id": "1",
                "tour_package_id": "p1",
                "number_of_people": 2,
                "total_price": 3000.0,
                "status": "cancelled"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let booking = client.cancel_booking("b1").await.unwrap();

    assert_eq!(booking.id, "b1");
    assert_eq!(booking.participants_count, 2);
    assert_eq!(booking.total_amount, 3000.0);
    assert_eq!(booking.status, wayfarer::models::BookingStatus::Cancelled);
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_http_error_carries_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tour-packages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Tour package not found"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let err = client.get_package("missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Tour package not found");
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error() {
    // Nothing listens on port 1.
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.get_package("p1").await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        err.user_message(),
        "Network error. Please check your connection and try again."
    );
}

// ============================================================================
// Request Shapes
// ============================================================================

#[tokio::test]
async fn test_spot_query_params_serialized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tourist-spots/"))
        .and(query_param("search", "beach"))
        .and(query_param("categories", "nature"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let query = SpotQuery {
        search: Some("beach".to_string()),
        category: Some("nature".to_string()),
        limit: Some(5),
        ..SpotQuery::default()
    };
    let spots = client.list_spots(&query).await.unwrap();

    assert!(spots.is_empty());
}

#[tokio::test]
async fn test_profile_update_sends_only_present_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"full_name": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let update = ProfileUpdate {
        full_name: Some("Renamed".to_string()),
        ..ProfileUpdate::default()
    };
    client.update_profile("1", &update).await.unwrap();
}

#[tokio::test]
async fn test_set_user_active_sends_flag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/users/u1/status"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "User deactivated"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    client.set_user_active("u1", false).await.unwrap();
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tour-packages/p1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    assert!(client.delete_package("p1").await.is_ok());
}

#[tokio::test]
async fn test_admin_users_returns_reported_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user_json("1"), user_json("2")],
            "total": 40
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    let (users, total) = client.admin_users(&UserQuery::default()).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(total, 40);
}

#[tokio::test]
async fn test_health_check_reads_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Healthy"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri());
    assert_eq!(client.health_check().await.unwrap(), "Healthy");
}
