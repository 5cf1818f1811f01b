//! # API Client
//!
//! Thin reqwest wrapper over the booking platform's REST API. Every call
//! returns `Result<T, ApiError>`: the caller always sees either canonical
//! data (normalized in [`super::types`]) or a classified failure. The client
//! holds the bearer token for the current session and attaches it to every
//! request while one is installed.
//!
//! No retries, no request queueing, no de-duplication. Each call is
//! independent; coordination between calls belongs to the store layer.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::types::{
    self, LoginSession, PackageQuery, SpotQuery, UserQuery,
};
use crate::models::{
    Booking, BookingDraft, BookingStatus, BookingSummary, NewUser, PackageDraft, ProfileUpdate,
    Rating, RatingDraft, SpotDraft, SpotRating, SpotRatingDraft, TourPackage, TouristSpot, User,
};

/// Errors surfaced by API calls.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, dropped mid-body).
    Network(String),
    /// The server answered with a non-success status. `message` is the body's
    /// `detail`/`message` field when present, else the raw body.
    Http { status: u16, message: String },
    /// The response body was not the JSON shape we expected.
    Decode(String),
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Display copy for screens: network and decode failures get generic
    /// wording, server messages pass through.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Decode(_) => {
                "Received an unexpected response from the server.".to_string()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Http { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct BookingStatusRequest {
    status: BookingStatus,
}

#[derive(Serialize)]
struct UserStatusRequest {
    is_active: bool,
}

/// HTTP client for the booking platform API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Installs the bearer token attached to subsequent requests.
    pub async fn set_token(&self, token: &str) {
        *self.token.write().await = Some(token.to_string());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request (with the bearer token when installed), classifies
    /// failures, and parses the body as JSON. Empty bodies become `Null`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.token.read().await.as_ref() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("API response: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            warn!("API error: {} - {}", status, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ===== Auth =====

    /// Form-encoded credential exchange.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, ApiError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("password", password)]);
        types::login_from_value(self.send(request).await?)
    }

    pub async fn signup(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let request = self.http.post(self.url("/auth/signup")).json(new_user);
        types::user_from_value(self.send(request).await?)
    }

    /// Exchanges the current token for a fresh one.
    pub async fn refresh(&self) -> Result<LoginSession, ApiError> {
        let request = self.http.post(self.url("/auth/refresh"));
        types::login_from_value(self.send(request).await?)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let request = self.http.get(self.url("/auth/me"));
        types::user_from_value(self.send(request).await?)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url("/auth/change-password"))
            .json(&ChangePasswordRequest {
                old_password,
                new_password,
            });
        self.send(request).await?;
        Ok(())
    }

    // ===== Tourist spots =====

    pub async fn list_spots(&self, query: &SpotQuery) -> Result<Vec<TouristSpot>, ApiError> {
        let request = self
            .http
            .get(self.url("/tourist-spots/"))
            .query(&query.to_params());
        types::spots_from_value(self.send(request).await?)
    }

    pub async fn search_spots(&self, term: &str) -> Result<Vec<TouristSpot>, ApiError> {
        let request = self
            .http
            .get(self.url("/tourist-spots/search"))
            .query(&[("q", term)]);
        types::spots_from_value(self.send(request).await?)
    }

    pub async fn get_spot(&self, id: &str) -> Result<TouristSpot, ApiError> {
        let request = self.http.get(self.url(&format!("/tourist-spots/{id}")));
        types::spot_from_value(self.send(request).await?)
    }

    pub async fn create_spot(&self, draft: &SpotDraft) -> Result<TouristSpot, ApiError> {
        let request = self
            .http
            .post(self.url("/tourist-spots/company/add"))
            .json(draft);
        types::spot_from_value(self.send(request).await?)
    }

    pub async fn my_spots(&self) -> Result<Vec<TouristSpot>, ApiError> {
        let request = self.http.get(self.url("/tourist-spots/company/my-spots"));
        types::spots_from_value(self.send(request).await?)
    }

    pub async fn update_spot(
        &self,
        id: &str,
        draft: &SpotDraft,
    ) -> Result<TouristSpot, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/tourist-spots/company/{id}")))
            .json(draft);
        types::spot_from_value(self.send(request).await?)
    }

    pub async fn delete_spot(&self, id: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.url(&format!("/tourist-spots/company/{id}")));
        self.send(request).await?;
        Ok(())
    }

    pub async fn pending_spots(&self) -> Result<Vec<TouristSpot>, ApiError> {
        let request = self.http.get(self.url("/admin/tourist-spots/pending"));
        types::spots_from_value(self.send(request).await?)
    }

    pub async fn approve_spot(&self, id: &str) -> Result<TouristSpot, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/admin/tourist-spots/{id}/approve")));
        types::spot_from_value(self.send(request).await?)
    }

    pub async fn reject_spot(&self, id: &str) -> Result<TouristSpot, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/admin/tourist-spots/{id}/reject")));
        types::spot_from_value(self.send(request).await?)
    }

    pub async fn rate_spot(
        &self,
        spot_id: &str,
        draft: &SpotRatingDraft,
    ) -> Result<SpotRating, ApiError> {
        let request = self
            .http
            .post(self.url(&format!("/tourist-spots/{spot_id}/rating")))
            .json(draft);
        types::spot_rating_from_value(self.send(request).await?)
    }

    pub async fn spot_ratings(&self, spot_id: &str) -> Result<Vec<SpotRating>, ApiError> {
        let request = self
            .http
            .get(self.url(&format!("/tourist-spots/{spot_id}/ratings")));
        types::spot_ratings_from_value(self.send(request).await?)
    }

    // ===== Tour packages =====

    pub async fn list_packages(
        &self,
        query: &PackageQuery,
    ) -> Result<Vec<TourPackage>, ApiError> {
        let request = self
            .http
            .get(self.url("/tour-packages/"))
            .query(&query.to_params());
        types::packages_from_value(self.send(request).await?)
    }

    pub async fn get_package(&self, id: &str) -> Result<TourPackage, ApiError> {
        let request = self.http.get(self.url(&format!("/tour-packages/{id}")));
        types::package_from_value(self.send(request).await?)
    }

    pub async fn create_package(&self, draft: &PackageDraft) -> Result<TourPackage, ApiError> {
        let request = self.http.post(self.url("/tour-packages/")).json(draft);
        types::package_from_value(self.send(request).await?)
    }

    pub async fn update_package(
        &self,
        id: &str,
        draft: &PackageDraft,
    ) -> Result<TourPackage, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/tour-packages/{id}")))
            .json(draft);
        types::package_from_value(self.send(request).await?)
    }

    pub async fn delete_package(&self, id: &str) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/tour-packages/{id}")));
        self.send(request).await?;
        Ok(())
    }

    pub async fn company_packages(
        &self,
        company_id: &str,
    ) -> Result<Vec<TourPackage>, ApiError> {
        let request = self
            .http
            .get(self.url(&format!("/tour-packages/company/{company_id}")));
        types::packages_from_value(self.send(request).await?)
    }

    // ===== Bookings =====

    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, ApiError> {
        let request = self.http.get(self.url(&format!("/bookings/user/{user_id}")));
        types::bookings_from_value(self.send(request).await?)
    }

    pub async fn company_bookings(&self) -> Result<Vec<BookingSummary>, ApiError> {
        let request = self.http.get(self.url("/bookings/company"));
        types::booking_summaries_from_value(self.send(request).await?)
    }

    pub async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, ApiError> {
        let request = self.http.post(self.url("/bookings/")).json(draft);
        types::booking_from_value(self.send(request).await?)
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, ApiError> {
        let request = self.http.put(self.url(&format!("/bookings/{id}/cancel")));
        types::booking_from_value(self.send(request).await?)
    }

    pub async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/bookings/{id}/status")))
            .json(&BookingStatusRequest { status });
        types::booking_from_value(self.send(request).await?)
    }

    // ===== Ratings =====

    pub async fn create_rating(&self, draft: &RatingDraft) -> Result<Rating, ApiError> {
        let request = self.http.post(self.url("/ratings/")).json(draft);
        types::rating_from_value(self.send(request).await?)
    }

    pub async fn package_ratings(&self, package_id: &str) -> Result<Vec<Rating>, ApiError> {
        let request = self
            .http
            .get(self.url(&format!("/ratings/package/{package_id}")));
        types::ratings_from_value(self.send(request).await?)
    }

    pub async fn user_ratings(&self, user_id: &str) -> Result<Vec<Rating>, ApiError> {
        let request = self.http.get(self.url(&format!("/ratings/user/{user_id}")));
        types::ratings_from_value(self.send(request).await?)
    }

    // ===== Users & admin =====

    pub async fn admin_users(&self, query: &UserQuery) -> Result<(Vec<User>, u64), ApiError> {
        let request = self
            .http
            .get(self.url("/admin/users"))
            .query(&query.to_params());
        types::users_from_value(self.send(request).await?)
    }

    pub async fn set_user_active(&self, id: &str, is_active: bool) -> Result<(), ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/admin/users/{id}/status")))
            .json(&UserStatusRequest { is_active });
        self.send(request).await?;
        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let request = self.http.get(self.url(&format!("/users/{id}")));
        types::user_from_value(self.send(request).await?)
    }

    pub async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/users/{id}")))
            .json(update);
        types::user_from_value(self.send(request).await?)
    }

    // ===== Misc =====

    pub async fn health_check(&self) -> Result<String, ApiError> {
        let request = self.http.get(self.url("/health-check"));
        let body = self.send(request).await?;
        Ok(types::message_from_value(&body).unwrap_or_else(|| "ok".to_string()))
    }
}

/// Extracts the most useful message from an error body: the JSON `detail` or
/// `message` field, else the raw body, else a status-based fallback.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = types::message_from_value(&value) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        let body = r#"{"detail": "Incorrect email or password. Please check your credentials and try again."}"#;
        assert_eq!(
            error_message(401, body),
            "Incorrect email or password. Please check your credentials and try again."
        );
    }

    #[test]
    fn test_error_message_accepts_message_key() {
        assert_eq!(error_message(404, r#"{"message": "not here"}"#), "not here");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message(500, "boom"), "boom");
        assert_eq!(error_message(500, "  "), "request failed with status 500");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/auth/login"), "http://localhost:8000/auth/login");
    }

    #[test]
    fn test_user_message_copy() {
        let network = ApiError::Network("dns".to_string());
        assert_eq!(
            network.user_message(),
            "Network error. Please check your connection and try again."
        );

        let http = ApiError::Http {
            status: 400,
            message: "Email already registered".to_string(),
        };
        assert_eq!(http.user_message(), "Email already registered");
        assert_eq!(http.status(), Some(400));

        let decode = ApiError::Decode("eof".to_string());
        assert_eq!(
            decode.user_message(),
            "Received an unexpected response from the server."
        );
        assert_eq!(decode.status(), None);
    }

    #[test]
    fn test_status_request_serialization() {
        let body = serde_json::to_value(&BookingStatusRequest {
            status: BookingStatus::Confirmed,
        })
        .unwrap();
        assert_eq!(body["status"], "confirmed");

        let body = serde_json::to_value(&UserStatusRequest { is_active: false }).unwrap();
        assert_eq!(body["is_active"], false);
    }
}
