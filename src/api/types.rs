//! # Wire Types & Normalization
//!
//! The server's payloads drift: older documents use `title` for `name` and
//! `group_size` for `max_participants`, list endpoints sometimes wrap their
//! arrays (`{"users": [...]}`), mutations wrap their entity
//! (`{"message": ..., "booking": {...}}`), and locations arrive either nested
//! or as split `latitude`/`longitude` fields.
//!
//! Everything in this module exists to absorb that drift at the API boundary.
//! Each entity gets a tolerant wire struct plus a conversion into the
//! canonical `models` type; the rest of the crate never sees a wire shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::api::client::ApiError;
use crate::models::{
    Booking, BookingStatus, BookingSummary, GeoPoint, ItineraryDay, PackageStatus, Rating,
    SpotRating, SpotStatus, TourPackage, TouristSpot, User, UserRole, normalize_days,
};

/// A successful authentication: the bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub access_token: String,
    pub user: User,
}

// ============================================================================
// Timestamp parsing
// ============================================================================

/// Parses the timestamp formats the server is known to emit: RFC 3339,
/// naive ISO datetimes (assumed UTC), and bare `YYYY-MM-DD` days.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

fn parse_opt_datetime(raw: &Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref().and_then(parse_datetime)
}

// ============================================================================
// Status & role parsing (unknown values fall back, never fail)
// ============================================================================

fn role_from_wire(raw: Option<&str>) -> UserRole {
    match raw {
        Some("admin") => UserRole::Admin,
        Some("travel_company") => UserRole::TravelCompany,
        _ => UserRole::Tourist,
    }
}

fn package_status_from_wire(raw: Option<&str>) -> PackageStatus {
    match raw {
        Some("inactive") => PackageStatus::Inactive,
        _ => PackageStatus::Active,
    }
}

fn spot_status_from_wire(raw: Option<&str>) -> SpotStatus {
    match raw {
        Some("approved") => SpotStatus::Approved,
        Some("rejected") => SpotStatus::Rejected,
        _ => SpotStatus::Pending,
    }
}

fn booking_status_from_wire(raw: Option<&str>) -> BookingStatus {
    match raw {
        Some("confirmed") => BookingStatus::Confirmed,
        Some("cancelled") => BookingStatus::Cancelled,
        Some("completed") => BookingStatus::Completed,
        _ => BookingStatus::Pending,
    }
}

// ============================================================================
// Generic plumbing
// ============================================================================

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Accepts a bare array, a wrapper object holding the array under one of
/// `keys`, or a single entity object (coerced to a one-element list).
fn coerce_list(value: Value, keys: &[&str]) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in keys {
                match map.remove(*key) {
                    Some(Value::Array(items)) => return items,
                    Some(other) => return vec![other],
                    None => {}
                }
            }
            vec![Value::Object(map)]
        }
        _ => Vec::new(),
    }
}

/// Pulls a human-readable message out of `{"message": ...}` / `{"detail": ...}`
/// bodies.
pub(crate) fn message_from_value(value: &Value) -> Option<String> {
    for key in ["message", "detail"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub profile_picture: Option<String>,
    pub created_at: Option<String>,
    pub last_login: Option<String>,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        User {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            full_name: wire.full_name.unwrap_or_default(),
            phone_number: wire.phone_number,
            role: role_from_wire(wire.role.as_deref()),
            is_active: wire.is_active.unwrap_or(true),
            profile_picture: wire.profile_picture,
            created_at: parse_opt_datetime(&wire.created_at),
            last_login: parse_opt_datetime(&wire.last_login),
        }
    }
}

pub fn user_from_value(value: Value) -> Result<User, ApiError> {
    Ok(User::from(from_value::<UserWire>(value)?))
}

/// Unwraps `{"users": [...], "total": n}`; bare arrays count themselves.
pub fn users_from_value(value: Value) -> Result<(Vec<User>, u64), ApiError> {
    let total = value.get("total").and_then(Value::as_u64);
    let mut users = Vec::new();
    for item in coerce_list(value, &["users", "data"]) {
        users.push(User::from(from_value::<UserWire>(item)?));
    }
    let total = total.unwrap_or(users.len() as u64);
    Ok((users, total))
}

// ============================================================================
// Locations & itineraries
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocationWire {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

impl From<LocationWire> for GeoPoint {
    fn from(wire: LocationWire) -> Self {
        GeoPoint {
            latitude: wire.latitude.unwrap_or(0.0),
            longitude: wire.longitude.unwrap_or(0.0),
            address: wire.address.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItineraryWire {
    pub day: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<ItineraryWire> for ItineraryDay {
    fn from(wire: ItineraryWire) -> Self {
        ItineraryDay {
            day: wire.day.unwrap_or(0),
            title: wire.title.unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
        }
    }
}

/// Nested location wins; split `latitude`/`longitude` fields are the legacy
/// document shape; anything else gets the zero location.
fn location_from_parts(
    nested: Option<LocationWire>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
) -> GeoPoint {
    match (nested, latitude, longitude) {
        (Some(wire), _, _) => GeoPoint::from(wire),
        (None, Some(latitude), Some(longitude)) => GeoPoint {
            latitude,
            longitude,
            address: address.unwrap_or_default(),
        },
        _ => GeoPoint::default(),
    }
}

// ============================================================================
// Tour packages
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_days: Option<u32>,
    pub max_participants: Option<u32>,
    pub group_size: Option<u32>,
    pub current_participants: Option<u32>,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub location: Option<LocationWire>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub available_dates: Option<Vec<String>>,
    pub destinations: Option<Vec<String>>,
    pub included_spots: Option<Vec<String>>,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub itinerary: Option<Vec<ItineraryWire>>,
    pub status: Option<String>,
    pub average_rating: Option<f64>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub travel_company_id: Option<String>,
    pub created_by: Option<String>,
}

impl From<PackageWire> for TourPackage {
    fn from(wire: PackageWire) -> Self {
        let location =
            location_from_parts(wire.location, wire.latitude, wire.longitude, wire.address);
        let available_dates = normalize_days(
            wire.available_dates
                .unwrap_or_default()
                .iter()
                .filter_map(|raw| parse_datetime(raw))
                .collect(),
        );
        TourPackage {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            name: wire.name.or(wire.title).unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
            price: wire.price.unwrap_or(0.0),
            duration_days: wire.duration_days.unwrap_or(0),
            max_participants: wire.max_participants.or(wire.group_size).unwrap_or(0),
            current_participants: wire.current_participants.unwrap_or(0),
            category: wire.category,
            difficulty_level: wire.difficulty_level,
            location,
            image_urls: wire.image_urls.unwrap_or_default(),
            available_dates,
            destinations: wire
                .destinations
                .or(wire.included_spots)
                .unwrap_or_default(),
            includes: wire.includes.unwrap_or_default(),
            excludes: wire.excludes.unwrap_or_default(),
            itinerary: wire
                .itinerary
                .unwrap_or_default()
                .into_iter()
                .map(ItineraryDay::from)
                .collect(),
            status: package_status_from_wire(wire.status.as_deref()),
            average_rating: wire.average_rating.or(wire.rating).unwrap_or(0.0),
            total_ratings: wire.total_ratings.unwrap_or(0),
            travel_company_id: wire.travel_company_id.or(wire.created_by),
        }
    }
}

pub fn package_from_value(value: Value) -> Result<TourPackage, ApiError> {
    Ok(TourPackage::from(from_value::<PackageWire>(value)?))
}

pub fn packages_from_value(value: Value) -> Result<Vec<TourPackage>, ApiError> {
    let mut packages = Vec::new();
    for item in coerce_list(value, &["packages", "tour_packages", "data"]) {
        packages.push(TourPackage::from(from_value::<PackageWire>(item)?));
    }
    Ok(packages)
}

// ============================================================================
// Tourist spots
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpotWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<LocationWire>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub categories: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub average_rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub best_time_to_visit: Option<String>,
    pub status: Option<String>,
    pub company_id: Option<String>,
    pub created_by: Option<String>,
}

impl From<SpotWire> for TouristSpot {
    fn from(wire: SpotWire) -> Self {
        let location =
            location_from_parts(wire.location, wire.latitude, wire.longitude, wire.address);
        TouristSpot {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            name: wire.name.or(wire.title).unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
            location,
            region: wire.region,
            categories: wire.categories.unwrap_or_default(),
            image_urls: wire.image_urls.unwrap_or_default(),
            rating: wire.rating.or(wire.average_rating).unwrap_or(0.0),
            total_ratings: wire.total_ratings.unwrap_or(0),
            best_time_to_visit: wire.best_time_to_visit,
            status: spot_status_from_wire(wire.status.as_deref()),
            company_id: wire.company_id.or(wire.created_by),
        }
    }
}

pub fn spot_from_value(value: Value) -> Result<TouristSpot, ApiError> {
    Ok(TouristSpot::from(from_value::<SpotWire>(value)?))
}

pub fn spots_from_value(value: Value) -> Result<Vec<TouristSpot>, ApiError> {
    let mut spots = Vec::new();
    for item in coerce_list(value, &["spots", "tourist_spots", "data"]) {
        spots.push(TouristSpot::from(from_value::<SpotWire>(item)?));
    }
    Ok(spots)
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub tourist_id: Option<String>,
    pub tour_package_id: Option<String>,
    pub tourist_spot_id: Option<String>,
    pub participants_count: Option<u32>,
    pub number_of_people: Option<u32>,
    pub total_amount: Option<f64>,
    pub total_price: Option<f64>,
    pub status: Option<String>,
    pub booking_date: Option<String>,
    pub travel_date: Option<String>,
    pub booking_reference: Option<String>,
    pub contact_phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub special_requests: Option<String>,
}

impl From<BookingWire> for Booking {
    fn from(wire: BookingWire) -> Self {
        Booking {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            tourist_id: wire.tourist_id.unwrap_or_default(),
            tour_package_id: wire.tour_package_id,
            tourist_spot_id: wire.tourist_spot_id,
            participants_count: wire
                .participants_count
                .or(wire.number_of_people)
                .unwrap_or(0),
            total_amount: wire.total_amount.or(wire.total_price).unwrap_or(0.0),
            status: booking_status_from_wire(wire.status.as_deref()),
            booking_date: parse_opt_datetime(&wire.booking_date),
            travel_date: parse_opt_datetime(&wire.travel_date),
            booking_reference: wire.booking_reference,
            contact_phone: wire.contact_phone,
            emergency_contact_name: wire.emergency_contact_name,
            emergency_contact_number: wire.emergency_contact_number,
            special_requests: wire.special_requests,
        }
    }
}

/// Unwraps the mutation envelope `{"message": ..., "booking": {...}}` when
/// present; a bare booking object passes straight through.
pub fn booking_from_value(value: Value) -> Result<Booking, ApiError> {
    let value = match value {
        Value::Object(mut map) => map.remove("booking").unwrap_or(Value::Object(map)),
        other => other,
    };
    Ok(Booking::from(from_value::<BookingWire>(value)?))
}

pub fn bookings_from_value(value: Value) -> Result<Vec<Booking>, ApiError> {
    let mut bookings = Vec::new();
    for item in coerce_list(value, &["bookings", "data"]) {
        bookings.push(Booking::from(from_value::<BookingWire>(item)?));
    }
    Ok(bookings)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookingSummaryWire {
    booking: Option<BookingWire>,
    user: Option<UserWire>,
    tour_package: Option<PackageWire>,
}

/// Company rows arrive as `{booking, user, tour_package}` triples; a plain
/// booking list (older servers) is accepted with the related documents absent.
pub fn booking_summaries_from_value(value: Value) -> Result<Vec<BookingSummary>, ApiError> {
    let mut summaries = Vec::new();
    for item in coerce_list(value, &["bookings", "data"]) {
        if item.get("booking").is_some() {
            let wire: BookingSummaryWire = from_value(item)?;
            summaries.push(BookingSummary {
                booking: Booking::from(wire.booking.unwrap_or_default()),
                user: wire.user.map(User::from),
                tour_package: wire.tour_package.map(TourPackage::from),
            });
        } else {
            summaries.push(BookingSummary {
                booking: Booking::from(from_value::<BookingWire>(item)?),
                user: None,
                tour_package: None,
            });
        }
    }
    Ok(summaries)
}

// ============================================================================
// Ratings
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RatingWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub tourist_id: Option<String>,
    pub tour_package_id: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub booking_id: Option<String>,
    pub created_at: Option<String>,
}

impl From<RatingWire> for Rating {
    fn from(wire: RatingWire) -> Self {
        Rating {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            tourist_id: wire.tourist_id.unwrap_or_default(),
            tour_package_id: wire.tour_package_id.unwrap_or_default(),
            rating: clamp_rating(wire.rating),
            review: wire.review,
            booking_id: wire.booking_id,
            created_at: parse_opt_datetime(&wire.created_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpotRatingWire {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub tourist_id: Option<String>,
    pub tourist_spot_id: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub created_at: Option<String>,
}

impl From<SpotRatingWire> for SpotRating {
    fn from(wire: SpotRatingWire) -> Self {
        SpotRating {
            id: wire.id.or(wire.mongo_id).unwrap_or_default(),
            tourist_id: wire.tourist_id.unwrap_or_default(),
            tourist_spot_id: wire.tourist_spot_id.unwrap_or_default(),
            rating: clamp_rating(wire.rating),
            review: wire.review,
            created_at: parse_opt_datetime(&wire.created_at),
        }
    }
}

/// Servers have emitted rating values as floats; clamp into the 0..=5 range.
fn clamp_rating(raw: Option<f64>) -> u8 {
    raw.unwrap_or(0.0).round().clamp(0.0, 5.0) as u8
}

pub fn rating_from_value(value: Value) -> Result<Rating, ApiError> {
    Ok(Rating::from(from_value::<RatingWire>(value)?))
}

pub fn ratings_from_value(value: Value) -> Result<Vec<Rating>, ApiError> {
    let mut ratings = Vec::new();
    for item in coerce_list(value, &["ratings", "data"]) {
        ratings.push(Rating::from(from_value::<RatingWire>(item)?));
    }
    Ok(ratings)
}

pub fn spot_rating_from_value(value: Value) -> Result<SpotRating, ApiError> {
    Ok(SpotRating::from(from_value::<SpotRatingWire>(value)?))
}

pub fn spot_ratings_from_value(value: Value) -> Result<Vec<SpotRating>, ApiError> {
    let mut ratings = Vec::new();
    for item in coerce_list(value, &["ratings", "data"]) {
        ratings.push(SpotRating::from(from_value::<SpotRatingWire>(item)?));
    }
    Ok(ratings)
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginWire {
    access_token: Option<String>,
    user: Option<UserWire>,
}

/// Login/refresh responses must carry both halves of the session; a missing
/// token or user is a malformed response, not a partial success.
pub fn login_from_value(value: Value) -> Result<LoginSession, ApiError> {
    let wire: LoginWire = from_value(value)?;
    let access_token = wire
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Decode("auth response missing access_token".to_string()))?;
    let user = wire
        .user
        .ok_or_else(|| ApiError::Decode("auth response missing user".to_string()))?;
    Ok(LoginSession {
        access_token,
        user: User::from(user),
    })
}

// ============================================================================
// List queries
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SpotQuery {
    pub search: Option<String>,
    pub region: Option<String>,
    pub category: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl SpotQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "search", &self.search);
        push_param(&mut params, "region", &self.region);
        push_param(&mut params, "categories", &self.category);
        push_param(&mut params, "skip", &self.skip);
        push_param(&mut params, "limit", &self.limit);
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageQuery {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub duration: Option<u32>,
    pub status: Option<PackageStatus>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl PackageQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "search", &self.search);
        push_param(&mut params, "min_price", &self.min_price);
        push_param(&mut params, "max_price", &self.max_price);
        push_param(&mut params, "duration", &self.duration);
        push_param(&mut params, "status", &self.status);
        push_param(&mut params, "skip", &self.skip);
        push_param(&mut params, "limit", &self.limit);
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl UserQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "role", &self.role);
        push_param(&mut params, "is_active", &self.is_active);
        push_param(&mut params, "search", &self.search);
        push_param(&mut params, "skip", &self.skip);
        push_param(&mut params, "limit", &self.limit);
        params
    }
}

fn push_param<T: ToString>(
    params: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: &Option<T>,
) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}
