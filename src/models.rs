//! # Domain Models
//!
//! Canonical entity types shared by the API layer, the state slices, and the
//! CLI. Wire payloads are normalized into these shapes at the API boundary
//! (`api::types`), so everything above that boundary sees one vocabulary.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users & Roles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Tourist,
    TravelCompany,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Tourist
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Tourist => write!(f, "tourist"),
            UserRole::TravelCompany => write!(f, "travel_company"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

// ============================================================================
// Geography & Itineraries
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub description: String,
}

// ============================================================================
// Tour Packages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Active,
    Inactive,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::Active => write!(f, "active"),
            PackageStatus::Inactive => write!(f, "inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPackage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_days: u32,
    pub max_participants: u32,
    pub current_participants: u32,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub location: GeoPoint,
    pub image_urls: Vec<String>,
    /// Distinct calendar days, each normalized to midnight UTC.
    pub available_dates: Vec<DateTime<Utc>>,
    pub destinations: Vec<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub status: PackageStatus,
    pub average_rating: f64,
    pub total_ratings: u32,
    pub travel_company_id: Option<String>,
}

impl TourPackage {
    /// Remaining bookable slots, saturating at zero.
    pub fn available_slots(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }
}

/// Collapses a date list to distinct calendar days at midnight UTC,
/// preserving first-seen order.
pub fn normalize_days(dates: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(dates.len());
    for date in dates {
        let day = date.date_naive();
        if seen.insert(day) {
            days.push(day.and_time(NaiveTime::MIN).and_utc());
        }
    }
    days
}

// ============================================================================
// Tourist Spots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotStatus::Pending => write!(f, "pending"),
            SpotStatus::Approved => write!(f, "approved"),
            SpotStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristSpot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: GeoPoint,
    pub region: Option<String>,
    pub categories: Vec<String>,
    pub image_urls: Vec<String>,
    pub rating: f64,
    pub total_ratings: u32,
    pub best_time_to_visit: Option<String>,
    pub status: SpotStatus,
    pub company_id: Option<String>,
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Allowed status moves: pending may confirm or cancel, confirmed may
    /// complete or cancel, cancelled/completed are terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub tourist_id: String,
    pub tour_package_id: Option<String>,
    pub tourist_spot_id: Option<String>,
    pub participants_count: u32,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub booking_date: Option<DateTime<Utc>>,
    pub travel_date: Option<DateTime<Utc>>,
    pub booking_reference: Option<String>,
    pub contact_phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub special_requests: Option<String>,
}

/// A company-side booking row: the booking plus the related tourist and
/// package documents the server joins in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking: Booking,
    pub user: Option<User>,
    pub tour_package: Option<TourPackage>,
}

// ============================================================================
// Ratings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub tourist_id: String,
    pub tour_package_id: String,
    pub rating: u8,
    pub review: Option<String>,
    pub booking_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRating {
    pub id: String,
    pub tourist_id: String,
    pub tourist_spot_id: String,
    pub rating: u8,
    pub review: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Validation
// ============================================================================

/// A client-side input rejection. Raised before any request is made; the
/// server never sees the offending payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError(message.into())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Drafts (request payloads)
// ============================================================================

/// Signup payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: UserRole,
}

/// Create/update payload for a tour package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_days: u32,
    pub max_participants: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub image_urls: Vec<String>,
    pub available_dates: Vec<DateTime<Utc>>,
    pub destinations: Vec<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PackageStatus>,
}

impl PackageDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price <= 0.0 {
            return Err(ValidationError::new("Price must be greater than zero."));
        }
        if self.duration_days < 1 {
            return Err(ValidationError::new("Duration must be at least one day."));
        }
        if self.max_participants < 1 {
            return Err(ValidationError::new("Group size must be at least one participant."));
        }
        Ok(())
    }

    /// Returns the draft with its dates collapsed to distinct midnights.
    pub fn normalized(mut self) -> Self {
        self.available_dates = normalize_days(self.available_dates);
        self
    }
}

/// Create/update payload for a tourist spot.
#[derive(Debug, Clone, Serialize)]
pub struct SpotDraft {
    pub name: String,
    pub description: String,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub categories: Vec<String>,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
}

/// Booking creation payload. Canonical field names here; the wire names
/// (`number_of_people`, `total_price`) are applied on serialization.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tourist_spot_id: Option<String>,
    #[serde(rename = "number_of_people")]
    pub participants_count: u32,
    #[serde(rename = "total_price")]
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl BookingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.participants_count < 1 {
            return Err(ValidationError::new("Participant count must be at least one."));
        }
        match (&self.tour_package_id, &self.tourist_spot_id) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ValidationError::new(
                "A booking must reference exactly one package or spot.",
            )),
        }
    }
}

/// Package rating payload.
#[derive(Debug, Clone, Serialize)]
pub struct RatingDraft {
    pub tour_package_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl RatingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rating_value(self.rating)
    }
}

/// Spot rating payload (the spot id travels in the URL).
#[derive(Debug, Clone, Serialize)]
pub struct SpotRatingDraft {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

impl SpotRatingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rating_value(self.rating)
    }
}

fn validate_rating_value(rating: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("Rating must be between 1 and 5"))
    }
}

/// Profile edit payload; only the present fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn test_booking_transitions_from_pending() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_booking_transitions_from_confirmed() {
        use BookingStatus::*;
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_statuses_allow_nothing() {
        use BookingStatus::*;
        for next in [Pending, Confirmed, Cancelled, Completed] {
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Completed.can_transition_to(next));
        }
        assert!(Cancelled.is_terminal());
        assert!(Completed.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_normalize_days_dedupes_and_floors() {
        let days = normalize_days(vec![
            utc(2025, 6, 1, 9),
            utc(2025, 6, 1, 17),
            utc(2025, 6, 3, 0),
            utc(2025, 6, 1, 23),
            utc(2025, 6, 2, 5),
        ]);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(days[1], Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap());
        assert_eq!(days[2], Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_normalize_days_empty() {
        assert!(normalize_days(Vec::new()).is_empty());
    }

    #[test]
    fn test_booking_draft_requires_exactly_one_target() {
        let mut draft = BookingDraft {
            tour_package_id: Some("p1".to_string()),
            tourist_spot_id: None,
            participants_count: 2,
            total_amount: 100.0,
            travel_date: None,
            contact_phone: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
            special_requests: None,
        };
        assert!(draft.validate().is_ok());

        draft.tourist_spot_id = Some("s1".to_string());
        assert!(draft.validate().is_err());

        draft.tour_package_id = None;
        assert!(draft.validate().is_ok());

        draft.tourist_spot_id = None;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_booking_draft_requires_participants() {
        let draft = BookingDraft {
            tour_package_id: Some("p1".to_string()),
            tourist_spot_id: None,
            participants_count: 0,
            total_amount: 0.0,
            travel_date: None,
            contact_phone: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
            special_requests: None,
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_booking_draft_wire_names() {
        let draft = BookingDraft {
            tour_package_id: Some("p1".to_string()),
            tourist_spot_id: None,
            participants_count: 3,
            total_amount: 450.0,
            travel_date: None,
            contact_phone: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
            special_requests: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["number_of_people"], 3);
        assert_eq!(json["total_price"], 450.0);
        assert!(json.get("participants_count").is_none());
    }

    #[test]
    fn test_rating_bounds() {
        for value in [1u8, 3, 5] {
            assert!(validate_rating_value(value).is_ok());
        }
        for value in [0u8, 6, 200] {
            let err = validate_rating_value(value).unwrap_err();
            assert_eq!(err.to_string(), "Rating must be between 1 and 5");
        }
    }

    #[test]
    fn test_package_draft_validation() {
        let mut draft = PackageDraft {
            name: "Coastal Trek".to_string(),
            description: "Three days on the coast".to_string(),
            price: 250.0,
            duration_days: 3,
            max_participants: 12,
            category: None,
            difficulty_level: None,
            location: None,
            image_urls: Vec::new(),
            available_dates: vec![utc(2025, 7, 1, 8), utc(2025, 7, 1, 12)],
            destinations: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            itinerary: Vec::new(),
            status: None,
        };
        assert!(draft.validate().is_ok());

        let normalized = draft.clone().normalized();
        assert_eq!(normalized.available_dates.len(), 1);

        draft.price = 0.0;
        assert!(draft.validate().is_err());
        draft.price = 10.0;
        draft.duration_days = 0;
        assert!(draft.validate().is_err());
        draft.duration_days = 2;
        draft.max_participants = 0;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_role_serde_round_trip() {
        let json = serde_json::to_string(&UserRole::TravelCompany).unwrap();
        assert_eq!(json, "\"travel_company\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_available_slots_saturates() {
        let package = TourPackage {
            id: "p1".to_string(),
            name: "Trek".to_string(),
            description: String::new(),
            price: 100.0,
            duration_days: 1,
            max_participants: 5,
            current_participants: 7,
            category: None,
            difficulty_level: None,
            location: GeoPoint::default(),
            image_urls: Vec::new(),
            available_dates: Vec::new(),
            destinations: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            itinerary: Vec::new(),
            status: PackageStatus::Active,
            average_rating: 0.0,
            total_ratings: 0,
            travel_company_id: None,
        };
        assert_eq!(package.available_slots(), 0);
    }
}
