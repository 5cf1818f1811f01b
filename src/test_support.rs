//! Shared fixtures for unit tests: sample entities plus a store wired to a
//! throwaway environment.

use chrono::{TimeZone, Utc};

use crate::api::ApiClient;
use crate::core::session::SessionStore;
use crate::models::{
    Booking, BookingStatus, GeoPoint, PackageStatus, Rating, SpotRating, SpotStatus, TourPackage,
    TouristSpot, User, UserRole,
};
use crate::store::Store;

pub fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("user{id}@example.com"),
        full_name: format!("User {id}"),
        phone_number: None,
        role: UserRole::Tourist,
        is_active: true,
        profile_picture: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        last_login: None,
    }
}

pub fn sample_spot(id: &str) -> TouristSpot {
    TouristSpot {
        id: id.to_string(),
        name: format!("Spot {id}"),
        description: "A place worth the trip".to_string(),
        location: GeoPoint {
            latitude: 27.7,
            longitude: 85.3,
            address: "12 Harbor Road".to_string(),
        },
        region: Some("Coastal".to_string()),
        categories: vec!["natural".to_string()],
        image_urls: vec![],
        rating: 4.5,
        total_ratings: 10,
        best_time_to_visit: None,
        status: SpotStatus::Approved,
        company_id: Some("c1".to_string()),
    }
}

pub fn sample_package(id: &str) -> TourPackage {
    TourPackage {
        id: id.to_string(),
        name: format!("Package {id}"),
        description: "Three days of guided travel".to_string(),
        price: 1500.0,
        duration_days: 3,
        max_participants: 10,
        current_participants: 2,
        category: Some("adventure".to_string()),
        difficulty_level: None,
        location: GeoPoint::default(),
        image_urls: vec![],
        available_dates: vec![],
        destinations: vec![],
        includes: vec![],
        excludes: vec![],
        itinerary: vec![],
        status: PackageStatus::Active,
        average_rating: 4.2,
        total_ratings: 12,
        travel_company_id: Some("c1".to_string()),
    }
}

pub fn sample_booking(id: &str) -> Booking {
    Booking {
        id: id.to_string(),
        tourist_id: "1".to_string(),
        tour_package_id: Some("p1".to_string()),
        tourist_spot_id: None,
        participants_count: 2,
        total_amount: 3000.0,
        status: BookingStatus::Pending,
        booking_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
        travel_date: Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()),
        booking_reference: Some(format!("WF-{id}")),
        contact_phone: None,
        emergency_contact_name: None,
        emergency_contact_number: None,
        special_requests: None,
    }
}

pub fn sample_rating(id: &str, package_id: &str) -> Rating {
    Rating {
        id: id.to_string(),
        tourist_id: "1".to_string(),
        tour_package_id: package_id.to_string(),
        rating: 5,
        review: Some("Worth every step".to_string()),
        booking_id: None,
        created_at: None,
    }
}

pub fn sample_spot_rating(id: &str, spot_id: &str) -> SpotRating {
    SpotRating {
        id: id.to_string(),
        tourist_id: "1".to_string(),
        tourist_spot_id: spot_id.to_string(),
        rating: 4,
        review: None,
        created_at: None,
    }
}

/// A store wired to an unroutable address and a throwaway session directory.
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn sample_store() -> (Store, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(
        ApiClient::new("http://127.0.0.1:9"),
        SessionStore::new(dir.path()),
    );
    (store, dir)
}
