//! # Tourist Spots Slice
//!
//! Public browsing (list, search, detail), company-owned spot management,
//! the admin approval queue, and per-spot rating buckets. Fetch and search
//! both write the browsable collection, so they share one operation key and
//! the later-issued call wins.

use std::collections::HashMap;

use log::info;

use crate::api::{ApiError, SpotQuery};
use crate::models::{SpotDraft, SpotRating, SpotRatingDraft, TouristSpot};

use super::{Action, OpKey, Store, Ticket};

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpotsState {
    /// Publicly browsable spots; latest fetch or search wins.
    pub items: Vec<TouristSpot>,
    pub selected: Option<TouristSpot>,
    /// Spots owned by the signed-in company.
    pub my_spots: Vec<TouristSpot>,
    /// Admin approval queue.
    pub pending: Vec<TouristSpot>,
    /// Ratings keyed by spot id; each bucket is replaced independently.
    pub ratings: HashMap<String, Vec<SpotRating>>,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum SpotsAction {
    Pending,
    ListFulfilled(Vec<TouristSpot>),
    SelectFulfilled(TouristSpot),
    MySpotsFulfilled(Vec<TouristSpot>),
    QueueFulfilled(Vec<TouristSpot>),
    CreateFulfilled(TouristSpot),
    UpdateFulfilled(TouristSpot),
    DeleteFulfilled(String),
    /// Admin approved or rejected the spot; patch it wherever it appears.
    ReviewFulfilled(TouristSpot),
    RatingsFulfilled {
        spot_id: String,
        ratings: Vec<SpotRating>,
    },
    RatingCreated(SpotRating),
    Rejected(String),
}

pub fn reduce(state: &mut SpotsState, action: SpotsAction) {
    match action {
        SpotsAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        SpotsAction::ListFulfilled(spots) => {
            state.items = spots;
            settle(state);
        }
        SpotsAction::SelectFulfilled(spot) => {
            state.selected = Some(spot);
            settle(state);
        }
        SpotsAction::MySpotsFulfilled(spots) => {
            state.my_spots = spots;
            settle(state);
        }
        SpotsAction::QueueFulfilled(spots) => {
            state.pending = spots;
            settle(state);
        }
        SpotsAction::CreateFulfilled(spot) => {
            // New spots await approval, so only the owner's list shows them
            state.my_spots.insert(0, spot);
            settle(state);
        }
        SpotsAction::UpdateFulfilled(spot) => {
            patch_spot(state, &spot);
            settle(state);
        }
        SpotsAction::DeleteFulfilled(id) => {
            state.items.retain(|s| s.id != id);
            state.my_spots.retain(|s| s.id != id);
            state.pending.retain(|s| s.id != id);
            if state.selected.as_ref().is_some_and(|s| s.id == id) {
                state.selected = None;
            }
            settle(state);
        }
        SpotsAction::ReviewFulfilled(spot) => {
            state.pending.retain(|s| s.id != spot.id);
            patch_spot(state, &spot);
            settle(state);
        }
        SpotsAction::RatingsFulfilled { spot_id, ratings } => {
            state.ratings.insert(spot_id, ratings);
            settle(state);
        }
        SpotsAction::RatingCreated(rating) => {
            state
                .ratings
                .entry(rating.tourist_spot_id.clone())
                .or_default()
                .push(rating);
            settle(state);
        }
        SpotsAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

fn settle(state: &mut SpotsState) {
    state.loading = false;
    state.error = None;
}

fn patch_spot(state: &mut SpotsState, spot: &TouristSpot) {
    replace_by_id(&mut state.items, spot);
    replace_by_id(&mut state.my_spots, spot);
    replace_by_id(&mut state.pending, spot);
    if state.selected.as_ref().is_some_and(|s| s.id == spot.id) {
        state.selected = Some(spot.clone());
    }
}

fn replace_by_id(list: &mut [TouristSpot], spot: &TouristSpot) {
    if let Some(slot) = list.iter_mut().find(|s| s.id == spot.id) {
        *slot = spot.clone();
    }
}

// ===== Operations =====

pub async fn fetch_spots(store: &Store, query: &SpotQuery) -> Result<Vec<TouristSpot>, String> {
    let ticket = store.begin(OpKey::Spots).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().list_spots(query).await {
        Ok(spots) => {
            store
                .dispatch_latest(&ticket, Action::Spots(SpotsAction::ListFulfilled(spots.clone())))
                .await;
            Ok(spots)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn search_spots(store: &Store, term: &str) -> Result<Vec<TouristSpot>, String> {
    let ticket = store.begin(OpKey::Spots).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().search_spots(term).await {
        Ok(spots) => {
            store
                .dispatch_latest(&ticket, Action::Spots(SpotsAction::ListFulfilled(spots.clone())))
                .await;
            Ok(spots)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn select_spot(store: &Store, id: &str) -> Result<TouristSpot, String> {
    let ticket = store.begin(OpKey::SpotSelection).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().get_spot(id).await {
        Ok(spot) => {
            store
                .dispatch_latest(&ticket, Action::Spots(SpotsAction::SelectFulfilled(spot.clone())))
                .await;
            Ok(spot)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// Submits a new spot for admin review.
pub async fn create_spot(store: &Store, draft: &SpotDraft) -> Result<TouristSpot, String> {
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().create_spot(draft).await {
        Ok(spot) => {
            info!("Created spot {} ({})", spot.name, spot.id);
            store
                .dispatch(Action::Spots(SpotsAction::CreateFulfilled(spot.clone())))
                .await;
            Ok(spot)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn fetch_my_spots(store: &Store) -> Result<Vec<TouristSpot>, String> {
    let ticket = store.begin(OpKey::MySpots).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().my_spots().await {
        Ok(spots) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Spots(SpotsAction::MySpotsFulfilled(spots.clone())),
                )
                .await;
            Ok(spots)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn update_spot(store: &Store, id: &str, draft: &SpotDraft) -> Result<TouristSpot, String> {
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().update_spot(id, draft).await {
        Ok(spot) => {
            store
                .dispatch(Action::Spots(SpotsAction::UpdateFulfilled(spot.clone())))
                .await;
            Ok(spot)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn delete_spot(store: &Store, id: &str) -> Result<(), String> {
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().delete_spot(id).await {
        Ok(()) => {
            info!("Deleted spot {}", id);
            store
                .dispatch(Action::Spots(SpotsAction::DeleteFulfilled(id.to_string())))
                .await;
            Ok(())
        }
        Err(err) => reject(store, err).await,
    }
}

/// Admin: spots waiting for approval.
pub async fn fetch_pending_spots(store: &Store) -> Result<Vec<TouristSpot>, String> {
    let ticket = store.begin(OpKey::PendingSpots).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().pending_spots().await {
        Ok(spots) => {
            store
                .dispatch_latest(&ticket, Action::Spots(SpotsAction::QueueFulfilled(spots.clone())))
                .await;
            Ok(spots)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn approve_spot(store: &Store, id: &str) -> Result<TouristSpot, String> {
    review_spot(store, id, true).await
}

pub async fn reject_spot(store: &Store, id: &str) -> Result<TouristSpot, String> {
    review_spot(store, id, false).await
}

async fn review_spot(store: &Store, id: &str, approve: bool) -> Result<TouristSpot, String> {
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    let result = if approve {
        store.api().approve_spot(id).await
    } else {
        store.api().reject_spot(id).await
    };
    match result {
        Ok(spot) => {
            info!("Spot {} is now {}", spot.id, spot.status);
            store
                .dispatch(Action::Spots(SpotsAction::ReviewFulfilled(spot.clone())))
                .await;
            Ok(spot)
        }
        Err(err) => reject(store, err).await,
    }
}

/// Rates a spot. An out-of-range rating is rejected here without a request.
pub async fn rate_spot(
    store: &Store,
    spot_id: &str,
    draft: &SpotRatingDraft,
) -> Result<SpotRating, String> {
    if let Err(e) = draft.validate() {
        return fail(store, e.to_string()).await;
    }
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().rate_spot(spot_id, draft).await {
        Ok(rating) => {
            store
                .dispatch(Action::Spots(SpotsAction::RatingCreated(rating.clone())))
                .await;
            Ok(rating)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn fetch_spot_ratings(store: &Store, spot_id: &str) -> Result<Vec<SpotRating>, String> {
    let ticket = store.begin(OpKey::SpotRatings(spot_id.to_string())).await;
    store.dispatch(Action::Spots(SpotsAction::Pending)).await;
    match store.api().spot_ratings(spot_id).await {
        Ok(ratings) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Spots(SpotsAction::RatingsFulfilled {
                        spot_id: spot_id.to_string(),
                        ratings: ratings.clone(),
                    }),
                )
                .await;
            Ok(ratings)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

async fn fail<T>(store: &Store, message: String) -> Result<T, String> {
    store
        .dispatch(Action::Spots(SpotsAction::Rejected(message.clone())))
        .await;
    Err(message)
}

async fn reject<T>(store: &Store, err: ApiError) -> Result<T, String> {
    let message = store.failure_message(&err).await;
    fail(store, message).await
}

async fn reject_latest<T>(store: &Store, ticket: &Ticket, err: ApiError) -> Result<T, String> {
    let message = store.failure_message(&err).await;
    store
        .dispatch_latest(ticket, Action::Spots(SpotsAction::Rejected(message.clone())))
        .await;
    Err(message)
}
