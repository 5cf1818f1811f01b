//! # Package Ratings Slice
//!
//! Package ratings in three views: the flat list of ratings submitted this
//! session, the signed-in user's ratings, and per-package buckets. A created
//! rating lands in all three; fetches replace exactly one view.

use std::collections::HashMap;

use crate::api::ApiError;
use crate::models::{Rating, RatingDraft};

use super::{Action, NOT_SIGNED_IN_MESSAGE, OpKey, Store, Ticket};

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingsState {
    /// Ratings submitted this session, in submission order.
    pub ratings: Vec<Rating>,
    /// The signed-in user's ratings.
    pub user_ratings: Vec<Rating>,
    /// Ratings keyed by package id; each bucket is replaced independently.
    pub package_ratings: HashMap<String, Vec<Rating>>,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum RatingsAction {
    Pending,
    CreateFulfilled(Rating),
    PackageFulfilled {
        package_id: String,
        ratings: Vec<Rating>,
    },
    UserFulfilled(Vec<Rating>),
    Rejected(String),
}

pub fn reduce(state: &mut RatingsState, action: RatingsAction) {
    match action {
        RatingsAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        RatingsAction::CreateFulfilled(rating) => {
            state.ratings.push(rating.clone());
            state.user_ratings.push(rating.clone());
            state
                .package_ratings
                .entry(rating.tour_package_id.clone())
                .or_default()
                .push(rating);
            settle(state);
        }
        RatingsAction::PackageFulfilled {
            package_id,
            ratings,
        } => {
            state.package_ratings.insert(package_id, ratings);
            settle(state);
        }
        RatingsAction::UserFulfilled(ratings) => {
            state.user_ratings = ratings;
            settle(state);
        }
        RatingsAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

fn settle(state: &mut RatingsState) {
    state.loading = false;
    state.error = None;
}

// ===== Operations =====

/// Rates a package. An out-of-range rating is rejected here without a
/// request.
pub async fn create_rating(store: &Store, draft: &RatingDraft) -> Result<Rating, String> {
    if let Err(e) = draft.validate() {
        return fail(store, e.to_string()).await;
    }
    store.dispatch(Action::Ratings(RatingsAction::Pending)).await;
    match store.api().create_rating(draft).await {
        Ok(rating) => {
            store
                .dispatch(Action::Ratings(RatingsAction::CreateFulfilled(rating.clone())))
                .await;
            Ok(rating)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn fetch_package_ratings(
    store: &Store,
    package_id: &str,
) -> Result<Vec<Rating>, String> {
    let ticket = store
        .begin(OpKey::PackageRatings(package_id.to_string()))
        .await;
    store.dispatch(Action::Ratings(RatingsAction::Pending)).await;
    match store.api().package_ratings(package_id).await {
        Ok(ratings) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Ratings(RatingsAction::PackageFulfilled {
                        package_id: package_id.to_string(),
                        ratings: ratings.clone(),
                    }),
                )
                .await;
            Ok(ratings)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// The signed-in user's ratings.
pub async fn fetch_user_ratings(store: &Store) -> Result<Vec<Rating>, String> {
    let Some(user_id) = store.current_user_id().await else {
        return fail(store, NOT_SIGNED_IN_MESSAGE.to_string()).await;
    };
    let ticket = store.begin(OpKey::UserRatings).await;
    store.dispatch(Action::Ratings(RatingsAction::Pending)).await;
    match store.api().user_ratings(&user_id).await {
        Ok(ratings) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Ratings(RatingsAction::UserFulfilled(ratings.clone())),
                )
                .await;
            Ok(ratings)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

async fn fail<T>(store: &Store, message: String) -> Result<T, String> {
    store
        .dispatch(Action::Ratings(RatingsAction::Rejected(message.clone())))
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
        .dispatch_latest(ticket, Action::Ratings(RatingsAction::Rejected(message.clone())))
        .await;
    Err(message)
}
