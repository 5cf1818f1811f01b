//! # Application Store
//!
//! One state tree for the whole client, mutated only through pure reducers.
//! Async operations live beside each slice; they perform the I/O and commit
//! their results as actions.
//!
//! ```text
//!   operation (async fn)
//!        │
//!        ├── begin(key) ────────────▶ sequence ticket
//!        │
//!        ├── dispatch(Pending) ─────▶ reduce() ──▶ version++
//!        │
//!        ├── ApiClient ─────────────▶ canonical data or ApiError
//!        │
//!        └── dispatch_latest(ticket, Fulfilled / Rejected)
//!                 │
//!                 ├── stale ticket? drop the resolution
//!                 └── latest? ──────▶ reduce() ──▶ version++ ──▶ watchers
//! ```
//!
//! Replace-style operations (fetches, searches, selections) take a ticket so
//! that of two racing calls writing to the same destination, the one issued
//! last determines the final state no matter which response arrives first.
//! Mutations (create, cancel, status changes) commit unconditionally.
//!
//! ## Modules
//!
//! - [`auth`]: session lifecycle (login, restore, refresh, logout, expiry)
//! - [`tourist_spots`]: browsing, company spots, admin queue, spot ratings
//! - [`tour_packages`]: browsing and company-owned package management
//! - [`bookings`]: tourist bookings and company booking summaries
//! - [`ratings`]: package ratings in three views
//! - [`users`]: admin user roster and profile editing

pub mod auth;
pub mod bookings;
pub mod ratings;
pub mod tour_packages;
pub mod tourist_spots;
pub mod users;

use std::collections::HashMap;

use log::{debug, warn};
use tokio::sync::{Mutex, RwLock, watch};

use crate::api::{ApiClient, ApiError};
use crate::core::session::SessionStore;

pub use auth::{AuthAction, AuthState};
pub use bookings::{BookingsAction, BookingsState};
pub use ratings::{RatingsAction, RatingsState};
pub use tour_packages::{PackagesAction, PackagesState};
pub use tourist_spots::{SpotsAction, SpotsState};
pub use users::{UsersAction, UsersState};

pub const NOT_SIGNED_IN_MESSAGE: &str = "You are not signed in.";

/// The whole client state: one slice per entity family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub spots: SpotsState,
    pub packages: PackagesState,
    pub bookings: BookingsState,
    pub ratings: RatingsState,
    pub users: UsersState,
}

/// Every state change in the client.
#[derive(Clone, Debug)]
pub enum Action {
    Auth(AuthAction),
    Spots(SpotsAction),
    Packages(PackagesAction),
    Bookings(BookingsAction),
    Ratings(RatingsAction),
    Users(UsersAction),
}

/// Routes an action to the owning slice reducer. Pure; no I/O.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Auth(action) => auth::reduce(&mut state.auth, action),
        Action::Spots(action) => tourist_spots::reduce(&mut state.spots, action),
        Action::Packages(action) => tour_packages::reduce(&mut state.packages, action),
        Action::Bookings(action) => bookings::reduce(&mut state.bookings, action),
        Action::Ratings(action) => ratings::reduce(&mut state.ratings, action),
        Action::Users(action) => users::reduce(&mut state.users, action),
    }
}

/// The destination a replace-style operation writes to. One in-flight winner
/// per key: beginning a new operation on a key invalidates every unresolved
/// older one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKey {
    Auth,
    Spots,
    SpotSelection,
    MySpots,
    PendingSpots,
    SpotRatings(String),
    Packages,
    PackageSelection,
    CompanyPackages,
    Bookings,
    CompanyBookings,
    UserRatings,
    PackageRatings(String),
    Users,
    Profile,
}

/// Proof of having been the latest operation issued for a key at `begin()`
/// time.
#[derive(Clone, Debug)]
pub struct Ticket {
    key: OpKey,
    seq: u64,
}

/// Owns the state tree, the API client, and the session store.
pub struct Store {
    state: RwLock<AppState>,
    seqs: Mutex<HashMap<OpKey, u64>>,
    version: watch::Sender<u64>,
    api: ApiClient,
    sessions: SessionStore,
}

impl Store {
    pub fn new(api: ApiClient, sessions: SessionStore) -> Self {
        let (version, _) = watch::channel(0);
        Store {
            state: RwLock::new(AppState::default()),
            seqs: Mutex::new(HashMap::new()),
            version,
            api,
            sessions,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// A snapshot of the current state.
    pub async fn read(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// The id of the signed-in user, when there is one.
    pub async fn current_user_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .auth
            .user
            .as_ref()
            .map(|user| user.id.clone())
    }

    /// A receiver on the version counter; it ticks once per committed action.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Claims the latest slot for `key`. Resolutions carrying an older ticket
    /// for the same key are dropped at commit time.
    pub async fn begin(&self, key: OpKey) -> Ticket {
        let mut seqs = self.seqs.lock().await;
        let seq = *seqs.entry(key.clone()).and_modify(|s| *s += 1).or_insert(1);
        Ticket { key, seq }
    }

    /// Commits unconditionally.
    pub async fn dispatch(&self, action: Action) {
        let mut state = self.state.write().await;
        reduce(&mut state, action);
        drop(state);
        self.version.send_modify(|v| *v += 1);
    }

    /// Commits only while `ticket` is still the latest for its key. Returns
    /// whether the action was applied.
    pub async fn dispatch_latest(&self, ticket: &Ticket, action: Action) -> bool {
        let seqs = self.seqs.lock().await;
        if seqs.get(&ticket.key) != Some(&ticket.seq) {
            debug!("Dropping stale resolution for {:?}", ticket.key);
            return false;
        }
        let mut state = self.state.write().await;
        reduce(&mut state, action);
        drop(state);
        drop(seqs);
        self.version.send_modify(|v| *v += 1);
        true
    }

    /// Converts an operation failure into display copy. A 401 while
    /// authenticated means the server stopped honoring our token, so the
    /// session is torn down before the caller commits its rejection.
    pub async fn failure_message(&self, err: &ApiError) -> String {
        if err.status() == Some(401) && self.state.read().await.auth.is_authenticated {
            self.handle_unauthorized().await;
        }
        err.user_message()
    }

    async fn handle_unauthorized(&self) {
        warn!("Authenticated request rejected with 401, clearing session");
        // Claim the auth slot: in-flight auth resolutions must not revive
        // the session being dropped.
        self.begin(OpKey::Auth).await;
        self.api.clear_token().await;
        if let Err(e) = self.sessions.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
        self.dispatch(Action::Auth(AuthAction::SessionExpired)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_store;

    #[tokio::test]
    async fn test_dispatch_commits_and_bumps_version() {
        let (store, _dir) = sample_store();
        let mut version = store.subscribe();
        assert!(!version.has_changed().unwrap());

        store.dispatch(Action::Auth(AuthAction::Pending)).await;

        assert!(version.has_changed().unwrap());
        assert!(store.read().await.auth.loading);
    }

    #[tokio::test]
    async fn test_stale_ticket_is_dropped() {
        let (store, _dir) = sample_store();
        let first = store.begin(OpKey::Spots).await;
        let second = store.begin(OpKey::Spots).await;

        let applied = store
            .dispatch_latest(&first, Action::Spots(SpotsAction::Rejected("old".to_string())))
            .await;
        assert!(!applied);
        assert_eq!(store.read().await.spots.error, None);

        let applied = store
            .dispatch_latest(&second, Action::Spots(SpotsAction::Rejected("new".to_string())))
            .await;
        assert!(applied);
        assert_eq!(store.read().await.spots.error, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_tickets_are_scoped_per_key() {
        let (store, _dir) = sample_store();
        let spots = store.begin(OpKey::Spots).await;
        // A newer operation on a different key must not invalidate this one
        store.begin(OpKey::Packages).await;

        let applied = store
            .dispatch_latest(&spots, Action::Spots(SpotsAction::ListFulfilled(vec![])))
            .await;
        assert!(applied);
    }

    #[tokio::test]
    async fn test_parameterized_keys_are_independent() {
        let (store, _dir) = sample_store();
        let p1 = store.begin(OpKey::PackageRatings("p1".to_string())).await;
        store.begin(OpKey::PackageRatings("p2".to_string())).await;

        let applied = store
            .dispatch_latest(
                &p1,
                Action::Ratings(RatingsAction::PackageFulfilled {
                    package_id: "p1".to_string(),
                    ratings: vec![],
                }),
            )
            .await;
        assert!(applied);
    }
}
