//! # Users Slice
//!
//! The admin user roster and profile viewing/editing. The session user is
//! owned by the auth slice; a successful profile update of one's own account
//! also commits an auth refresh so both views agree.

use log::info;

use crate::api::{ApiError, UserQuery};
use crate::models::{ProfileUpdate, User};

use super::auth::{self, AuthAction};
use super::{Action, NOT_SIGNED_IN_MESSAGE, OpKey, Store, Ticket};

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsersState {
    /// Admin roster, latest fetch wins.
    pub items: Vec<User>,
    /// Total matching the roster query, from the server's count.
    pub total: u64,
    /// The profile being viewed or edited.
    pub profile: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum UsersAction {
    Pending,
    ListFulfilled { users: Vec<User>, total: u64 },
    /// The server acknowledges activation changes with a message only, so
    /// the matching user is patched in place.
    StatusFulfilled { id: String, is_active: bool },
    ProfileFulfilled(User),
    Rejected(String),
}

pub fn reduce(state: &mut UsersState, action: UsersAction) {
    match action {
        UsersAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        UsersAction::ListFulfilled { users, total } => {
            state.items = users;
            state.total = total;
            settle(state);
        }
        UsersAction::StatusFulfilled { id, is_active } => {
            if let Some(user) = state.items.iter_mut().find(|u| u.id == id) {
                user.is_active = is_active;
            }
            if let Some(profile) = state.profile.as_mut() {
                if profile.id == id {
                    profile.is_active = is_active;
                }
            }
            settle(state);
        }
        UsersAction::ProfileFulfilled(user) => {
            state.profile = Some(user);
            settle(state);
        }
        UsersAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

fn settle(state: &mut UsersState) {
    state.loading = false;
    state.error = None;
}

// ===== Operations =====

/// Admin: the user roster with the server's total for the query.
pub async fn fetch_users(store: &Store, query: &UserQuery) -> Result<Vec<User>, String> {
    let ticket = store.begin(OpKey::Users).await;
    store.dispatch(Action::Users(UsersAction::Pending)).await;
    match store.api().admin_users(query).await {
        Ok((users, total)) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Users(UsersAction::ListFulfilled {
                        users: users.clone(),
                        total,
                    }),
                )
                .await;
            Ok(users)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// Admin: activate or deactivate an account.
pub async fn set_user_active(store: &Store, id: &str, is_active: bool) -> Result<(), String> {
    store.dispatch(Action::Users(UsersAction::Pending)).await;
    match store.api().set_user_active(id, is_active).await {
        Ok(()) => {
            info!(
                "User {} {}",
                id,
                if is_active { "activated" } else { "deactivated" }
            );
            store
                .dispatch(Action::Users(UsersAction::StatusFulfilled {
                    id: id.to_string(),
                    is_active,
                }))
                .await;
            Ok(())
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn fetch_user(store: &Store, id: &str) -> Result<User, String> {
    let ticket = store.begin(OpKey::Profile).await;
    store.dispatch(Action::Users(UsersAction::Pending)).await;
    match store.api().get_user(id).await {
        Ok(user) => {
            store
                .dispatch_latest(&ticket, Action::Users(UsersAction::ProfileFulfilled(user.clone())))
                .await;
            Ok(user)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// Updates the signed-in user's profile. The auth slice and the persisted
/// session are refreshed with the server's copy.
pub async fn update_profile(store: &Store, update: &ProfileUpdate) -> Result<User, String> {
    let Some(user_id) = store.current_user_id().await else {
        return fail(store, NOT_SIGNED_IN_MESSAGE.to_string()).await;
    };
    store.dispatch(Action::Users(UsersAction::Pending)).await;
    match store.api().update_profile(&user_id, update).await {
        Ok(user) => {
            store
                .dispatch(Action::Users(UsersAction::ProfileFulfilled(user.clone())))
                .await;
            store
                .dispatch(Action::Auth(AuthAction::MeFulfilled(user.clone())))
                .await;
            if let Some(token) = store.api().token().await {
                auth::persist_session(store, &token, &user);
            }
            Ok(user)
        }
        Err(err) => reject(store, err).await,
    }
}

async fn fail<T>(store: &Store, message: String) -> Result<T, String> {
    store
        .dispatch(Action::Users(UsersAction::Rejected(message.clone())))
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
        .dispatch_latest(ticket, Action::Users(UsersAction::Rejected(message.clone())))
        .await;
    Err(message)
}
