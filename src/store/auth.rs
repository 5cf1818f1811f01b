//! # Auth Slice
//!
//! Owns the signed-in user and bearer token across their whole lifecycle:
//! login, registration, restore-from-disk, token refresh, profile re-fetch,
//! password change, logout, and forced expiry. Login and refresh install the
//! token in the API client and persist the session document; logout and
//! expiry remove both.

use log::{debug, info, warn};

use crate::api::ApiError;
use crate::core::session::StoredSession;
use crate::models::{NewUser, User};

use super::{Action, OpKey, Store};

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

const INVALID_CREDENTIALS_MESSAGE: &str =
    "Invalid email or password. Please check your credentials and try again.";

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum AuthAction {
    Pending,
    /// Credentials accepted; the session is live.
    LoginFulfilled { token: String, user: User },
    /// Account created. No token is issued; the user signs in separately.
    RegisterFulfilled(User),
    /// Fresh copy of the session user.
    MeFulfilled(User),
    PasswordChanged,
    /// Session rehydrated from disk at startup.
    Restored { token: String, user: User },
    LoggedOut,
    /// The server stopped honoring our token.
    SessionExpired,
    Rejected(String),
}

pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        AuthAction::LoginFulfilled { token, user } | AuthAction::Restored { token, user } => {
            state.user = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
            state.loading = false;
            state.error = None;
        }
        AuthAction::RegisterFulfilled(user) => {
            state.user = Some(user);
            state.token = None;
            state.is_authenticated = false;
            state.loading = false;
            state.error = None;
        }
        AuthAction::MeFulfilled(user) => {
            state.user = Some(user);
            state.loading = false;
            state.error = None;
        }
        AuthAction::PasswordChanged => {
            state.loading = false;
            state.error = None;
        }
        AuthAction::LoggedOut => {
            *state = AuthState::default();
        }
        AuthAction::SessionExpired => {
            *state = AuthState::default();
            state.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        }
        AuthAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

// ===== Operations =====

/// Exchanges credentials for a session: commits the signed-in state, installs
/// the token in the API client, and persists the session document.
pub async fn login(store: &Store, email: &str, password: &str) -> Result<User, String> {
    let ticket = store.begin(OpKey::Auth).await;
    store.dispatch(Action::Auth(AuthAction::Pending)).await;

    match store.api().login(email, password).await {
        Ok(session) => {
            let committed = store
                .dispatch_latest(
                    &ticket,
                    Action::Auth(AuthAction::LoginFulfilled {
                        token: session.access_token.clone(),
                        user: session.user.clone(),
                    }),
                )
                .await;
            if !committed {
                debug!("Login result superseded, not installing the session");
                return Err("Sign-in was superseded by a newer request".to_string());
            }
            store.api().set_token(&session.access_token).await;
            persist_session(store, &session.access_token, &session.user);
            info!("Signed in as {} ({})", session.user.email, session.user.role);
            Ok(session.user)
        }
        Err(err) => {
            let message = login_error_message(&err);
            store
                .dispatch_latest(&ticket, Action::Auth(AuthAction::Rejected(message.clone())))
                .await;
            Err(message)
        }
    }
}

/// Creates an account. Travel company accounts start inactive and wait for
/// admin approval before they can sign in.
pub async fn register(store: &Store, new_user: &NewUser) -> Result<User, String> {
    store.dispatch(Action::Auth(AuthAction::Pending)).await;
    match store.api().signup(new_user).await {
        Ok(user) => {
            info!("Registered {} as {}", user.email, user.role);
            store
                .dispatch(Action::Auth(AuthAction::RegisterFulfilled(user.clone())))
                .await;
            Ok(user)
        }
        Err(err) => {
            let message = store.failure_message(&err).await;
            store
                .dispatch(Action::Auth(AuthAction::Rejected(message.clone())))
                .await;
            Err(message)
        }
    }
}

/// Re-fetches the session user and refreshes the persisted copy.
pub async fn fetch_me(store: &Store) -> Result<User, String> {
    let ticket = store.begin(OpKey::Auth).await;
    store.dispatch(Action::Auth(AuthAction::Pending)).await;
    match store.api().me().await {
        Ok(user) => {
            let committed = store
                .dispatch_latest(&ticket, Action::Auth(AuthAction::MeFulfilled(user.clone())))
                .await;
            if committed {
                if let Some(token) = store.api().token().await {
                    persist_session(store, &token, &user);
                }
            }
            Ok(user)
        }
        Err(err) => {
            let message = store.failure_message(&err).await;
            store
                .dispatch_latest(&ticket, Action::Auth(AuthAction::Rejected(message.clone())))
                .await;
            Err(message)
        }
    }
}

/// Trades the current token for a fresh one without re-entering credentials.
pub async fn refresh_session(store: &Store) -> Result<User, String> {
    let ticket = store.begin(OpKey::Auth).await;
    store.dispatch(Action::Auth(AuthAction::Pending)).await;
    match store.api().refresh().await {
        Ok(session) => {
            let committed = store
                .dispatch_latest(
                    &ticket,
                    Action::Auth(AuthAction::LoginFulfilled {
                        token: session.access_token.clone(),
                        user: session.user.clone(),
                    }),
                )
                .await;
            if committed {
                store.api().set_token(&session.access_token).await;
                persist_session(store, &session.access_token, &session.user);
            }
            Ok(session.user)
        }
        Err(err) => {
            let message = store.failure_message(&err).await;
            store
                .dispatch_latest(&ticket, Action::Auth(AuthAction::Rejected(message.clone())))
                .await;
            Err(message)
        }
    }
}

pub async fn change_password(
    store: &Store,
    old_password: &str,
    new_password: &str,
) -> Result<(), String> {
    store.dispatch(Action::Auth(AuthAction::Pending)).await;
    match store.api().change_password(old_password, new_password).await {
        Ok(()) => {
            store.dispatch(Action::Auth(AuthAction::PasswordChanged)).await;
            Ok(())
        }
        Err(err) => {
            let message = store.failure_message(&err).await;
            store
                .dispatch(Action::Auth(AuthAction::Rejected(message.clone())))
                .await;
            Err(message)
        }
    }
}

/// Drops the session from memory, the API client, and disk. Also claims the
/// auth slot so an in-flight login cannot resurrect the session afterwards.
pub async fn logout(store: &Store) {
    store.begin(OpKey::Auth).await;
    store.api().clear_token().await;
    if let Err(e) = store.sessions().clear() {
        warn!("Failed to clear stored session: {}", e);
    }
    store.dispatch(Action::Auth(AuthAction::LoggedOut)).await;
    info!("Signed out");
}

/// Rehydrates the session from disk at startup. Missing or unreadable state
/// leaves the store signed out.
pub async fn restore_session(store: &Store) -> bool {
    let stored = match store.sessions().load() {
        Ok(Some(stored)) => stored,
        Ok(None) => return false,
        Err(e) => {
            warn!("Could not read stored session: {}", e);
            return false;
        }
    };
    store.api().set_token(&stored.access_token).await;
    debug!("Restored session for {}", stored.user.email);
    store
        .dispatch(Action::Auth(AuthAction::Restored {
            token: stored.access_token,
            user: stored.user,
        }))
        .await;
    true
}

pub(super) fn persist_session(store: &Store, access_token: &str, user: &User) {
    let session = StoredSession {
        access_token: access_token.to_string(),
        user: user.clone(),
    };
    if let Err(e) = store.sessions().save(&session) {
        warn!("Failed to persist session: {}", e);
    }
}

/// The server's credential rejections collapse into one neutral line; a
/// failed login never reveals which half was wrong. Account-standing
/// messages (pending approval, deactivated) already carry copy meant for
/// the user and pass through as-is.
fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { message, .. }
            if message.starts_with("Incorrect email or password")
                || message.starts_with("No account found") =>
        {
            INVALID_CREDENTIALS_MESSAGE.to_string()
        }
        other => other.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;

    #[test]
    fn test_login_fulfilled_sets_session() {
        let mut state = AuthState::default();
        reduce(&mut state, AuthAction::Pending);
        assert!(state.loading);

        reduce(
            &mut state,
            AuthAction::LoginFulfilled {
                token: "T".to_string(),
                user: sample_user("1"),
            },
        );
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("T"));
        assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("1"));
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_register_leaves_unauthenticated() {
        let mut state = AuthState::default();
        reduce(&mut state, AuthAction::RegisterFulfilled(sample_user("2")));
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
        assert!(state.user.is_some());
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut state = AuthState {
            user: Some(sample_user("1")),
            token: Some("T".to_string()),
            is_authenticated: true,
            loading: false,
            error: Some("stale".to_string()),
        };
        reduce(&mut state, AuthAction::LoggedOut);
        assert_eq!(state, AuthState::default());
    }

    #[test]
    fn test_session_expired_keeps_only_the_message() {
        let mut state = AuthState {
            user: Some(sample_user("1")),
            token: Some("T".to_string()),
            is_authenticated: true,
            loading: true,
            error: None,
        };
        reduce(&mut state, AuthAction::SessionExpired);
        assert!(!state.is_authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.token, None);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[test]
    fn test_rejected_keeps_current_user() {
        let mut state = AuthState {
            user: Some(sample_user("1")),
            token: Some("T".to_string()),
            is_authenticated: true,
            loading: true,
            error: None,
        };
        reduce(&mut state, AuthAction::Rejected("boom".to_string()));
        assert!(state.is_authenticated);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_login_error_message_collapses_credential_failures() {
        let wrong_password = ApiError::Http {
            status: 401,
            message: "Incorrect email or password. Please check your credentials and try again."
                .to_string(),
        };
        let no_account = ApiError::Http {
            status: 404,
            message: "No account found with this email address. Please check your email or sign up for a new account."
                .to_string(),
        };
        assert_eq!(login_error_message(&wrong_password), INVALID_CREDENTIALS_MESSAGE);
        assert_eq!(login_error_message(&no_account), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn test_login_error_message_passes_through_account_standing() {
        let pending = ApiError::Http {
            status: 403,
            message: "Your travel company account is pending admin approval. Please wait for approval notification."
                .to_string(),
        };
        assert_eq!(
            login_error_message(&pending),
            "Your travel company account is pending admin approval. Please wait for approval notification."
        );

        let network = ApiError::Network("refused".to_string());
        assert_eq!(
            login_error_message(&network),
            "Network error. Please check your connection and try again."
        );
    }
}
