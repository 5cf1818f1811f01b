//! # Bookings Slice
//!
//! The tourist's own bookings and the company-side booking summaries.
//! Status changes are gated locally by the booking state machine (pending →
//! confirmed → completed, cancellable until terminal) whenever the current
//! status is known; the server remains the final arbiter.

use log::info;

use crate::api::ApiError;
use crate::models::{Booking, BookingDraft, BookingStatus, BookingSummary};

use super::{Action, NOT_SIGNED_IN_MESSAGE, OpKey, Store, Ticket};

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingsState {
    /// The signed-in tourist's bookings.
    pub items: Vec<Booking>,
    /// Bookings against the signed-in company's packages, with the related
    /// tourist and package attached.
    pub company: Vec<BookingSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum BookingsAction {
    Pending,
    ListFulfilled(Vec<Booking>),
    CompanyFulfilled(Vec<BookingSummary>),
    CreateFulfilled(Booking),
    /// Cancel or status change: the server's record replaces ours.
    PatchFulfilled(Booking),
    Rejected(String),
}

pub fn reduce(state: &mut BookingsState, action: BookingsAction) {
    match action {
        BookingsAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        BookingsAction::ListFulfilled(bookings) => {
            state.items = bookings;
            settle(state);
        }
        BookingsAction::CompanyFulfilled(summaries) => {
            state.company = summaries;
            settle(state);
        }
        BookingsAction::CreateFulfilled(booking) => {
            state.items.insert(0, booking);
            settle(state);
        }
        BookingsAction::PatchFulfilled(booking) => {
            if let Some(slot) = state.items.iter_mut().find(|b| b.id == booking.id) {
                *slot = booking.clone();
            }
            if let Some(summary) = state.company.iter_mut().find(|s| s.booking.id == booking.id)
            {
                summary.booking = booking;
            }
            settle(state);
        }
        BookingsAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

fn settle(state: &mut BookingsState) {
    state.loading = false;
    state.error = None;
}

// ===== Operations =====

/// The signed-in user's bookings, newest first as the server returns them.
pub async fn fetch_user_bookings(store: &Store) -> Result<Vec<Booking>, String> {
    let Some(user_id) = store.current_user_id().await else {
        return fail(store, NOT_SIGNED_IN_MESSAGE.to_string()).await;
    };
    let ticket = store.begin(OpKey::Bookings).await;
    store.dispatch(Action::Bookings(BookingsAction::Pending)).await;
    match store.api().user_bookings(&user_id).await {
        Ok(bookings) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Bookings(BookingsAction::ListFulfilled(bookings.clone())),
                )
                .await;
            Ok(bookings)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn fetch_company_bookings(store: &Store) -> Result<Vec<BookingSummary>, String> {
    let ticket = store.begin(OpKey::CompanyBookings).await;
    store.dispatch(Action::Bookings(BookingsAction::Pending)).await;
    match store.api().company_bookings().await {
        Ok(summaries) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Bookings(BookingsAction::CompanyFulfilled(summaries.clone())),
                )
                .await;
            Ok(summaries)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// Books a package or a spot. An invalid draft (no reference, both
/// references, zero participants) rejects without a request.
pub async fn create_booking(store: &Store, draft: &BookingDraft) -> Result<Booking, String> {
    if let Err(e) = draft.validate() {
        return fail(store, e.to_string()).await;
    }
    store.dispatch(Action::Bookings(BookingsAction::Pending)).await;
    match store.api().create_booking(draft).await {
        Ok(booking) => {
            info!(
                "Created booking {} ({} participants)",
                booking.id, booking.participants_count
            );
            store
                .dispatch(Action::Bookings(BookingsAction::CreateFulfilled(booking.clone())))
                .await;
            Ok(booking)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn cancel_booking(store: &Store, id: &str) -> Result<Booking, String> {
    if let Some(current) = known_status(store, id).await {
        if let Err(message) = guard_transition(current, BookingStatus::Cancelled) {
            return fail(store, message).await;
        }
    }
    store.dispatch(Action::Bookings(BookingsAction::Pending)).await;
    match store.api().cancel_booking(id).await {
        Ok(booking) => {
            info!("Cancelled booking {}", booking.id);
            store
                .dispatch(Action::Bookings(BookingsAction::PatchFulfilled(booking.clone())))
                .await;
            Ok(booking)
        }
        Err(err) => reject(store, err).await,
    }
}

/// Company/admin: move a booking to `status`.
pub async fn update_booking_status(
    store: &Store,
    id: &str,
    status: BookingStatus,
) -> Result<Booking, String> {
    if let Some(current) = known_status(store, id).await {
        if let Err(message) = guard_transition(current, status) {
            return fail(store, message).await;
        }
    }
    store.dispatch(Action::Bookings(BookingsAction::Pending)).await;
    match store.api().update_booking_status(id, status).await {
        Ok(booking) => {
            info!("Booking {} is now {}", booking.id, booking.status);
            store
                .dispatch(Action::Bookings(BookingsAction::PatchFulfilled(booking.clone())))
                .await;
            Ok(booking)
        }
        Err(err) => reject(store, err).await,
    }
}

/// The booking's status as this client last saw it, from either collection.
async fn known_status(store: &Store, id: &str) -> Option<BookingStatus> {
    let state = store.read().await;
    state
        .bookings
        .items
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.status)
        .or_else(|| {
            state
                .bookings
                .company
                .iter()
                .find(|s| s.booking.id == id)
                .map(|s| s.booking.status)
        })
}

fn guard_transition(current: BookingStatus, next: BookingStatus) -> Result<(), String> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(format!("Cannot transition a {current} booking to {next}"))
    }
}

async fn fail<T>(store: &Store, message: String) -> Result<T, String> {
    store
        .dispatch(Action::Bookings(BookingsAction::Rejected(message.clone())))
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
        .dispatch_latest(ticket, Action::Bookings(BookingsAction::Rejected(message.clone())))
        .await;
    Err(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_booking, sample_package, sample_user};

    fn summary(id: &str) -> BookingSummary {
        BookingSummary {
            booking: sample_booking(id),
            user: Some(sample_user("1")),
            tour_package: Some(sample_package("p1")),
        }
    }

    #[test]
    fn test_create_prepends() {
        let mut state = BookingsState {
            items: vec![sample_booking("b1")],
            ..BookingsState::default()
        };
        reduce(&mut state, BookingsAction::CreateFulfilled(sample_booking("b2")));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].id, "b2");
        assert_eq!(state.items[1].id, "b1");
    }

    #[test]
    fn test_patch_replaces_exactly_one() {
        let mut state = BookingsState {
            items: vec![sample_booking("b1"), sample_booking("b2")],
            ..BookingsState::default()
        };
        let untouched = state.items[1].clone();
        let mut cancelled = sample_booking("b1");
        cancelled.status = BookingStatus::Cancelled;

        reduce(&mut state, BookingsAction::PatchFulfilled(cancelled));
        assert_eq!(state.items[0].status, BookingStatus::Cancelled);
        assert_eq!(state.items[1], untouched);
    }

    #[test]
    fn test_patch_reaches_company_summaries() {
        let mut state = BookingsState {
            company: vec![summary("b1"), summary("b2")],
            ..BookingsState::default()
        };
        let mut confirmed = sample_booking("b2");
        confirmed.status = BookingStatus::Confirmed;

        reduce(&mut state, BookingsAction::PatchFulfilled(confirmed));
        assert_eq!(state.company[0].booking.status, BookingStatus::Pending);
        assert_eq!(state.company[1].booking.status, BookingStatus::Confirmed);
        // Related records ride along untouched
        assert!(state.company[1].tour_package.is_some());
    }

    #[test]
    fn test_guard_refuses_terminal_transitions() {
        assert!(guard_transition(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
        assert!(guard_transition(BookingStatus::Confirmed, BookingStatus::Completed).is_ok());

        let err = guard_transition(BookingStatus::Completed, BookingStatus::Cancelled)
            .unwrap_err();
        assert_eq!(err, "Cannot transition a completed booking to cancelled");

        assert!(guard_transition(BookingStatus::Cancelled, BookingStatus::Confirmed).is_err());
        assert!(guard_transition(BookingStatus::Pending, BookingStatus::Completed).is_err());
    }
}
