//! # Tour Packages Slice
//!
//! Public package browsing plus the company-side lifecycle (create, update,
//! delete, own listings). Drafts are validated and normalized before any
//! request goes out; an invalid draft rejects without touching the network.

use log::info;

use crate::api::{ApiError, PackageQuery};
use crate::models::{PackageDraft, TourPackage};

use super::{Action, NOT_SIGNED_IN_MESSAGE, OpKey, Store, Ticket};

// ===== State =====

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackagesState {
    /// Publicly browsable packages; latest fetch wins.
    pub items: Vec<TourPackage>,
    pub selected: Option<TourPackage>,
    /// Packages owned by the signed-in company.
    pub company: Vec<TourPackage>,
    pub loading: bool,
    pub error: Option<String>,
}

// ===== Actions =====

#[derive(Clone, Debug)]
pub enum PackagesAction {
    Pending,
    ListFulfilled(Vec<TourPackage>),
    SelectFulfilled(TourPackage),
    CompanyFulfilled(Vec<TourPackage>),
    CreateFulfilled(TourPackage),
    UpdateFulfilled(TourPackage),
    DeleteFulfilled(String),
    Rejected(String),
}

pub fn reduce(state: &mut PackagesState, action: PackagesAction) {
    match action {
        PackagesAction::Pending => {
            state.loading = true;
            state.error = None;
        }
        PackagesAction::ListFulfilled(packages) => {
            state.items = packages;
            settle(state);
        }
        PackagesAction::SelectFulfilled(package) => {
            state.selected = Some(package);
            settle(state);
        }
        PackagesAction::CompanyFulfilled(packages) => {
            state.company = packages;
            settle(state);
        }
        PackagesAction::CreateFulfilled(package) => {
            state.items.insert(0, package.clone());
            state.company.insert(0, package);
            settle(state);
        }
        PackagesAction::UpdateFulfilled(package) => {
            replace_by_id(&mut state.items, &package);
            replace_by_id(&mut state.company, &package);
            if state.selected.as_ref().is_some_and(|p| p.id == package.id) {
                state.selected = Some(package);
            }
            settle(state);
        }
        PackagesAction::DeleteFulfilled(id) => {
            state.items.retain(|p| p.id != id);
            state.company.retain(|p| p.id != id);
            if state.selected.as_ref().is_some_and(|p| p.id == id) {
                state.selected = None;
            }
            settle(state);
        }
        PackagesAction::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

fn settle(state: &mut PackagesState) {
    state.loading = false;
    state.error = None;
}

fn replace_by_id(list: &mut [TourPackage], package: &TourPackage) {
    if let Some(slot) = list.iter_mut().find(|p| p.id == package.id) {
        *slot = package.clone();
    }
}

// ===== Operations =====

pub async fn fetch_packages(
    store: &Store,
    query: &PackageQuery,
) -> Result<Vec<TourPackage>, String> {
    let ticket = store.begin(OpKey::Packages).await;
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().list_packages(query).await {
        Ok(packages) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Packages(PackagesAction::ListFulfilled(packages.clone())),
                )
                .await;
            Ok(packages)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn select_package(store: &Store, id: &str) -> Result<TourPackage, String> {
    let ticket = store.begin(OpKey::PackageSelection).await;
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().get_package(id).await {
        Ok(package) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Packages(PackagesAction::SelectFulfilled(package.clone())),
                )
                .await;
            Ok(package)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

/// Lists the signed-in company's packages.
pub async fn fetch_company_packages(store: &Store) -> Result<Vec<TourPackage>, String> {
    let Some(company_id) = store.current_user_id().await else {
        return fail(store, NOT_SIGNED_IN_MESSAGE.to_string()).await;
    };
    let ticket = store.begin(OpKey::CompanyPackages).await;
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().company_packages(&company_id).await {
        Ok(packages) => {
            store
                .dispatch_latest(
                    &ticket,
                    Action::Packages(PackagesAction::CompanyFulfilled(packages.clone())),
                )
                .await;
            Ok(packages)
        }
        Err(err) => reject_latest(store, &ticket, err).await,
    }
}

pub async fn create_package(store: &Store, draft: &PackageDraft) -> Result<TourPackage, String> {
    if let Err(e) = draft.validate() {
        return fail(store, e.to_string()).await;
    }
    let draft = draft.clone().normalized();
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().create_package(&draft).await {
        Ok(package) => {
            info!("Created package {} ({})", package.name, package.id);
            store
                .dispatch(Action::Packages(PackagesAction::CreateFulfilled(package.clone())))
                .await;
            Ok(package)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn update_package(
    store: &Store,
    id: &str,
    draft: &PackageDraft,
) -> Result<TourPackage, String> {
    if let Err(e) = draft.validate() {
        return fail(store, e.to_string()).await;
    }
    let draft = draft.clone().normalized();
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().update_package(id, &draft).await {
        Ok(package) => {
            store
                .dispatch(Action::Packages(PackagesAction::UpdateFulfilled(package.clone())))
                .await;
            Ok(package)
        }
        Err(err) => reject(store, err).await,
    }
}

pub async fn delete_package(store: &Store, id: &str) -> Result<(), String> {
    store.dispatch(Action::Packages(PackagesAction::Pending)).await;
    match store.api().delete_package(id).await {
        Ok(()) => {
            info!("Deleted package {}", id);
            store
                .dispatch(Action::Packages(PackagesAction::DeleteFulfilled(id.to_string())))
                .await;
            Ok(())
        }
        Err(err) => reject(store, err).await,
    }
}

async fn fail<T>(store: &Store, message: String) -> Result<T, String> {
    store
        .dispatch(Action::Packages(PackagesAction::Rejected(message.clone())))
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
        .dispatch_latest(ticket, Action::Packages(PackagesAction::Rejected(message.clone())))
        .await;
    Err(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_package;

    #[test]
    fn test_list_replaces_collection() {
        let mut state = PackagesState {
            items: vec![sample_package("old")],
            ..PackagesState::default()
        };
        reduce(&mut state, PackagesAction::Pending);
        assert!(state.loading);

        reduce(
            &mut state,
            PackagesAction::ListFulfilled(vec![sample_package("p1"), sample_package("p2")]),
        );
        assert_eq!(state.items.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_create_prepends_to_both_views() {
        let mut state = PackagesState {
            items: vec![sample_package("p1")],
            company: vec![sample_package("p1")],
            ..PackagesState::default()
        };
        reduce(&mut state, PackagesAction::CreateFulfilled(sample_package("p2")));
        assert_eq!(state.items[0].id, "p2");
        assert_eq!(state.company[0].id, "p2");
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_update_patches_matching_package_only() {
        let mut state = PackagesState {
            items: vec![sample_package("p1"), sample_package("p2")],
            selected: Some(sample_package("p2")),
            ..PackagesState::default()
        };
        let mut updated = sample_package("p2");
        updated.price = 999.0;

        reduce(&mut state, PackagesAction::UpdateFulfilled(updated));
        assert_eq!(state.items[0].price, sample_package("p1").price);
        assert_eq!(state.items[1].price, 999.0);
        assert_eq!(state.selected.as_ref().map(|p| p.price), Some(999.0));
    }

    #[test]
    fn test_delete_removes_and_clears_selection() {
        let mut state = PackagesState {
            items: vec![sample_package("p1")],
            company: vec![sample_package("p1")],
            selected: Some(sample_package("p1")),
            ..PackagesState::default()
        };
        reduce(&mut state, PackagesAction::DeleteFulfilled("p1".to_string()));
        assert!(state.items.is_empty());
        assert!(state.company.is_empty());
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_selection_survives_list_refresh() {
        let mut state = PackagesState::default();
        reduce(&mut state, PackagesAction::SelectFulfilled(sample_package("p1")));
        reduce(&mut state, PackagesAction::ListFulfilled(vec![sample_package("p2")]));
        assert_eq!(state.selected.as_ref().map(|p| p.id.as_str()), Some("p1"));
    }
}
