//! # Wayfarer
//!
//! Client-side layer for a tourist-spot and tour-package booking platform:
//! an HTTP API client with per-entity wire normalization, a persistent
//! session store, and a composed application store with one slice per
//! entity family. The binary in `main.rs` is a thin CLI consumer that
//! dispatches slice operations and prints state snapshots.

pub mod api;
pub mod cli;
pub mod core;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod test_support;
