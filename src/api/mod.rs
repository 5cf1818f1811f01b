//! # API Layer
//!
//! Everything that touches the wire lives here: the HTTP client, the error
//! classification, and the normalization of drifted server payloads into
//! canonical `models` types. Callers above this layer (the state slices)
//! only ever handle canonical shapes and `ApiError`.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{LoginSession, PackageQuery, SpotQuery, UserQuery};
