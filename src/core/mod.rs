//! # Host Environment
//!
//! Everything the client needs from the machine it runs on: configuration
//! resolution and the persisted session. It knows nothing about HTTP or
//! application state.
//!
//! ```text
//!     ┌──────────────────────────────┐
//!     │           CORE               │
//!     │  (this module)               │
//!     │                              │
//!     │  • config (file / env / CLI) │
//!     │  • session (token + user)    │
//!     └──────────────┬───────────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!   ┌────────────┐      ┌────────────┐
//!   │   Store    │      │ ApiClient  │
//!   │ (restore / │      │ (base URL) │
//!   │  persist)  │      │            │
//!   └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `~/.wayfarer/config.toml`, env vars, CLI overrides
//! - [`session`]: the `session.json` document and legacy-file migration

pub mod config;
pub mod session;

pub use config::{ResolvedConfig, load_config, resolve};
pub use session::{SessionStore, StoredSession};
