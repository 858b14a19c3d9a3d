//! DB-compatible (e.g. de/serialisable) types.
//!
//! The whole voting state is persisted as one document, keyed by
//! [`STORAGE_NAME`].

mod state;
pub use state::{StoredState, VotingState, STORAGE_NAME};
