//! Content use-case services.
//!
//! # Responsibility
//! - Own the in-memory project/achievement collections and write them
//!   through to key-value storage.
//! - Encode and decode export snapshots.
//! - Gate admin tooling behind a password session.

pub mod admin_session;
mod collection;
pub mod content_store;
pub mod snapshot;
