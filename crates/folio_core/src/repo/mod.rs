//! Repository layer over durable key-value storage.
//!
//! # Responsibility
//! - Define the string key/value contract the content store persists through.
//! - Keep SQLite details out of the store service.
//!
//! # Invariants
//! - A `set` fully replaces the previous value for a key (last write wins).
//! - Repositories never interpret values; decoding belongs to callers.

pub mod kv_repo;
