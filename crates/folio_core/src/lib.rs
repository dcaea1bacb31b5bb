//! Core content store for the folio portfolio site.
//! Owns the project/achievement collections, their persistence and the
//! export/import format; presentation layers only consume this API.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::FolioConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::achievement::{Achievement, AchievementDraft, AchievementPatch};
pub use model::project::{Project, ProjectDraft, ProjectPatch, ProjectStatus};
pub use model::{parse_tags, EntityId, Timestamp};
pub use repo::kv_repo::{KvError, KvResult, KvStore, SqliteKvStore};
pub use service::admin_session::AdminSession;
pub use service::content_store::{
    ContentStats, ContentStore, ImportSummary, ResetConfirmation, StoreError, StoreResult,
};
pub use service::snapshot::{export_file_name, ImportError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
