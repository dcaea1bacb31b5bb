//! Export/import snapshot format.
//!
//! # Responsibility
//! - Encode both managed collections into one pretty-printed JSON document.
//! - Decode and structurally validate a document before any store mutation.
//!
//! # Invariants
//! - `decode_snapshot(encode_snapshot(..))` yields the same collections.
//! - Decoding is all-or-nothing: any malformed entity rejects the payload.
//!
//! Document shape:
//! `{ "version": 1, "exportedAt": "...", "adminMode": true,
//!    "projects": [...], "achievements": [...] }`.
//! Only `projects` and `achievements` are required to be recognized; at least
//! one of them must be present.

use crate::model::achievement::Achievement;
use crate::model::project::Project;
use crate::model::{Entity, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Structural failure while importing a snapshot.
#[derive(Debug)]
pub enum ImportError {
    /// Payload is not valid JSON text.
    InvalidJson(serde_json::Error),
    /// Top-level JSON value is not an object.
    NotAnObject,
    /// Neither `projects` nor `achievements` is present.
    MissingCollections,
    /// A collection or metadata field does not match the record shape.
    InvalidShape(serde_json::Error),
    /// A collection repeats an id.
    DuplicateId { kind: &'static str, id: String },
    /// Snapshot was written by a newer format version.
    UnsupportedVersion { version: u32, latest_supported: u32 },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "snapshot is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "snapshot must be a JSON object"),
            Self::MissingCollections => write!(
                f,
                "snapshot contains neither `projects` nor `achievements`"
            ),
            Self::InvalidShape(err) => write!(f, "snapshot has an invalid shape: {err}"),
            Self::DuplicateId { kind, id } => {
                write!(f, "snapshot repeats {kind} id `{id}`")
            }
            Self::UnsupportedVersion {
                version,
                latest_supported,
            } => write!(
                f,
                "snapshot version {version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) | Self::InvalidShape(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument<'a> {
    version: u32,
    exported_at: Timestamp,
    admin_mode: bool,
    projects: &'a [Project],
    achievements: &'a [Achievement],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingSnapshot {
    version: Option<u32>,
    admin_mode: Option<bool>,
    projects: Option<Vec<Project>>,
    achievements: Option<Vec<Achievement>>,
}

/// Validated import payload. Absent collections are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub projects: Option<Vec<Project>>,
    pub achievements: Option<Vec<Achievement>>,
    pub admin_mode: Option<bool>,
}

/// Encodes collections (stored order) plus metadata as pretty JSON.
pub fn encode_snapshot(
    projects: &[Project],
    achievements: &[Achievement],
    admin_mode: bool,
    exported_at: Timestamp,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SnapshotDocument {
        version: SNAPSHOT_VERSION,
        exported_at,
        admin_mode,
        projects,
        achievements,
    })
}

/// Parses and validates a snapshot without touching any store state.
pub fn decode_snapshot(payload: &str) -> Result<DecodedSnapshot, ImportError> {
    let value: Value = serde_json::from_str(payload).map_err(ImportError::InvalidJson)?;
    if !value.is_object() {
        return Err(ImportError::NotAnObject);
    }

    let incoming: IncomingSnapshot =
        serde_json::from_value(value).map_err(ImportError::InvalidShape)?;

    if let Some(version) = incoming.version {
        if version > SNAPSHOT_VERSION {
            return Err(ImportError::UnsupportedVersion {
                version,
                latest_supported: SNAPSHOT_VERSION,
            });
        }
    }
    if incoming.projects.is_none() && incoming.achievements.is_none() {
        return Err(ImportError::MissingCollections);
    }
    if let Some(projects) = &incoming.projects {
        ensure_unique_ids(projects)?;
    }
    if let Some(achievements) = &incoming.achievements {
        ensure_unique_ids(achievements)?;
    }

    Ok(DecodedSnapshot {
        projects: incoming.projects,
        achievements: incoming.achievements,
        admin_mode: incoming.admin_mode,
    })
}

/// Suggested download name, e.g. `portfolio-data-2024-05-01.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("portfolio-data-{}.json", date.format("%Y-%m-%d"))
}

fn ensure_unique_ids<T: Entity>(items: &[T]) -> Result<(), ImportError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ImportError::DuplicateId {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }
    }
    Ok(())
}
