//! Project record.

use super::{Entity, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Delivery state shown on a project card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
        }
    }

    /// Parses the wire spelling (`completed|in-progress|planned`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "completed" => Some(Self::Completed),
            "in-progress" => Some(Self::InProgress),
            "planned" => Some(Self::Planned),
            _ => None,
        }
    }
}

/// Portfolio project as persisted and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Technology labels; insertion order is display order.
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: ProjectStatus,
    pub order: i64,
    pub created_at: Timestamp,
}

/// Fields supplied by the caller when adding a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub image_url: Option<String>,
    pub status: ProjectStatus,
}

impl ProjectDraft {
    /// Draft with no tags and no links.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: ProjectStatus,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            live_url: None,
            github_url: None,
            image_url: None,
            status,
        }
    }
}

/// Partial project update.
///
/// `None` leaves a field as is. For optional links, `Some(None)` clears the
/// link and `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub live_url: Option<Option<String>>,
    pub github_url: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub order: Option<i64>,
}

impl ProjectPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn from_draft(draft: ProjectDraft, id: EntityId, order: i64, created_at: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            live_url: draft.live_url,
            github_url: draft.github_url,
            image_url: draft.image_url,
            status: draft.status,
            order,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(live_url) = patch.live_url {
            self.live_url = live_url;
        }
        if let Some(github_url) = patch.github_url {
            self.github_url = github_url;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}
