//! Achievement record (certifications, awards, badges).

use super::{Entity, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Portfolio achievement as persisted and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_url: Option<String>,
    pub order: i64,
    pub created_at: Timestamp,
}

/// Fields supplied by the caller when adding an achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDraft {
    pub title: String,
    pub description: String,
    pub certificate_url: Option<String>,
    pub badge_url: Option<String>,
}

impl AchievementDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            certificate_url: None,
            badge_url: None,
        }
    }
}

/// Partial achievement update; link fields follow `ProjectPatch` semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub certificate_url: Option<Option<String>>,
    pub badge_url: Option<Option<String>>,
    pub order: Option<i64>,
}

impl AchievementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Achievement {
    type Draft = AchievementDraft;
    type Patch = AchievementPatch;

    const KIND: &'static str = "achievement";

    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn from_draft(
        draft: AchievementDraft,
        id: EntityId,
        order: i64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            certificate_url: draft.certificate_url,
            badge_url: draft.badge_url,
            order,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: AchievementPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(certificate_url) = patch.certificate_url {
            self.certificate_url = certificate_url;
        }
        if let Some(badge_url) = patch.badge_url {
            self.badge_url = badge_url;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}
