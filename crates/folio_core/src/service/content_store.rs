//! Portfolio content store.
//!
//! # Responsibility
//! - Load projects/achievements from key-value storage, falling back to the
//!   built-in dataset per collection when a value is absent or unreadable.
//! - Apply add/update/delete/reorder/move mutations to the admin-managed
//!   dataset and write each mutated collection through immediately.
//! - Switch which dataset (built-in or admin-managed) readers are shown.
//! - Export and import snapshots.
//!
//! # Invariants
//! - Update/delete/move on an absent id are no-ops reported as `false`.
//! - Import validates the whole payload before mutating anything.
//! - Toggling admin mode never modifies admin-managed data.
//! - Reads return a stable ascending sort by `order`.
//!
//! Concurrent writers on the same storage are last-writer-wins.

use crate::model::achievement::{Achievement, AchievementDraft, AchievementPatch};
use crate::model::defaults::{default_achievements, default_projects};
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::{sort_for_display, Entity};
use crate::repo::kv_repo::{KvError, KvStore};
use crate::service::collection::Collection;
use crate::service::snapshot::{decode_snapshot, encode_snapshot, ImportError};
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON project array.
pub const PROJECTS_KEY: &str = "portfolio_projects";
/// Storage key holding the JSON achievement array.
pub const ACHIEVEMENTS_KEY: &str = "portfolio_achievements";
/// Storage key holding `"true"`/`"false"` for admin mode.
pub const ADMIN_MODE_KEY: &str = "portfolio_admin_mode";

pub type StoreResult<T> = Result<T, StoreError>;

/// Content store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying key-value storage failed.
    Storage(KvError),
    /// A collection could not be serialized for write-through or export.
    Encode(serde_json::Error),
    /// Import payload was rejected; store state is unchanged.
    Import(ImportError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode content: {err}"),
            Self::Import(err) => write!(f, "import rejected: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

impl From<ImportError> for StoreError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Explicit acknowledgement required by [`ContentStore::reset_to_default`].
///
/// Consumers construct this only after the user confirmed the destructive
/// reset (dialog, `--yes` flag, ...).
#[derive(Debug, Clone, Copy)]
pub struct ResetConfirmation {
    _confirmed: (),
}

impl ResetConfirmation {
    pub fn confirmed() -> Self {
        Self { _confirmed: () }
    }
}

/// Counts of the admin-managed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentStats {
    pub projects: usize,
    pub achievements: usize,
    pub admin_mode: bool,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Imported project count, `None` when the payload had no projects.
    pub projects: Option<usize>,
    /// Imported achievement count, `None` when the payload had none.
    pub achievements: Option<usize>,
    /// Admin mode after the import.
    pub admin_mode: bool,
}

/// Binds an entity type to its storage key, built-in dataset and slot in
/// the store.
trait StoredEntity: Entity {
    const STORAGE_KEY: &'static str;

    fn defaults() -> Vec<Self>;
    fn managed<S>(store: &ContentStore<S>) -> &Collection<Self>;
    fn managed_mut<S>(store: &mut ContentStore<S>) -> &mut Collection<Self>;
}

impl StoredEntity for Project {
    const STORAGE_KEY: &'static str = PROJECTS_KEY;

    fn defaults() -> Vec<Self> {
        default_projects()
    }

    fn managed<S>(store: &ContentStore<S>) -> &Collection<Self> {
        &store.projects
    }

    fn managed_mut<S>(store: &mut ContentStore<S>) -> &mut Collection<Self> {
        &mut store.projects
    }
}

impl StoredEntity for Achievement {
    const STORAGE_KEY: &'static str = ACHIEVEMENTS_KEY;

    fn defaults() -> Vec<Self> {
        default_achievements()
    }

    fn managed<S>(store: &ContentStore<S>) -> &Collection<Self> {
        &store.achievements
    }

    fn managed_mut<S>(store: &mut ContentStore<S>) -> &mut Collection<Self> {
        &mut store.achievements
    }
}

/// Session-scoped owner of the portfolio collections.
///
/// Open once over a storage handle and pass by reference to consumers.
pub struct ContentStore<S> {
    kv: S,
    projects: Collection<Project>,
    achievements: Collection<Achievement>,
    admin_mode: bool,
}

impl<S: KvStore> ContentStore<S> {
    /// Loads both collections and the admin-mode flag from `kv`.
    ///
    /// Absent or malformed collection values fall back to the built-in
    /// dataset; the fallback is not written back until the next mutation.
    /// An absent or unrecognized admin-mode flag means admin mode is off, so
    /// readers see the built-in dataset until admin mode is switched on.
    ///
    /// # Errors
    /// - Returns `StoreError::Storage` only when storage reads fail.
    pub fn open(kv: S) -> StoreResult<Self> {
        let projects = load_collection::<Project, _>(&kv)?;
        let achievements = load_collection::<Achievement, _>(&kv)?;
        let admin_mode = match kv.get(ADMIN_MODE_KEY)?.as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                warn!(
                    "event=store_load module=store status=fallback key={} reason=unrecognized_flag value_len={}",
                    ADMIN_MODE_KEY,
                    other.len()
                );
                false
            }
        };

        info!(
            "event=store_open module=store status=ok projects={} achievements={} admin_mode={}",
            projects.len(),
            achievements.len(),
            admin_mode
        );

        Ok(Self {
            kv,
            projects,
            achievements,
            admin_mode,
        })
    }

    /// Whether readers are shown the admin-managed dataset.
    pub fn is_admin_mode(&self) -> bool {
        self.admin_mode
    }

    /// Presented projects in display order.
    pub fn projects(&self) -> Vec<Project> {
        self.presented::<Project>()
    }

    /// Presented achievements in display order.
    pub fn achievements(&self) -> Vec<Achievement> {
        self.presented::<Achievement>()
    }

    /// Admin-managed projects in display order, regardless of mode.
    pub fn managed_projects(&self) -> Vec<Project> {
        sort_for_display(self.projects.items())
    }

    /// Admin-managed achievements in display order, regardless of mode.
    pub fn managed_achievements(&self) -> Vec<Achievement> {
        sort_for_display(self.achievements.items())
    }

    /// Looks up a presented project by id.
    pub fn project(&self, id: &str) -> Option<Project> {
        self.projects().into_iter().find(|project| project.id == id)
    }

    /// Looks up a presented achievement by id.
    pub fn achievement(&self, id: &str) -> Option<Achievement> {
        self.achievements()
            .into_iter()
            .find(|achievement| achievement.id == id)
    }

    pub fn stats(&self) -> ContentStats {
        ContentStats {
            projects: self.projects.len(),
            achievements: self.achievements.len(),
            admin_mode: self.admin_mode,
        }
    }

    /// Adds a project with a fresh id, current `created_at` and
    /// `order = count + 1`. Business fields are not validated.
    pub fn add_project(&mut self, draft: ProjectDraft) -> StoreResult<Project> {
        self.add::<Project>(draft)
    }

    /// Merges `patch` over the project with `id`.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is absent.
    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> StoreResult<bool> {
        self.update::<Project>(id, patch)
    }

    /// Removes the project with `id`; `Ok(false)` when absent.
    pub fn delete_project(&mut self, id: &str) -> StoreResult<bool> {
        self.delete::<Project>(id)
    }

    /// Replaces the whole project collection with the caller's ordering.
    pub fn reorder_projects(&mut self, projects: Vec<Project>) -> StoreResult<()> {
        self.reorder::<Project>(projects)
    }

    /// Moves a project to a zero-based display position and renumbers orders.
    pub fn move_project(&mut self, id: &str, position: usize) -> StoreResult<bool> {
        self.move_to::<Project>(id, position)
    }

    pub fn add_achievement(&mut self, draft: AchievementDraft) -> StoreResult<Achievement> {
        self.add::<Achievement>(draft)
    }

    pub fn update_achievement(
        &mut self,
        id: &str,
        patch: AchievementPatch,
    ) -> StoreResult<bool> {
        self.update::<Achievement>(id, patch)
    }

    pub fn delete_achievement(&mut self, id: &str) -> StoreResult<bool> {
        self.delete::<Achievement>(id)
    }

    pub fn reorder_achievements(&mut self, achievements: Vec<Achievement>) -> StoreResult<()> {
        self.reorder::<Achievement>(achievements)
    }

    pub fn move_achievement(&mut self, id: &str, position: usize) -> StoreResult<bool> {
        self.move_to::<Achievement>(id, position)
    }

    /// Flips admin mode and returns the new value.
    pub fn toggle_admin_mode(&mut self) -> StoreResult<bool> {
        let enabled = !self.admin_mode;
        self.set_admin_mode(enabled)?;
        Ok(enabled)
    }

    /// Sets admin mode. Admin-managed data is neither altered nor deleted.
    pub fn set_admin_mode(&mut self, enabled: bool) -> StoreResult<()> {
        self.kv.set(ADMIN_MODE_KEY, bool_to_flag(enabled))?;
        self.admin_mode = enabled;
        info!("event=admin_mode_set module=store status=ok enabled={enabled}");
        Ok(())
    }

    /// Serializes the admin-managed collections and admin mode as JSON.
    pub fn export_snapshot(&self) -> StoreResult<String> {
        let payload = encode_snapshot(
            self.projects.items(),
            self.achievements.items(),
            self.admin_mode,
            Utc::now(),
        )
        .map_err(StoreError::Encode)?;

        info!(
            "event=snapshot_export module=store status=ok projects={} achievements={} bytes={}",
            self.projects.len(),
            self.achievements.len(),
            payload.len()
        );
        Ok(payload)
    }

    /// Replaces every collection present in `payload`.
    ///
    /// All storage writes happen before memory is touched; when one fails,
    /// keys already written are restored to their previous values.
    ///
    /// The payload's `adminMode` is restored when present; otherwise admin
    /// mode is switched on so the imported data is what readers see.
    ///
    /// # Errors
    /// - `StoreError::Import` when the payload is rejected. Nothing changes.
    /// - `StoreError::Storage` when write-through fails.
    pub fn import_snapshot(&mut self, payload: &str) -> StoreResult<ImportSummary> {
        let decoded = match decode_snapshot(payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(
                    "event=snapshot_import module=store status=rejected bytes={} error={}",
                    payload.len(),
                    err
                );
                return Err(err.into());
            }
        };

        let projects = decoded.projects.as_ref().map(Vec::len);
        let achievements = decoded.achievements.as_ref().map(Vec::len);

        let admin_mode = decoded.admin_mode.unwrap_or(true);

        let mut writes = Vec::with_capacity(3);
        if let Some(items) = &decoded.projects {
            writes.push((PROJECTS_KEY, encode_items(items)?));
        }
        if let Some(items) = &decoded.achievements {
            writes.push((ACHIEVEMENTS_KEY, encode_items(items)?));
        }
        writes.push((ADMIN_MODE_KEY, bool_to_flag(admin_mode).to_string()));
        self.write_all_or_restore(&writes)?;

        if let Some(items) = decoded.projects {
            self.projects.replace(items);
        }
        if let Some(items) = decoded.achievements {
            self.achievements.replace(items);
        }
        self.admin_mode = admin_mode;

        info!(
            "event=snapshot_import module=store status=ok projects={:?} achievements={:?} admin_mode={}",
            projects, achievements, admin_mode
        );
        Ok(ImportSummary {
            projects,
            achievements,
            admin_mode,
        })
    }

    /// Discards persisted admin data for both collections, restores the
    /// built-in dataset and turns admin mode off.
    pub fn reset_to_default(&mut self, _confirmation: ResetConfirmation) -> StoreResult<()> {
        self.kv.remove(PROJECTS_KEY)?;
        self.kv.remove(ACHIEVEMENTS_KEY)?;
        self.projects.replace(default_projects());
        self.achievements.replace(default_achievements());
        self.set_admin_mode(false)?;

        warn!("event=store_reset module=store status=ok");
        Ok(())
    }

    fn presented<T: StoredEntity>(&self) -> Vec<T> {
        if self.admin_mode {
            sort_for_display(T::managed(self).items())
        } else {
            sort_for_display(&T::defaults())
        }
    }

    fn add<T: StoredEntity>(&mut self, draft: T::Draft) -> StoreResult<T> {
        let created = T::managed_mut(self).add(draft, Utc::now());
        self.persist::<T>()?;
        info!(
            "event=entity_add module=store status=ok kind={} id={} order={}",
            T::KIND,
            created.id(),
            created.order()
        );
        Ok(created)
    }

    fn update<T: StoredEntity>(&mut self, id: &str, patch: T::Patch) -> StoreResult<bool> {
        if !T::managed_mut(self).update(id, patch) {
            debug!(
                "event=entity_update module=store status=noop kind={} id={} reason=not_found",
                T::KIND,
                id
            );
            return Ok(false);
        }
        self.persist::<T>()?;
        info!(
            "event=entity_update module=store status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(true)
    }

    fn delete<T: StoredEntity>(&mut self, id: &str) -> StoreResult<bool> {
        if !T::managed_mut(self).delete(id) {
            debug!(
                "event=entity_delete module=store status=noop kind={} id={} reason=not_found",
                T::KIND,
                id
            );
            return Ok(false);
        }
        self.persist::<T>()?;
        info!(
            "event=entity_delete module=store status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(true)
    }

    fn reorder<T: StoredEntity>(&mut self, items: Vec<T>) -> StoreResult<()> {
        let count = items.len();
        T::managed_mut(self).replace(items);
        self.persist::<T>()?;
        info!(
            "event=entity_reorder module=store status=ok kind={} count={}",
            T::KIND,
            count
        );
        Ok(())
    }

    fn move_to<T: StoredEntity>(&mut self, id: &str, position: usize) -> StoreResult<bool> {
        if !T::managed_mut(self).move_to(id, position) {
            debug!(
                "event=entity_move module=store status=noop kind={} id={} reason=not_found",
                T::KIND,
                id
            );
            return Ok(false);
        }
        self.persist::<T>()?;
        info!(
            "event=entity_move module=store status=ok kind={} id={} position={}",
            T::KIND,
            id,
            position
        );
        Ok(true)
    }

    fn persist<T: StoredEntity>(&self) -> StoreResult<()> {
        let encoded = encode_items(T::managed(self).items())?;
        self.kv.set(T::STORAGE_KEY, &encoded)?;
        Ok(())
    }

    fn write_all_or_restore(&self, writes: &[(&'static str, String)]) -> StoreResult<()> {
        let mut written: Vec<(&'static str, Option<String>)> = Vec::with_capacity(writes.len());
        for (key, value) in writes {
            let previous = match self.kv.get(key) {
                Ok(previous) => previous,
                Err(err) => {
                    self.restore(&written);
                    return Err(err.into());
                }
            };
            if let Err(err) = self.kv.set(key, value) {
                self.restore(&written);
                return Err(err.into());
            }
            written.push((*key, previous));
        }
        Ok(())
    }

    fn restore(&self, written: &[(&'static str, Option<String>)]) {
        for (key, previous) in written.iter().rev() {
            let result = match previous {
                Some(value) => self.kv.set(key, value),
                None => self.kv.remove(key).map(|_| ()),
            };
            if let Err(err) = result {
                warn!(
                    "event=store_restore module=store status=error key={} error={}",
                    key, err
                );
            }
        }
    }
}

fn encode_items<T: Entity>(items: &[T]) -> StoreResult<String> {
    serde_json::to_string(items).map_err(StoreError::Encode)
}

fn load_collection<T: StoredEntity, S: KvStore>(kv: &S) -> StoreResult<Collection<T>> {
    let Some(raw) = kv.get(T::STORAGE_KEY)? else {
        debug!(
            "event=store_load module=store status=default kind={} reason=absent",
            T::KIND
        );
        return Ok(Collection::new(T::defaults()));
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => Ok(Collection::new(items)),
        Err(err) => {
            warn!(
                "event=store_load module=store status=fallback kind={} reason=malformed error={}",
                T::KIND,
                err
            );
            Ok(Collection::new(T::defaults()))
        }
    }
}

fn bool_to_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
