//! Generic ordered collection shared by both entity kinds.
//!
//! # Invariants
//! - Every mutation that misses its target id returns `false` and leaves the
//!   collection untouched.
//! - Ids produced by `add` never collide with an id already present.

use crate::model::{sort_for_display, Entity, EntityId, Timestamp};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(crate) struct Collection<T> {
    items: Vec<T>,
}

impl<T: Entity> Collection<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Items in stored (insertion) order.
    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends a new entity with `order = len + 1`.
    pub(crate) fn add(&mut self, draft: T::Draft, created_at: Timestamp) -> T {
        let id = self.fresh_id();
        let order = i64::try_from(self.items.len()).unwrap_or(i64::MAX - 1) + 1;
        let entity = T::from_draft(draft, id, order, created_at);
        self.items.push(entity.clone());
        entity
    }

    pub(crate) fn update(&mut self, id: &str, patch: T::Patch) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn delete(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Moves `id` to `position` in display order and renumbers every
    /// entity's `order` as `1..=len` following that display sequence.
    ///
    /// `position` is zero-based and clamped to the last slot.
    pub(crate) fn move_to(&mut self, id: &str, position: usize) -> bool {
        let mut display = sort_for_display(&self.items);
        let Some(from) = display.iter().position(|item| item.id() == id) else {
            return false;
        };

        let moved = display.remove(from);
        let to = position.min(display.len());
        display.insert(to, moved);
        for (order, item) in (1_i64..).zip(display.iter_mut()) {
            item.set_order(order);
        }

        self.items = display;
        true
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn fresh_id(&self) -> EntityId {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if self.find(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
