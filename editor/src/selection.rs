//! Selection tracking: the set of selected ids plus the shift-click anchor.
//!
//! The set is kept ordered so iteration is deterministic. The anchor is the
//! most recently clicked object and is where a shift-click range starts.
//! Locked objects never reach this module through the click paths; the
//! range helper skips them itself because it walks the object list.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use crate::doc::{MapObject, ObjectId};

/// Currently selected objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ObjectId>,
    anchor: Option<ObjectId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the set and the anchor.
    pub fn select_none(&mut self) {
        self.ids.clear();
        self.anchor = None;
    }

    /// Replace the set with `{id}` and anchor on it.
    pub fn select_single(&mut self, id: &str) {
        self.ids.clear();
        self.ids.insert(id.to_owned());
        self.anchor = Some(id.to_owned());
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// The anchor moves to `id` while the set is non-empty and is cleared otherwise.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_owned());
        }
        self.anchor = if self.ids.is_empty() { None } else { Some(id.to_owned()) };
    }

    /// Union the list span between the anchor and `id` (inclusive) into the set.
    ///
    /// Uses list order, not click order. Locked objects inside the span are
    /// skipped. Returns `false` without changing anything when there is no
    /// anchor or either end is missing from `objects`.
    pub fn select_range(&mut self, id: &str, objects: &[MapObject]) -> bool {
        let Some(anchor) = self.anchor.as_deref() else {
            return false;
        };
        let Some(from) = objects.iter().position(|o| o.id == anchor) else {
            return false;
        };
        let Some(to) = objects.iter().position(|o| o.id == id) else {
            return false;
        };
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        for obj in objects[lo..=hi].iter().filter(|o| !o.is_locked) {
            self.ids.insert(obj.id.clone());
        }
        self.anchor = Some(id.to_owned());
        true
    }

    /// Replace the set with `ids`. The anchor is cleared.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        self.ids = ids.into_iter().collect();
        self.anchor = None;
    }

    /// Symmetric difference: selected ids in `ids` are dropped, the rest are added.
    pub fn xor<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        for id in ids {
            if !self.ids.remove(&id) {
                self.ids.insert(id);
            }
        }
        self.drop_stale_anchor();
    }

    /// Forget ids for which `keep` returns false (e.g. after a delete or undo).
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.ids.retain(|id| keep(id));
        self.drop_stale_anchor();
    }

    fn drop_stale_anchor(&mut self) {
        if self.anchor.as_ref().is_some_and(|a| !self.ids.contains(a)) {
            self.anchor = None;
        }
    }

    /// The single selected object, if exactly one is selected.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        if self.ids.len() == 1 {
            self.ids.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// The shift-click anchor.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Selected ids as an owned list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ObjectId> {
        self.ids.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
