//! Cat profiles and the current selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{NoticeDraft, SubscriptionId, Subscribers};
use crate::models::Cat;
use crate::notify::Notifier;
use crate::store::{merge_patch, KvStore, Patch, StoreResult};

/// Storage key of the profile blob (cats plus selected id).
pub const PROFILE_KEY: &str = "cat-profile";

/// Cat list plus the selected cat id.
///
/// The selected cat is always looked up in `cats`, so an update to it is
/// visible through [`ProfileState::selected`] without a separate copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    #[serde(default)]
    pub cats: Vec<Cat>,
    #[serde(default)]
    pub selected_cat_id: Option<String>,
}

impl ProfileState {
    pub fn selected(&self) -> Option<&Cat> {
        let id = self.selected_cat_id.as_deref()?;
        self.find(id)
    }

    pub fn find(&self, id: &str) -> Option<&Cat> {
        self.cats.iter().find(|c| c.id == id)
    }

    /// Select `id` if it is a known cat, otherwise clear the selection.
    #[must_use]
    pub fn with_selection(&self, id: Option<&str>) -> Self {
        let selected_cat_id = id
            .filter(|id| self.find(id).is_some())
            .map(str::to_string);
        Self {
            cats: self.cats.clone(),
            selected_cat_id,
        }
    }

    /// Append a cat. If nothing is selected, the new cat becomes selected.
    #[must_use]
    pub fn with_cat_added(&self, cat: Cat) -> Self {
        let mut next = self.clone();
        if next.selected().is_none() {
            next.selected_cat_id = Some(cat.id.clone());
        }
        next.cats.push(cat);
        next
    }

    /// Replace the cat with the same id. Unknown ids leave the state unchanged.
    #[must_use]
    pub fn with_cat_replaced(&self, cat: Cat) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.cats.iter_mut().find(|c| c.id == cat.id) {
            *slot = cat;
        }
        next
    }

    /// Remove a cat, clearing the selection if it was selected.
    #[must_use]
    pub fn with_cat_removed(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.cats.retain(|c| c.id != id);
        if next.selected_cat_id.as_deref() == Some(id) {
            next.selected_cat_id = None;
        }
        next
    }

    /// Repair a stale selection after load: fall back to the first cat, or none.
    #[must_use]
    pub fn reconciled(self) -> Self {
        if self.selected().is_some() {
            return self;
        }
        let selected_cat_id = self.cats.first().map(|c| c.id.clone());
        Self {
            cats: self.cats,
            selected_cat_id,
        }
    }
}

/// Profile container: owns the [`ProfileState`], persists it as one blob
/// under [`PROFILE_KEY`], and reports changes.
pub struct ProfileStore {
    kv: Arc<dyn KvStore>,
    notifier: Arc<Notifier>,
    state: ProfileState,
    subscribers: Subscribers<ProfileState>,
}

impl ProfileStore {
    /// Load persisted profiles. A missing or malformed blob loads as empty.
    pub fn load(kv: Arc<dyn KvStore>, notifier: Arc<Notifier>) -> Self {
        let state = match kv.get(PROFILE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<ProfileState>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "malformed profile blob, starting empty");
                ProfileState::default()
            }),
            Ok(None) => ProfileState::default(),
            Err(e) => {
                warn!(error = %e, "profile read failed, starting empty");
                ProfileState::default()
            }
        };

        let state = state.reconciled();
        debug!(cats = state.cats.len(), selected = ?state.selected_cat_id, "profiles loaded");

        Self {
            kv,
            notifier,
            state,
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn cats(&self) -> &[Cat] {
        &self.state.cats
    }

    pub fn selected(&self) -> Option<&Cat> {
        self.state.selected()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProfileState) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Select a cat. Unknown ids clear the selection. Returns whether a cat is now selected.
    pub fn select(&mut self, id: &str) -> StoreResult<bool> {
        let next = self.state.with_selection(Some(id));
        let selected = next.selected_cat_id.is_some();
        self.commit(next)?;

        self.notifier.publish(
            NoticeDraft::info("cat.selected")
                .with_metadata(json!({ "catId": id, "found": selected })),
        );
        Ok(selected)
    }

    pub fn clear_selection(&mut self) -> StoreResult<()> {
        let next = self.state.with_selection(None);
        self.commit(next)
    }

    pub fn add_cat(&mut self, cat: Cat) -> StoreResult<()> {
        let draft = NoticeDraft::success("cat.added")
            .with_translation("notifications.catAdded")
            .with_param("name", cat.name.clone())
            .with_metadata(json!({ "catId": cat.id }));

        let next = self.state.with_cat_added(cat);
        self.commit(next)?;
        self.notifier.publish(draft);
        Ok(())
    }

    /// Merge `patch` into a cat. Returns the updated cat, or `None` if unknown.
    pub fn update_cat(&mut self, id: &str, patch: &Patch) -> StoreResult<Option<Cat>> {
        let Some(existing) = self.state.find(id) else {
            return Ok(None);
        };
        let updated = merge_patch(existing, patch)?;

        let next = self.state.with_cat_replaced(updated.clone());
        self.commit(next)?;
        self.notifier.publish(
            NoticeDraft::success("cat.updated")
                .with_translation("notifications.catUpdated")
                .with_param("name", updated.name.clone())
                .with_metadata(json!({ "catId": id })),
        );
        Ok(Some(updated))
    }

    /// Remove a cat. Its records stay in their collections.
    pub fn delete_cat(&mut self, id: &str) -> StoreResult<bool> {
        let Some(name) = self.state.find(id).map(|c| c.name.clone()) else {
            return Ok(false);
        };

        let next = self.state.with_cat_removed(id);
        self.commit(next)?;
        self.notifier.publish(
            NoticeDraft::info("cat.deleted")
                .with_translation("notifications.catDeleted")
                .with_param("name", name)
                .with_metadata(json!({ "catId": id })),
        );
        Ok(true)
    }

    fn commit(&mut self, next: ProfileState) -> StoreResult<()> {
        let raw = serde_json::to_string(&next)?;
        self.kv.set(PROFILE_KEY, &raw)?;
        self.state = next;
        self.subscribers.emit(&self.state);
        Ok(())
    }
}
