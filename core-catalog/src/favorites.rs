//! Process-scoped favorites set.
//!
//! Membership lives only as long as the store; nothing is persisted and
//! nothing touches the network. Screens share one store behind `Arc`.

use crate::models::ContentItem;
use core_runtime::events::{CoreEvent, EventBus, FavoritesEvent};
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct FavoritesStore {
    ids: RwLock<HashSet<String>>,
    events: Option<EventBus>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `FavoritesEvent`s on `bus` for every toggle.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Flip membership of `id`. Returns `true` if it is now a favorite.
    pub fn toggle(&self, id: &str) -> bool {
        let now_favorite = {
            let mut ids = self.ids.write();
            if ids.remove(id) {
                false
            } else {
                ids.insert(id.to_string());
                true
            }
        };

        debug!(content_id = id, favorite = now_favorite, "Toggled favorite");

        if let Some(bus) = &self.events {
            let content_id = id.to_string();
            let event = if now_favorite {
                FavoritesEvent::Added { content_id }
            } else {
                FavoritesEvent::Removed { content_id }
            };
            let _ = bus.emit(CoreEvent::Favorites(event));
        }

        now_favorite
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.read().contains(id)
    }

    /// Sorted snapshot of the favorite ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.read().iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    /// The favorite subset of `items`, preserving their order.
    pub fn select(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        let ids = self.ids.read();
        items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect()
    }
}
