//! Persistence gateway for cards, categories and settings
//!
//! Every mutating call reads the full collection, applies the change and
//! writes the whole collection back; there are no delta writes and the
//! last write wins. Write failures propagate as errors; an unparseable
//! stored payload is logged and treated as absent so a corrupted store
//! degrades instead of failing startup.

use chrono::Utc;
use thiserror::Error;

use super::models::{
    default_categories, Card, CardDraft, CardPatch, Category, CategoryDraft, CategoryPatch,
    Settings, ValidationError,
};
use crate::storage::{LocalStore, StorageError, CARDS_KEY, CATEGORIES_KEY, SETTINGS_KEY};

#[derive(Error, Debug)]
pub enum CardStorageError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, CardStorageError>;

/// Storage for the card and category collections
pub struct CardsStorage {
    store: LocalStore,
}

impl CardsStorage {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    // ===== Card operations =====

    /// Load the full card collection. Missing or unparseable payloads
    /// yield an empty collection; parse failures are logged, never raised.
    pub fn load_cards(&self) -> Result<Vec<Card>> {
        let Some(text) = self.store.get(CARDS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(cards) => Ok(cards),
            Err(err) => {
                log::warn!("Discarding unparseable card collection: {}", err);
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the full card collection
    pub fn save_cards(&self, cards: &[Card]) -> Result<()> {
        let json = serde_json::to_string_pretty(cards).map_err(StorageError::from)?;
        self.store.set(CARDS_KEY, &json)?;
        Ok(())
    }

    /// Validate a draft, stamp identity and timestamps, append and persist
    pub fn add_card(&self, draft: CardDraft) -> Result<Card> {
        draft.validate()?;
        let mut cards = self.load_cards()?;
        let card = Card::new(draft);
        cards.push(card.clone());
        self.save_cards(&cards)?;
        Ok(card)
    }

    /// Merge a patch over an existing card; `None` when the id is unknown
    /// (no side effects in that case). `id` and `createdAt` are never
    /// touched; `updatedAt` is re-stamped.
    pub fn update_card(&self, id: &str, patch: CardPatch) -> Result<Option<Card>> {
        patch.validate()?;
        let mut cards = self.load_cards()?;
        let Some(card) = cards.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            card.title = title;
        }
        if let Some(description) = patch.description {
            card.description = description;
        }
        if let Some(category) = patch.category {
            card.category = category;
        }
        if let Some(tags) = patch.tags {
            card.tags = tags;
        }
        if let Some(priority) = patch.priority {
            card.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            card.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            card.completed = completed;
        }
        card.updated_at = Utc::now();

        let updated = card.clone();
        self.save_cards(&cards)?;
        Ok(Some(updated))
    }

    /// Get a card by id
    pub fn get_card(&self, id: &str) -> Result<Option<Card>> {
        Ok(self.load_cards()?.into_iter().find(|c| c.id == id))
    }

    /// Delete a card; true iff a record was removed
    pub fn delete_card(&self, id: &str) -> Result<bool> {
        let mut cards = self.load_cards()?;
        let len_before = cards.len();
        cards.retain(|c| c.id != id);

        if cards.len() == len_before {
            return Ok(false);
        }

        self.save_cards(&cards)?;
        Ok(true)
    }

    /// Delete every card whose id is in `ids`; returns the removal count
    pub fn delete_cards(&self, ids: &[String]) -> Result<usize> {
        let mut cards = self.load_cards()?;
        let len_before = cards.len();
        cards.retain(|c| !ids.contains(&c.id));

        let removed = len_before - cards.len();
        if removed > 0 {
            self.save_cards(&cards)?;
        }
        Ok(removed)
    }

    // ===== Category operations =====

    /// Load all categories, seeding and persisting the default set when
    /// nothing usable is stored
    pub fn load_categories(&self) -> Result<Vec<Category>> {
        let stored = match self.store.get(CATEGORIES_KEY)? {
            Some(text) => match serde_json::from_str(&text) {
                Ok(categories) => Some(categories),
                Err(err) => {
                    log::warn!("Discarding unparseable category collection: {}", err);
                    None
                }
            },
            None => None,
        };

        match stored {
            Some(categories) => Ok(categories),
            None => {
                let defaults = default_categories();
                self.save_categories(&defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Overwrite the full category collection
    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        let json = serde_json::to_string_pretty(categories).map_err(StorageError::from)?;
        self.store.set(CATEGORIES_KEY, &json)?;
        Ok(())
    }

    /// Validate a draft, stamp identity and creation time, append and persist
    pub fn add_category(&self, draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        let mut categories = self.load_categories()?;
        let category = Category::new(draft);
        categories.push(category.clone());
        self.save_categories(&categories)?;
        Ok(category)
    }

    /// Merge a patch over an existing category; `None` when the id is
    /// unknown. Categories carry no update timestamp.
    pub fn update_category(&self, id: &str, patch: CategoryPatch) -> Result<Option<Category>> {
        patch.validate()?;
        let mut categories = self.load_categories()?;
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }

        let updated = category.clone();
        self.save_categories(&categories)?;
        Ok(Some(updated))
    }

    /// Get a category by id
    pub fn get_category(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.load_categories()?.into_iter().find(|c| c.id == id))
    }

    /// Delete a category; true iff a record was removed. Cards referencing
    /// it keep their dangling id and render as "no category".
    pub fn delete_category(&self, id: &str) -> Result<bool> {
        let mut categories = self.load_categories()?;
        let len_before = categories.len();
        categories.retain(|c| c.id != id);

        if categories.len() == len_before {
            return Ok(false);
        }

        self.save_categories(&categories)?;
        Ok(true)
    }

    // ===== Settings =====

    /// Load view preferences, falling back to defaults
    pub fn load_settings(&self) -> Result<Settings> {
        let Some(text) = self.store.get(SETTINGS_KEY)? else {
            return Ok(Settings::default());
        };
        match serde_json::from_str(&text) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log::warn!("Discarding unparseable settings: {}", err);
                Ok(Settings::default())
            }
        }
    }

    /// Persist view preferences
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings).map_err(StorageError::from)?;
        self.store.set(SETTINGS_KEY, &json)?;
        Ok(())
    }

    // ===== Maintenance =====

    /// Remove all persisted cards, categories and settings; irreversible
    pub fn clear_all(&self) -> Result<()> {
        self.store.remove(CARDS_KEY)?;
        self.store.remove(CATEGORIES_KEY)?;
        self.store.remove(SETTINGS_KEY)?;
        Ok(())
    }
}
