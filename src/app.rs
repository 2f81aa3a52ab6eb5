//! Application state container
//!
//! Owns the persistence gateway plus the in-memory working copy the
//! presentation layer renders from, together with filter, sort, view and
//! selection state. Constructed by the entry point and passed by
//! reference; there is no process-wide instance. Every mutating call
//! refreshes the working copy from what the gateway returns.

use std::path::PathBuf;

use crate::cards::models::{
    Card, CardDraft, CardPatch, Category, CategoryDraft, CategoryPatch, Settings, ViewMode,
};
use crate::cards::query::{self, FilterOptions, SortOptions};
use crate::cards::storage::{CardStorageError, CardsStorage};
use crate::storage::backup::{self, BackupDocument, ImportError, ImportSummary};
use crate::storage::LocalStore;

type Result<T> = std::result::Result<T, CardStorageError>;

pub struct AppContext {
    storage: CardsStorage,
    cards: Vec<Card>,
    categories: Vec<Category>,
    pub filters: FilterOptions,
    pub sort: SortOptions,
    pub view_mode: ViewMode,
    selected_cards: Vec<String>,
}

impl AppContext {
    /// Open the store under the given data directory and load the
    /// working copy and persisted view preferences
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let store = LocalStore::new(data_dir);
        store.init().map_err(CardStorageError::from)?;

        let storage = CardsStorage::new(store);
        let cards = storage.load_cards()?;
        let categories = storage.load_categories()?;
        let settings = storage.load_settings()?;

        Ok(Self {
            storage,
            cards,
            categories,
            filters: FilterOptions::default(),
            sort: settings.sort,
            view_mode: settings.view_mode,
            selected_cards: Vec::new(),
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_cards(&self) -> &[String] {
        &self.selected_cards
    }

    // ===== Card operations =====

    pub fn create_card(&mut self, draft: CardDraft) -> Result<Card> {
        let card = self.storage.add_card(draft)?;
        self.cards.push(card.clone());
        Ok(card)
    }

    pub fn update_card(&mut self, id: &str, patch: CardPatch) -> Result<Option<Card>> {
        let Some(updated) = self.storage.update_card(id, patch)? else {
            return Ok(None);
        };
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
            *card = updated.clone();
        }
        Ok(Some(updated))
    }

    pub fn delete_card(&mut self, id: &str) -> Result<bool> {
        let removed = self.storage.delete_card(id)?;
        if removed {
            self.cards.retain(|c| c.id != id);
            self.selected_cards.retain(|s| s != id);
        }
        Ok(removed)
    }

    pub fn delete_cards(&mut self, ids: &[String]) -> Result<usize> {
        let removed = self.storage.delete_cards(ids)?;
        if removed > 0 {
            self.cards.retain(|c| !ids.contains(&c.id));
            self.selected_cards.retain(|s| !ids.contains(s));
        }
        Ok(removed)
    }

    pub fn get_card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    // ===== Category operations =====

    pub fn create_category(&mut self, draft: CategoryDraft) -> Result<Category> {
        let category = self.storage.add_category(draft)?;
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Option<Category>> {
        let Some(updated) = self.storage.update_category(id, patch)? else {
            return Ok(None);
        };
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            *category = updated.clone();
        }
        Ok(Some(updated))
    }

    pub fn delete_category(&mut self, id: &str) -> Result<bool> {
        let removed = self.storage.delete_category(id)?;
        if removed {
            self.categories.retain(|c| c.id != id);
        }
        Ok(removed)
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    // ===== Query and view state =====

    /// The visible, ordered card list under the current filters and sort
    pub fn visible_cards(&self) -> Vec<Card> {
        query::filter_and_sort(&self.cards, &self.filters, &self.sort)
    }

    pub fn set_filters(&mut self, filters: FilterOptions) {
        self.filters = filters;
    }

    /// Change the sort and persist it with the view preferences
    pub fn set_sort(&mut self, sort: SortOptions) -> Result<()> {
        self.sort = sort;
        self.persist_settings()
    }

    /// Change the presentation mode and persist it
    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Result<()> {
        self.view_mode = view_mode;
        self.persist_settings()
    }

    fn persist_settings(&self) -> Result<()> {
        self.storage.save_settings(&Settings {
            view_mode: self.view_mode,
            sort: self.sort,
        })
    }

    /// Sorted set of all tags in use across the collection
    pub fn unique_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .cards
            .iter()
            .flat_map(|c| c.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    // ===== Selection =====

    pub fn toggle_selection(&mut self, id: &str) {
        if let Some(pos) = self.selected_cards.iter().position(|s| s == id) {
            self.selected_cards.remove(pos);
        } else {
            self.selected_cards.push(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_cards.clear();
    }

    /// Delete every selected card; the selection is cleared either way
    pub fn delete_selected(&mut self) -> Result<usize> {
        let ids = std::mem::take(&mut self.selected_cards);
        self.delete_cards(&ids)
    }

    // ===== Import/export =====

    pub fn export_document(&self) -> Result<BackupDocument> {
        backup::export_document(&self.storage)
    }

    /// Merge an exported document into the store and refresh the working
    /// copy. Only one import runs at a time; the caller is single-threaded.
    pub fn import_document(&mut self, raw: &str) -> std::result::Result<ImportSummary, ImportError> {
        let summary = backup::import_document(&self.storage, raw)?;
        self.reload()?;
        Ok(summary)
    }

    /// Remove all persisted data and empty the working copy; irreversible
    pub fn clear_all_data(&mut self) -> Result<()> {
        backup::clear_all_data(&self.storage)?;
        self.cards.clear();
        self.categories.clear();
        self.selected_cards.clear();
        Ok(())
    }

    /// Re-read persisted state into the working copy; needed after an
    /// import or an external change to the store
    pub fn reload(&mut self) -> Result<()> {
        self.cards = self.storage.load_cards()?;
        self.categories = self.storage.load_categories()?;
        Ok(())
    }
}
