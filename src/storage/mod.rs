pub mod backup;
mod local_store;

pub use local_store::{LocalStore, StorageError, CARDS_KEY, CATEGORIES_KEY, SETTINGS_KEY};
