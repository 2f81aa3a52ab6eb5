//! Card and category data models

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length of a card title, in characters
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum length of a card description, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Maximum length of a category name, in characters
pub const CATEGORY_NAME_MAX_CHARS: usize = 50;

/// Field-level validation failure, surfaced before any store mutation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be less than {} characters", TITLE_MAX_CHARS)]
    TitleTooLong,

    #[error("Description must be less than {} characters", DESCRIPTION_MAX_CHARS)]
    DescriptionTooLong,

    #[error("Category is required")]
    CategoryRequired,

    #[error("Category name is required")]
    CategoryNameRequired,

    #[error("Category name must be less than {} characters", CATEGORY_NAME_MAX_CHARS)]
    CategoryNameTooLong,

    #[error("Invalid color format: {0}")]
    InvalidColor(String),
}

/// Card priority level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Fixed sort rank: low < medium < high < critical
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A user-created task or idea record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Category id; a dangling reference is tolerated and rendered as
    /// "no category"
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl Card {
    /// Build a card from a draft, stamping a fresh id and timestamps.
    /// The draft should already be validated.
    pub fn new(draft: CardDraft) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            tags: draft.tags,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
            completed: draft.completed,
        }
    }
}

/// Payload for creating a card; identity and timestamps are assigned by
/// the store, never taken from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

impl CardDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        if self.category.is_empty() {
            return Err(ValidationError::CategoryRequired);
        }
        Ok(())
    }
}

/// Typed partial update for a card. Only the mutable fields appear here;
/// `id` and `createdAt` are not representable and unknown fields are
/// rejected at the serde boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date, `None` leaves it untouched
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl CardPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(category) = &self.category {
            if category.is_empty() {
                return Err(ValidationError::CategoryRequired);
            }
        }
        Ok(())
    }
}

/// A named, colored grouping that cards reference by id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Hex color in `#RRGGBB` form
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Build a category from a draft, stamping a fresh id and creation time
    pub fn new(draft: CategoryDraft) -> Self {
        Self {
            id: new_id(),
            name: draft.name,
            color: draft.color,
            created_at: Utc::now(),
        }
    }
}

/// Payload for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_category_name(&self.name)?;
        validate_color(&self.color)?;
        Ok(())
    }
}

/// Typed partial update for a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_category_name(name)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

/// Presentation mode for the card list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    List,
}

impl Default for ViewMode {
    fn default() -> Self {
        Self::Grid
    }
}

/// Persisted view preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub sort: super::query::SortOptions,
}

/// Allocate an opaque identity: millisecond timestamp plus random suffix.
/// Unique with overwhelming probability within one store; a collision is
/// treated as practically impossible, not a recoverable error.
pub fn new_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

/// Category set seeded on first run so the UI is never empty
pub fn default_categories() -> Vec<Category> {
    let now = Utc::now();
    [
        ("work", "Work", "#3b82f6"),
        ("personal", "Personal", "#10b981"),
        ("projects", "Projects", "#8b5cf6"),
        ("ideas", "Ideas", "#f59e0b"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        created_at: now,
    })
    .collect()
}

/// Regex for the `#RRGGBB` color format accepted for categories
fn color_regex() -> Regex {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap()
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::CategoryNameRequired);
    }
    if name.chars().count() > CATEGORY_NAME_MAX_CHARS {
        return Err(ValidationError::CategoryNameTooLong);
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !color_regex().is_match(color) {
        return Err(ValidationError::InvalidColor(color.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_card_new_stamps_timestamps() {
        let before = Utc::now();
        let card = Card::new(CardDraft {
            title: "Buy milk".to_string(),
            description: String::new(),
            category: "personal".to_string(),
            tags: vec!["errands".to_string()],
            priority: Priority::default(),
            due_date: None,
            completed: false,
        });
        assert!(!card.id.is_empty());
        assert_eq!(card.created_at, card.updated_at);
        assert!(card.created_at >= before);
        assert_eq!(card.priority, Priority::Medium);
    }

    #[test]
    fn test_draft_validation_bounds() {
        let mut draft = CardDraft {
            title: "x".to_string(),
            description: String::new(),
            category: "work".to_string(),
            tags: Vec::new(),
            priority: Priority::Low,
            due_date: None,
            completed: false,
        };
        assert!(draft.validate().is_ok());

        draft.title = "t".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(draft.validate(), Err(ValidationError::TitleTooLong));

        draft.title = String::new();
        assert_eq!(draft.validate(), Err(ValidationError::TitleRequired));

        draft.title = "ok".to_string();
        draft.description = "d".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert_eq!(draft.validate(), Err(ValidationError::DescriptionTooLong));

        draft.description = String::new();
        draft.category = String::new();
        assert_eq!(draft.validate(), Err(ValidationError::CategoryRequired));
    }

    #[test]
    fn test_category_color_validation() {
        let mut draft = CategoryDraft {
            name: "Errands".to_string(),
            color: "#3b82f6".to_string(),
        };
        assert!(draft.validate().is_ok());

        // Uppercase hex is accepted too
        draft.color = "#3B82F6".to_string();
        assert!(draft.validate().is_ok());

        for bad in ["3b82f6", "#3b82f", "#3b82f67", "#gggggg", ""] {
            draft.color = bad.to_string();
            assert!(draft.validate().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_card_patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<CardPatch>(r#"{"createdAt":"2024-01-01T00:00:00Z"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_categories_are_valid() {
        let categories = default_categories();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[0].id, "work");
        for category in &categories {
            assert!(color_regex().is_match(&category.color));
        }
    }

    #[test]
    fn test_card_serializes_camel_case() {
        let card = Card::new(CardDraft {
            title: "t".to_string(),
            description: String::new(),
            category: "work".to_string(),
            tags: Vec::new(),
            priority: Priority::High,
            due_date: None,
            completed: false,
        });
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dueDate").is_some());
        assert_eq!(json["priority"], "high");
    }
}
