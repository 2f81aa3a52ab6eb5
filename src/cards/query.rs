//! Filtering and sorting of the card collection
//!
//! Pure functions: the visible list is recomputed from the full collection
//! on every call. Linear scans are intentional; the expected scale is
//! thousands of cards, not millions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{Card, Priority};

/// Sort key for the visible card list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Title,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Key and direction used to order the visible cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    pub sort_by: SortBy,
    pub order: SortOrder,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            sort_by: SortBy::UpdatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Inclusive due-date window; either bound may be open
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Combined predicate describing which cards are visible.
/// Predicates combine with AND; within each membership set any match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default = "default_show_completed")]
    pub show_completed: bool,
    #[serde(default)]
    pub due_date_range: DateRange,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            priorities: Vec::new(),
            show_completed: true,
            due_date_range: DateRange::default(),
        }
    }
}

fn default_show_completed() -> bool {
    true
}

/// Apply every active predicate as a narrowing pass
pub fn filter_cards(cards: &[Card], filters: &FilterOptions) -> Vec<Card> {
    let mut visible: Vec<Card> = cards.to_vec();

    if !filters.search.is_empty() {
        let term = filters.search.to_lowercase();
        visible.retain(|card| {
            card.title.to_lowercase().contains(&term)
                || card.description.to_lowercase().contains(&term)
                || card.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
        });
    }

    if !filters.categories.is_empty() {
        visible.retain(|card| filters.categories.contains(&card.category));
    }

    if !filters.tags.is_empty() {
        visible.retain(|card| filters.tags.iter().any(|tag| card.tags.contains(tag)));
    }

    if !filters.priorities.is_empty() {
        visible.retain(|card| filters.priorities.contains(&card.priority));
    }

    if !filters.show_completed {
        visible.retain(|card| !card.completed);
    }

    if filters.due_date_range.is_active() {
        visible.retain(|card| {
            // A card without a due date never matches a range filter,
            // even when the range is open-ended.
            let Some(due) = card.due_date else {
                return false;
            };
            if let Some(from) = filters.due_date_range.from {
                if due < from {
                    return false;
                }
            }
            if let Some(to) = filters.due_date_range.to {
                if due > to {
                    return false;
                }
            }
            true
        });
    }

    visible
}

/// Order cards in place by the requested key and direction.
///
/// A missing due date sorts as the epoch, so undated cards cluster at the
/// "earliest" end under both directions; this is intentional. The sort is
/// stable, but tie order is not part of the contract.
pub fn sort_cards(cards: &mut [Card], sort: &SortOptions) {
    cards.sort_by(|a, b| {
        let ordering = match sort.sort_by {
            SortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortBy::DueDate => due_sort_key(a).cmp(&due_sort_key(b)),
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn due_sort_key(card: &Card) -> DateTime<Utc> {
    card.due_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Deterministic projection of the full collection to the visible,
/// ordered view
pub fn filter_and_sort(cards: &[Card], filters: &FilterOptions, sort: &SortOptions) -> Vec<Card> {
    let mut visible = filter_cards(cards, filters);
    sort_cards(&mut visible, sort);
    visible
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::cards::models::CardDraft;

    fn card(title: &str, category: &str, tags: &[&str], priority: Priority) -> Card {
        Card::new(CardDraft {
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            priority,
            due_date: None,
            completed: false,
        })
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample_cards() -> Vec<Card> {
        let mut a = card("Buy Milk", "personal", &["errands"], Priority::Low);
        a.description = "From the corner shop".to_string();
        let mut b = card("Write report", "work", &["office", "writing"], Priority::Critical);
        b.due_date = Some(date(2024, 1, 1));
        let mut c = card("Plan trip", "personal", &["travel"], Priority::Medium);
        c.completed = true;
        c.due_date = Some(date(2024, 6, 15));
        vec![a, b, c]
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let cards = sample_cards();
        let mut filters = FilterOptions::default();

        filters.search = "milk".to_string();
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Buy Milk");

        // Description match
        filters.search = "CORNER".to_string();
        assert_eq!(filter_cards(&cards, &filters).len(), 1);

        // Tag match
        filters.search = "TRAVEL".to_string();
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Plan trip");
    }

    #[test]
    fn test_membership_filters_are_any_of() {
        let cards = sample_cards();
        let mut filters = FilterOptions::default();
        filters.tags = vec!["errands".to_string(), "travel".to_string()];
        assert_eq!(filter_cards(&cards, &filters).len(), 2);

        filters.tags.clear();
        filters.priorities = vec![Priority::Critical];
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Write report");
    }

    #[test]
    fn test_hide_completed() {
        let cards = sample_cards();
        let mut filters = FilterOptions::default();
        filters.show_completed = false;
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|c| !c.completed));
    }

    #[test]
    fn test_due_range_drops_undated_cards() {
        let cards = sample_cards();
        let mut filters = FilterOptions::default();

        // Open-ended range still excludes cards without a due date
        filters.due_date_range.from = Some(date(2020, 1, 1));
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|c| c.due_date.is_some()));

        // Bounds are inclusive
        filters.due_date_range.to = Some(date(2024, 1, 1));
        let visible = filter_cards(&cards, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Write report");
    }

    #[test]
    fn test_narrowing_is_monotonic() {
        let cards = sample_cards();
        let mut filters = FilterOptions::default();
        let baseline = filter_cards(&cards, &filters).len();

        filters.categories = vec!["personal".to_string()];
        let narrowed = filter_cards(&cards, &filters).len();
        assert!(narrowed <= baseline);

        filters.tags = vec!["errands".to_string()];
        assert!(filter_cards(&cards, &filters).len() <= narrowed);
    }

    #[test]
    fn test_priority_sort_desc() {
        let mut cards = vec![
            card("a", "work", &[], Priority::Low),
            card("b", "work", &[], Priority::Critical),
            card("c", "work", &[], Priority::Medium),
        ];
        sort_cards(
            &mut cards,
            &SortOptions {
                sort_by: SortBy::Priority,
                order: SortOrder::Desc,
            },
        );
        let order: Vec<Priority> = cards.iter().map(|c| c.priority).collect();
        assert_eq!(order, vec![Priority::Critical, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let mut cards = vec![
            card("banana", "work", &[], Priority::Low),
            card("Apple", "work", &[], Priority::Low),
            card("cherry", "work", &[], Priority::Low),
        ];
        sort_cards(
            &mut cards,
            &SortOptions {
                sort_by: SortBy::Title,
                order: SortOrder::Asc,
            },
        );
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_missing_due_date_sorts_as_epoch() {
        let a = card("A", "work", &[], Priority::Low);
        let mut b = card("B", "work", &[], Priority::Low);
        b.due_date = Some(date(2024, 1, 1));

        let mut cards = vec![b.clone(), a.clone()];
        sort_cards(
            &mut cards,
            &SortOptions {
                sort_by: SortBy::DueDate,
                order: SortOrder::Asc,
            },
        );
        assert_eq!(cards[0].title, "A");
        assert_eq!(cards[1].title, "B");

        sort_cards(
            &mut cards,
            &SortOptions {
                sort_by: SortBy::DueDate,
                order: SortOrder::Desc,
            },
        );
        assert_eq!(cards[0].title, "B");
        assert_eq!(cards[1].title, "A");
    }

    #[test]
    fn test_projection_is_deterministic() {
        let cards = sample_cards();
        let filters = FilterOptions {
            search: "p".to_string(),
            ..FilterOptions::default()
        };
        let sort = SortOptions {
            sort_by: SortBy::Title,
            order: SortOrder::Asc,
        };
        let first = filter_and_sort(&cards, &filters, &sort);
        let second = filter_and_sort(&cards, &filters, &sort);
        assert_eq!(first, second);
    }
}
