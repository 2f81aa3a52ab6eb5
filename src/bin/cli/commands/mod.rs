pub mod add;
pub mod categories;
pub mod data;
pub mod edit;
pub mod list;
pub mod show;
pub mod tags;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use cardbox::AppContext;

/// Parse a YYYY-MM-DD argument into a UTC midnight timestamp
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Split a comma-separated tag argument, dropping empty segments
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Category name for display; dangling references render as "no category"
pub fn category_label(app: &AppContext, category_id: &str) -> String {
    app.get_category(category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "no category".to_string())
}
