use anyhow::Result;

use cardbox::cards::{Card, DateRange, FilterOptions, SortOptions};
use cardbox::AppContext;

use super::{category_label, parse_date};
use crate::{ListArgs, OutputFormat};

pub fn run(app: &mut AppContext, args: ListArgs, format: &OutputFormat) -> Result<()> {
    let filters = FilterOptions {
        search: args.search.unwrap_or_default(),
        categories: args.categories,
        tags: args.tags,
        priorities: args.priorities.into_iter().map(Into::into).collect(),
        show_completed: !args.hide_completed,
        due_date_range: DateRange {
            from: args.due_from.as_deref().map(parse_date).transpose()?,
            to: args.due_to.as_deref().map(parse_date).transpose()?,
        },
    };
    app.set_filters(filters);

    // Explicit sort flags override (and replace) the persisted preference
    let sort = SortOptions {
        sort_by: args.sort_by.map(Into::into).unwrap_or(app.sort.sort_by),
        order: args.order.map(Into::into).unwrap_or(app.sort.order),
    };
    if sort != app.sort {
        app.set_sort(sort)?;
    }

    let visible = app.visible_cards();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&visible)?);
        }
        OutputFormat::Plain => {
            if visible.is_empty() {
                println!("No cards match.");
                return Ok(());
            }

            for card in &visible {
                println!("{}", format_line(app, card));
            }
            println!("\n{} of {} cards", visible.len(), app.cards().len());
        }
    }

    Ok(())
}

fn format_line(app: &AppContext, card: &Card) -> String {
    let check = if card.completed { "[x]" } else { "[ ]" };
    let due = card
        .due_date
        .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    let tags = if card.tags.is_empty() {
        String::new()
    } else {
        format!(" #{}", card.tags.join(" #"))
    };
    format!(
        "{} {}  {} ({}, {}){}{}",
        check,
        card.id,
        card.title,
        category_label(app, &card.category),
        card.priority,
        due,
        tags
    )
}
