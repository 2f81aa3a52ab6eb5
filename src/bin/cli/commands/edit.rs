use anyhow::{bail, Result};

use cardbox::cards::CardPatch;
use cardbox::AppContext;

use super::{parse_date, split_tags};
use crate::{EditArgs, OutputFormat};

pub fn run_edit(app: &mut AppContext, args: EditArgs, format: &OutputFormat) -> Result<()> {
    let due_date = if args.clear_due {
        Some(None)
    } else {
        match args.due.as_deref() {
            Some(raw) => Some(Some(parse_date(raw)?)),
            None => None,
        }
    };

    let patch = CardPatch {
        title: args.title,
        description: args.description,
        category: args.category,
        tags: args.tags.as_deref().map(split_tags),
        priority: args.priority.map(Into::into),
        due_date,
        completed: None,
    };

    apply_patch(app, &args.id, patch, format)
}

pub fn run_done(app: &mut AppContext, id: &str, undo: bool, format: &OutputFormat) -> Result<()> {
    let patch = CardPatch {
        completed: Some(!undo),
        ..CardPatch::default()
    };
    apply_patch(app, id, patch, format)
}

pub fn run_rm(app: &mut AppContext, ids: &[String], format: &OutputFormat) -> Result<()> {
    let removed = app.delete_cards(ids)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": removed }));
        }
        OutputFormat::Plain => {
            println!("Deleted {} of {} cards", removed, ids.len());
        }
    }

    Ok(())
}

fn apply_patch(
    app: &mut AppContext,
    id: &str,
    patch: CardPatch,
    format: &OutputFormat,
) -> Result<()> {
    let Some(card) = app.update_card(id, patch)? else {
        bail!("No card with id '{}'", id);
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Updated card {}", card.id);
        }
    }

    Ok(())
}
