use anyhow::{bail, Result};

use cardbox::cards::CategoryDraft;
use cardbox::AppContext;

use crate::OutputFormat;

pub fn run_list(app: &AppContext, format: &OutputFormat) -> Result<()> {
    let categories = app.categories();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(categories)?);
        }
        OutputFormat::Plain => {
            if categories.is_empty() {
                println!("No categories.");
                return Ok(());
            }
            for category in categories {
                let count = app
                    .cards()
                    .iter()
                    .filter(|c| c.category == category.id)
                    .count();
                println!(
                    "{:<12} {} {} ({} cards)",
                    category.id, category.color, category.name, count
                );
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &mut AppContext, name: &str, color: &str, format: &OutputFormat) -> Result<()> {
    let category = app.create_category(CategoryDraft {
        name: name.to_string(),
        color: color.to_string(),
    })?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&category)?);
        }
        OutputFormat::Plain => {
            println!("Created category {} ({})", category.name, category.id);
        }
    }

    Ok(())
}

pub fn run_rm(app: &mut AppContext, id: &str, format: &OutputFormat) -> Result<()> {
    if !app.delete_category(id)? {
        bail!("No category with id '{}'", id);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": id }));
        }
        OutputFormat::Plain => {
            // Cards keep their dangling category id and render as "no category"
            println!("Deleted category {}", id);
        }
    }

    Ok(())
}
