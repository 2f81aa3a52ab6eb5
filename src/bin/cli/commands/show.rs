use anyhow::{bail, Result};

use cardbox::AppContext;

use super::category_label;
use crate::OutputFormat;

pub fn run(app: &AppContext, id: &str, format: &OutputFormat) -> Result<()> {
    let Some(card) = app.get_card(id) else {
        bail!("No card with id '{}'", id);
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(card)?);
        }
        OutputFormat::Plain => {
            println!("{}", card.title);
            println!("  id:        {}", card.id);
            println!("  category:  {}", category_label(app, &card.category));
            println!("  priority:  {}", card.priority);
            println!("  completed: {}", if card.completed { "yes" } else { "no" });
            if let Some(due) = card.due_date {
                println!("  due:       {}", due.format("%Y-%m-%d"));
            }
            if !card.tags.is_empty() {
                println!("  tags:      {}", card.tags.join(", "));
            }
            println!("  created:   {}", card.created_at.format("%Y-%m-%d %H:%M"));
            println!("  updated:   {}", card.updated_at.format("%Y-%m-%d %H:%M"));
            if !card.description.is_empty() {
                println!("\n{}", card.description);
            }
        }
    }

    Ok(())
}
