use anyhow::Result;

use cardbox::cards::CardDraft;
use cardbox::AppContext;

use super::{category_label, parse_date, split_tags};
use crate::{AddArgs, OutputFormat};

pub fn run(app: &mut AppContext, args: AddArgs, format: &OutputFormat) -> Result<()> {
    let due_date = args.due.as_deref().map(parse_date).transpose()?;

    let draft = CardDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        category: args.category,
        tags: args.tags.as_deref().map(split_tags).unwrap_or_default(),
        priority: args.priority.into(),
        due_date,
        completed: false,
    };

    let card = app.create_card(draft)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!(
                "Created card {} in {}",
                card.id,
                category_label(app, &card.category)
            );
        }
    }

    Ok(())
}
