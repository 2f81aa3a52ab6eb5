use anyhow::Result;

use cardbox::AppContext;

use crate::OutputFormat;

pub fn run(app: &AppContext, format: &OutputFormat) -> Result<()> {
    let tags = app.unique_tags();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tags)?);
        }
        OutputFormat::Plain => {
            if tags.is_empty() {
                println!("No tags found.");
                return Ok(());
            }
            for tag in &tags {
                let count = app.cards().iter().filter(|c| c.tags.contains(tag)).count();
                println!("#{:<20} {}", tag, count);
            }
            println!("\n{} tags total", tags.len());
        }
    }

    Ok(())
}
