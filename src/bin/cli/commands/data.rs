use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use cardbox::storage::backup;
use cardbox::AppContext;

use crate::OutputFormat;

pub fn run_export(app: &AppContext, path: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let document = app.export_document()?;
    let text = backup::export_to_string(&document)?;

    let path =
        path.unwrap_or_else(|| PathBuf::from(backup::export_file_name(Utc::now().date_naive())));
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": path.to_string_lossy(),
                    "cards": document.cards.len(),
                    "categories": document.categories.len(),
                })
            );
        }
        OutputFormat::Plain => {
            println!(
                "Exported {} cards and {} categories to {}",
                document.cards.len(),
                document.categories.len(),
                path.display()
            );
        }
    }

    Ok(())
}

pub fn run_import(app: &mut AppContext, file: &Path, format: &OutputFormat) -> Result<()> {
    // The one-shot suspend point: the file is read fully into memory,
    // then parsing and merge run synchronously.
    let raw =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let summary = app.import_document(&raw)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "success": true,
                    "message": summary.message(),
                    "data": summary,
                })
            );
        }
        OutputFormat::Plain => {
            println!("{}", summary.message());
        }
    }

    Ok(())
}

pub fn run_clear(app: &mut AppContext, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete ALL cards, categories and settings? [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }

    app.clear_all_data()?;
    println!("All data cleared.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
