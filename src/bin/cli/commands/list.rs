use anyhow::{Context, Result};

use crate::app::App;
use crate::render;
use crate::OutputFormat;

pub fn run(app: &App, active_only: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let mut cards = app.session.list_cards().context("Failed to list cards")?;
    if active_only {
        cards.retain(|c| c.active);
    }

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = cards.iter().map(render::card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("(no cards in {})", app.data_dir.display());
                return Ok(());
            }

            for card in &cards {
                println!("{}", render::card_entry(card, use_color));
            }

            let active = cards.iter().filter(|c| c.active).count();
            println!();
            println!("{} cards, {} active", cards.len(), active);
        }
    }

    Ok(())
}
