use anyhow::{Context, Result};
use uuid::Uuid;

use crate::app::App;
use crate::render;
use crate::OutputFormat;

pub fn run(app: &mut App, ids: &[String], format: &OutputFormat, use_color: bool) -> Result<()> {
    // Resolve every id before deleting anything
    let cards = ids
        .iter()
        .map(|id| app.find_card(id))
        .collect::<Result<Vec<_>>>()?;
    let card_ids: Vec<Uuid> = cards.iter().map(|c| c.id).collect();

    let removed = app
        .session
        .remove_cards(&card_ids)
        .context("Failed to remove cards")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "removed": removed,
                "cards": cards.iter().map(render::card_json).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for card in &cards {
                println!("Removed {}", render::card_entry(card, use_color));
            }
        }
    }

    Ok(())
}
