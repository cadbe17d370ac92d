use anyhow::{Context, Result};

use crate::app::App;
use crate::render;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    prompt: &str,
    answer: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = app
        .session
        .add_card(prompt, answer)
        .context("Failed to add card")?;

    let Some(card) = card else {
        eprintln!("Nothing added: prompt and answer must both be non-empty");
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render::card_json(&card))?);
        }
        OutputFormat::Plain => {
            println!("Added card");
            println!("{}", render::card_entry(&card, use_color));
        }
    }

    Ok(())
}
