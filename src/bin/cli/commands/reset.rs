use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat) -> Result<()> {
    app.session.reset().context("Failed to reset cards")?;
    let total = app.session.list_cards()?.len();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "active": total,
                "roundDuration": app.config.round_duration,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("All {} cards are back in the stack", total);
        }
    }

    Ok(())
}
