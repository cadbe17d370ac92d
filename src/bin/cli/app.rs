use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use memocards_lib::{Card, Config, JsonFileStore, Session};

/// Shared application state for CLI commands and the TUI
pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
    pub session: Session<JsonFileStore>,
}

impl App {
    /// Open the card store in `data_dir`, or the default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => Config::default_data_dir().context("Failed to get data directory")?,
        };

        let config = Config::load(&data_dir)
            .with_context(|| format!("Failed to load {}", data_dir.join(Config::FILE_NAME).display()))?;

        let store = JsonFileStore::open(data_dir.clone())
            .with_context(|| format!("Failed to open card store in {}", data_dir.display()))?;
        let session = Session::new(store, &config).context("Failed to read cards")?;

        log::debug!("Opened {} with {:?}", data_dir.display(), config);

        Ok(Self {
            data_dir,
            config,
            session,
        })
    }

    /// Find a card by id (case-insensitive prefix match)
    pub fn find_card(&self, id: &str) -> Result<Card> {
        let id_lower = id.trim().to_lowercase();
        if id_lower.is_empty() {
            bail!("Card id must not be empty");
        }

        let cards = self.session.list_cards().context("Failed to list cards")?;

        // Exact match first
        if let Some(card) = cards.iter().find(|c| c.id.to_string() == id_lower) {
            return Ok(card.clone());
        }

        // Prefix match
        let matches: Vec<&Card> = cards
            .iter()
            .filter(|c| c.id.to_string().starts_with(&id_lower))
            .collect();

        match matches.len() {
            0 => bail!("No card with id '{}'", id),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous card id '{}'. Matches:\n{}",
                id,
                matches
                    .iter()
                    .map(|c| format!("  - {}  {}", c.id, c.prompt))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_with_one_card(temp_dir: &TempDir) -> (App, Card) {
        let mut app = App::new(Some(temp_dir.path())).unwrap();
        let card = app.session.add_card("q", "a").unwrap().unwrap();
        (app, card)
    }

    #[test]
    fn test_find_card_by_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let (app, card) = app_with_one_card(&temp_dir);

        let prefix = card.id.to_string()[..8].to_uppercase();
        assert_eq!(app.find_card(&prefix).unwrap().id, card.id);
        assert_eq!(app.find_card(&card.id.to_string()).unwrap().id, card.id);
    }

    #[test]
    fn test_find_card_rejects_blank_id() {
        let temp_dir = TempDir::new().unwrap();
        let (app, _) = app_with_one_card(&temp_dir);

        assert!(app.find_card("").is_err());
        assert!(app.find_card("   ").is_err());
    }

    #[test]
    fn test_find_card_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let (app, card) = app_with_one_card(&temp_dir);

        // Flip the first hex digit so the prefix cannot match
        let first = card.id.to_string().chars().next().unwrap();
        let other = if first == '0' { "1" } else { "0" };
        assert!(app.find_card(other).is_err());
    }
}
