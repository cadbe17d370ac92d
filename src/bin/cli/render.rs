use memocards_lib::Card;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const GRAY: &'static str = "\x1b[90m";
}

/// Short id shown in listings; long enough to be unique in practice
pub fn short_id(card: &Card) -> String {
    card.id.to_string()[..8].to_string()
}

/// One card as a two-line listing entry
pub fn card_entry(card: &Card, use_color: bool) -> String {
    let id = short_id(card);
    let status = if card.active { "active" } else { "done" };

    if use_color {
        let status_color = if card.active { Color::GREEN } else { Color::GRAY };
        format!(
            "{}{}{} {}{}{}  {}[{}]{}\n         {}{}{}",
            Color::GRAY,
            id,
            Color::RESET,
            Color::BOLD,
            card.prompt,
            Color::RESET,
            status_color,
            status,
            Color::RESET,
            Color::DIM,
            card.answer,
            Color::RESET,
        )
    } else {
        format!("{} {}  [{}]\n         {}", id, card.prompt, status, card.answer)
    }
}

/// JSON object for `--format json`
pub fn card_json(card: &Card) -> serde_json::Value {
    serde_json::json!({
        "id": card.id.to_string(),
        "prompt": card.prompt,
        "answer": card.answer,
        "order": card.order,
        "active": card.active,
    })
}
