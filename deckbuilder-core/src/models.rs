use serde::{Deserialize, Serialize};

pub type DeckId = String;
pub type CardId = String;

/// A catalog entry. Stats are kept as strings, exactly as clients send them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub img: String,
    pub name: String,
    pub cost: String,
    pub attack: String,
    pub health: String,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(id: DeckId, fields: DeckFields, image: Option<String>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            image,
            cards: Vec::new(),
        }
    }

    /// Overwrites name and description. The image is only replaced when a new one is given.
    pub fn apply(&mut self, fields: DeckFields, image: Option<String>) {
        self.name = fields.name;
        self.description = fields.description;
        if image.is_some() {
            self.image = image;
        }
    }
}

/// Validated deck attributes, produced by [`crate::DeckPayload::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckFields {
    pub name: String,
    pub description: String,
}

impl DeckFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Hands out deck ids. Counts up from 1 and never goes back, so deleted ids stay retired.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    pub fn next_id(&mut self) -> DeckId {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}
