use crate::{Card, CoreError};
use async_trait::async_trait;

const BUILTIN_CARDS: &str = include_str!("../data/cards.json");

/// Read-only source of the cards clients can put into decks.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    async fn list_cards(&self) -> Result<Vec<Card>, CoreError>;
}

/// The fixed card list compiled into the binary.
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    cards: Vec<Card>,
}

impl StaticCatalog {
    pub fn builtin() -> Result<Self, CoreError> {
        Ok(Self::new(builtin_cards()?))
    }

    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

#[async_trait]
impl CardCatalog for StaticCatalog {
    async fn list_cards(&self) -> Result<Vec<Card>, CoreError> {
        Ok(self.cards.clone())
    }
}

pub fn builtin_cards() -> Result<Vec<Card>, CoreError> {
    serde_json::from_str(BUILTIN_CARDS).map_err(|_| CoreError::Storage("builtin catalog"))
}
