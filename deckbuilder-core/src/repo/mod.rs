use crate::{Card, CoreError, Deck, DeckFields};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryRepo;

#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// All decks in creation order.
    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError>;
    async fn get_deck(&self, id: &str) -> Result<Deck, CoreError>;
    async fn create_deck(&self, fields: DeckFields, image: Option<String>) -> Result<Deck, CoreError>;
    async fn update_deck(
        &self,
        id: &str,
        fields: DeckFields,
        image: Option<String>,
    ) -> Result<Deck, CoreError>;
    async fn add_card(&self, id: &str, card: Card) -> Result<Deck, CoreError>;
    async fn delete_deck(&self, id: &str) -> Result<(), CoreError>;
}
