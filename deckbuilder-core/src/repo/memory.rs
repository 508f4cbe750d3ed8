use crate::{Card, CoreError, Deck, DeckFields, IdSequence};
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Default)]
struct State {
    decks: Vec<Deck>,
    ids: IdSequence,
}

/// Process-local deck store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryRepo {
    state: RwLock<State>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::repo::DeckRepository for MemoryRepo {
    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError> {
        Ok(self.state.read().decks.clone())
    }

    async fn get_deck(&self, id: &str) -> Result<Deck, CoreError> {
        self.state
            .read()
            .decks
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(CoreError::NotFound("deck"))
    }

    async fn create_deck(&self, fields: DeckFields, image: Option<String>) -> Result<Deck, CoreError> {
        let mut s = self.state.write();
        let deck = Deck::new(s.ids.next_id(), fields, image);
        s.decks.push(deck.clone());
        Ok(deck)
    }

    async fn update_deck(
        &self,
        id: &str,
        fields: DeckFields,
        image: Option<String>,
    ) -> Result<Deck, CoreError> {
        let mut s = self.state.write();
        let Some(deck) = s.decks.iter_mut().find(|d| d.id == id) else {
            return Err(CoreError::NotFound("deck"));
        };
        deck.apply(fields, image);
        Ok(deck.clone())
    }

    async fn add_card(&self, id: &str, card: Card) -> Result<Deck, CoreError> {
        let mut s = self.state.write();
        let Some(deck) = s.decks.iter_mut().find(|d| d.id == id) else {
            return Err(CoreError::NotFound("deck"));
        };
        deck.cards.push(card);
        Ok(deck.clone())
    }

    async fn delete_deck(&self, id: &str) -> Result<(), CoreError> {
        let mut s = self.state.write();
        let idx = s
            .decks
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::NotFound("deck"))?;
        s.decks.remove(idx);
        Ok(())
    }
}
