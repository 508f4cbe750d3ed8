//! Request payloads and their schema checks.
//!
//! Payload fields are all optional so a missing key and an empty value can be
//! told apart in the error message. Checks run in declaration order and stop at
//! the first failure.

use serde::Deserialize;

use crate::{Card, CoreError, DeckFields};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeckPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DeckPayload {
    pub fn validate(self) -> Result<DeckFields, CoreError> {
        Ok(DeckFields {
            name: required("name", self.name)?,
            description: required("description", self.description)?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CardPayload {
    pub id: Option<String>,
    pub img: Option<String>,
    pub name: Option<String>,
    pub cost: Option<String>,
    pub attack: Option<String>,
    pub health: Option<String>,
    pub text: Option<String>,
}

impl CardPayload {
    pub fn validate(self) -> Result<Card, CoreError> {
        Ok(Card {
            id: required("id", self.id)?,
            img: required("img", self.img)?,
            name: required("name", self.name)?,
            cost: required("cost", self.cost)?,
            attack: required("attack", self.attack)?,
            health: required("health", self.health)?,
            text: required("text", self.text)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, CoreError> {
    match value {
        None => Err(CoreError::Validation(format!("\"{field}\" is required"))),
        Some(v) if v.is_empty() => Err(CoreError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        ))),
        Some(v) => Ok(v),
    }
}
