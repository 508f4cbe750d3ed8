use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use deckbuilder_core::{Deck, DeckPayload};
use serde::Serialize;

use crate::api::error::ApiError;

#[derive(Serialize)]
pub struct DeckOut {
    pub success: bool,
    pub deck: Deck,
}

impl DeckOut {
    pub fn ok(deck: Deck) -> Self {
        Self { success: true, deck }
    }
}

#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Serialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
}

pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Body of a deck create/update: the text fields plus at most one `image` file.
///
/// Multipart is the primary encoding. Urlencoded forms and JSON are accepted too,
/// without an image. Anything else reads as an empty payload and fails validation.
pub struct DeckForm {
    pub payload: DeckPayload,
    pub image: Option<Upload>,
}

#[async_trait]
impl<S> FromRequest<S> for DeckForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(payload) = Form::<DeckPayload>::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
            Ok(Self { payload, image: None })
        } else if content_type.starts_with("application/json") {
            let Json(payload) = Json::<DeckPayload>::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
            Ok(Self { payload, image: None })
        } else {
            Ok(Self {
                payload: DeckPayload::default(),
                image: None,
            })
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<DeckForm, ApiError> {
    let mut payload = DeckPayload::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" | "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                if name == "name" {
                    payload.name = Some(text);
                } else {
                    payload.description = Some(text);
                }
            }
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                // An untouched file input still sends an empty part.
                let blank = bytes.is_empty() && file_name.as_deref().unwrap_or("").is_empty();
                if !blank {
                    image = Some(Upload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(DeckForm { payload, image })
}
