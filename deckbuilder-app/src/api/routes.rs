use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use deckbuilder_core::{Card, CardPayload, Deck, ImageStore};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dto::{Ack, DeckForm, DeckOut, Upload};
use crate::api::error::ApiError;
use crate::api::server::AppState;

pub async fn list_cards(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = st
        .catalog
        .list_cards()
        .await
        .map_err(|e| ApiError::CatalogUnavailable(e.to_string()))?;
    Ok(Json(cards))
}

pub async fn list_decks(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Deck>>, ApiError> {
    Ok(Json(st.decks.list_decks().await?))
}

pub async fn get_deck(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeckOut>, ApiError> {
    Ok(Json(DeckOut::ok(st.decks.get_deck(&id).await?)))
}

pub async fn create_deck(
    State(st): State<Arc<AppState>>,
    form: DeckForm,
) -> Result<(StatusCode, Json<DeckOut>), ApiError> {
    let fields = form.payload.validate()?;
    let image = store_image(&*st.images, form.image).await?;
    let deck = match st.decks.create_deck(fields, image.clone()).await {
        Ok(deck) => deck,
        Err(e) => {
            discard_image(&*st.images, image).await;
            return Err(e.into());
        }
    };
    info!(deck = %deck.id, name = %deck.name, "deck created");
    Ok((StatusCode::CREATED, Json(DeckOut::ok(deck))))
}

pub async fn update_deck(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
    form: DeckForm,
) -> Result<Json<DeckOut>, ApiError> {
    // A missing deck wins over a bad body.
    st.decks.get_deck(&id).await?;
    let fields = form.payload.validate()?;
    let image = store_image(&*st.images, form.image).await?;
    let deck = match st.decks.update_deck(&id, fields, image.clone()).await {
        Ok(deck) => deck,
        Err(e) => {
            discard_image(&*st.images, image).await;
            return Err(e.into());
        }
    };
    info!(deck = %deck.id, "deck updated");
    Ok(Json(DeckOut::ok(deck)))
}

pub async fn add_card(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<CardPayload>, JsonRejection>,
) -> Result<Json<DeckOut>, ApiError> {
    st.decks.get_deck(&id).await?;
    let Json(payload) = body.map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
    let card = payload.validate()?;
    let deck = st.decks.add_card(&id, card).await?;
    info!(deck = %deck.id, cards = deck.cards.len(), "card added");
    Ok(Json(DeckOut::ok(deck)))
}

pub async fn delete_deck(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    st.decks.delete_deck(&id).await?;
    info!(deck = %id, "deck deleted");
    Ok(Json(Ack { success: true }))
}

async fn store_image(images: &dyn ImageStore, upload: Option<Upload>) -> Result<Option<String>, ApiError> {
    let Some(upload) = upload else {
        return Ok(None);
    };
    let url = images.store(upload.file_name.as_deref(), &upload.bytes).await?;
    Ok(Some(url))
}

/// Removes an upload whose deck write failed, so no file is left without a deck.
async fn discard_image(images: &dyn ImageStore, url: Option<String>) {
    let Some(url) = url else {
        return;
    };
    if let Err(e) = images.remove(&url).await {
        warn!(%url, error = %e, "could not remove orphaned upload");
    }
}
