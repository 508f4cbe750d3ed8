use deckbuilder_core::{
    builtin_cards, Card, CoreError, DeckFields, DeckPayload, DeckRepository, MemoryRepo,
};

fn aldor() -> Card {
    builtin_cards().unwrap().into_iter().next().unwrap()
}

fn fields(name: &str, description: &str) -> DeckFields {
    DeckFields::new(name, description)
}

#[tokio::test]
async fn starts_empty() {
    let repo = MemoryRepo::new();
    assert!(repo.list_decks().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let repo = MemoryRepo::new();
    let a = repo.create_deck(fields("Aggro", "Fast deck"), None).await.unwrap();
    let b = repo.create_deck(fields("Control", "Slow deck"), None).await.unwrap();

    assert_eq!(a.id, "1");
    assert_eq!(b.id, "2");
    assert!(a.cards.is_empty() && b.cards.is_empty());
    assert_eq!(a.image, None);

    let listed: Vec<String> = repo.list_decks().await.unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(listed, vec!["1", "2"]);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let repo = MemoryRepo::new();
    repo.create_deck(fields("a", "a"), None).await.unwrap();
    repo.create_deck(fields("b", "b"), None).await.unwrap();
    repo.delete_deck("2").await.unwrap();

    let c = repo.create_deck(fields("c", "c"), None).await.unwrap();
    assert_eq!(c.id, "3");
}

#[tokio::test]
async fn invalid_payload_leaves_store_untouched() {
    let repo = MemoryRepo::new();
    let payload = DeckPayload {
        name: Some(String::new()),
        description: Some("Fast deck".into()),
    };
    let err = payload.validate().unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(repo.list_decks().await.unwrap().len(), 0);
}

#[tokio::test]
async fn update_missing_deck_is_not_found() {
    let repo = MemoryRepo::new();
    let before = repo.create_deck(fields("Aggro", "Fast deck"), None).await.unwrap();

    let err = repo.update_deck("9", fields("x", "y"), None).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.get_deck("1").await.unwrap(), before);
}

#[tokio::test]
async fn update_without_image_keeps_previous_image() {
    let repo = MemoryRepo::new();
    repo.create_deck(fields("Aggro", "Fast deck"), Some("/uploads/1.png".into()))
        .await
        .unwrap();

    let d = repo.update_deck("1", fields("Tempo", "Faster"), None).await.unwrap();
    assert_eq!(d.name, "Tempo");
    assert_eq!(d.description, "Faster");
    assert_eq!(d.image.as_deref(), Some("/uploads/1.png"));

    let d = repo
        .update_deck("1", fields("Tempo", "Faster"), Some("/uploads/2.jpg".into()))
        .await
        .unwrap();
    assert_eq!(d.image.as_deref(), Some("/uploads/2.jpg"));
}

#[tokio::test]
async fn add_card_appends_in_order_and_keeps_duplicates() {
    let repo = MemoryRepo::new();
    repo.create_deck(fields("Aggro", "Fast deck"), None).await.unwrap();
    let cards = builtin_cards().unwrap();
    let (a, b) = (cards[0].clone(), cards[1].clone());

    repo.add_card("1", a.clone()).await.unwrap();
    repo.add_card("1", b.clone()).await.unwrap();
    let d = repo.add_card("1", a.clone()).await.unwrap();

    assert_eq!(d.cards, vec![a.clone(), b, a]);
}

#[tokio::test]
async fn add_card_to_missing_deck_is_not_found() {
    let repo = MemoryRepo::new();
    let err = repo.add_card("1", aldor()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let repo = MemoryRepo::new();
    for n in ["a", "b", "c"] {
        repo.create_deck(fields(n, n), None).await.unwrap();
    }
    repo.add_card("3", aldor()).await.unwrap();

    repo.delete_deck("2").await.unwrap();
    let left = repo.list_decks().await.unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(left[0].id, "1");
    assert_eq!(left[1].id, "3");
    assert_eq!(left[1].cards, vec![aldor()]);

    let err = repo.delete_deck("2").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.list_decks().await.unwrap().len(), 2);
}

#[tokio::test]
async fn listed_decks_are_retrievable_until_deleted() {
    let repo = MemoryRepo::new();
    repo.create_deck(fields("a", "a"), None).await.unwrap();
    repo.create_deck(fields("b", "b"), None).await.unwrap();

    for d in repo.list_decks().await.unwrap() {
        assert_eq!(repo.get_deck(&d.id).await.unwrap(), d);
    }
    repo.delete_deck("1").await.unwrap();
    assert!(repo.get_deck("1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn aggro_scenario() {
    let repo = MemoryRepo::new();
    let deck = repo.create_deck(fields("Aggro", "Fast deck"), None).await.unwrap();
    assert_eq!(
        serde_json::to_value(&deck).unwrap(),
        serde_json::json!({"id": "1", "name": "Aggro", "description": "Fast deck", "cards": []})
    );

    let deck = repo.add_card("1", aldor()).await.unwrap();
    assert_eq!(deck.cards.len(), 1);
    assert_eq!(deck.cards[0].id, "1");
    assert_eq!(deck.cards[0].name, "Aldor Peacekeeper");
}
