use deckbuilder_core::{CardCatalog, StaticCatalog};

#[tokio::test]
async fn builtin_catalog_lists_all_cards_in_order() {
    let catalog = StaticCatalog::builtin().unwrap();
    let cards = catalog.list_cards().await.unwrap();

    assert_eq!(cards.len(), 30);
    assert_eq!(cards[0].name, "Aldor Peacekeeper");
    assert_eq!(cards[0].img, "images/aldorpeacekeeper.png");
    assert_eq!(cards[29].id, "30");
    for (i, c) in cards.iter().enumerate() {
        assert_eq!(c.id, (i + 1).to_string());
    }
}

#[tokio::test]
async fn custom_catalog_returns_what_it_was_given() {
    let catalog = StaticCatalog::new(Vec::new());
    assert!(catalog.list_cards().await.unwrap().is_empty());
}
