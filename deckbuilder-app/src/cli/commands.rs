use crate::api::server as api_server;
use crate::cli::opts::*;
use crate::uploads::DiskImageStore;

use anyhow::{Context, Result};
use deckbuilder_core::{builtin_cards, Card, CardCatalog, DeckRepository, MemoryRepo, StaticCatalog};
use deckbuilder_json::paths::data_root;
use deckbuilder_json::JsonStore;
use deckbuilder_sqlite::SqliteCatalog;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub async fn run_cli(args: Cli) -> Result<()> {
    let data_dir = args.data_dir.clone().unwrap_or_else(data_root);
    let catalog_db = args
        .catalog_db
        .clone()
        .unwrap_or_else(|| data_dir.join("catalog.sqlite3"));

    match args.cmd.clone() {
        Command::Serve(cmd) => {
            let decks = open_repo(&args.store, &data_dir).await?;
            let catalog = open_catalog(&args.catalog, &catalog_db).await?;
            serve(decks, catalog, cmd).await
        }
        Command::Catalog(cmd) => catalog_cmd(&args.catalog, &catalog_db, cmd).await,
        Command::Deck(cmd) => {
            let decks = open_repo(&args.store, &data_dir).await?;
            deck_cmd(decks, cmd).await
        }
    }
}

pub async fn open_repo(store: &StoreKind, data_dir: &Path) -> Result<Arc<dyn DeckRepository>> {
    match store {
        StoreKind::Memory => Ok(Arc::new(MemoryRepo::new())),
        StoreKind::Json => {
            let s = JsonStore::open_in(data_dir)
                .await
                .with_context(|| format!("opening deck store in {}", data_dir.display()))?;
            info!(path = %s.path().display(), "using JSON deck store");
            Ok(Arc::new(s))
        }
    }
}

pub async fn open_catalog(kind: &CatalogKind, db_path: &Path) -> Result<Arc<dyn CardCatalog>> {
    match kind {
        CatalogKind::Static => Ok(Arc::new(StaticCatalog::builtin()?)),
        CatalogKind::Sqlite => Ok(Arc::new(open_sqlite(db_path).await?)),
    }
}

async fn open_sqlite(db_path: &Path) -> Result<SqliteCatalog> {
    // A bare filename has an empty parent; nothing to create then.
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating catalog dir {}", parent.display()))?;
    }
    let c = SqliteCatalog::open_file(db_path)
        .await
        .with_context(|| format!("opening card catalog {}", db_path.display()))?;
    info!(path = %db_path.display(), "using SQLite card catalog");
    Ok(c)
}

async fn serve(decks: Arc<dyn DeckRepository>, catalog: Arc<dyn CardCatalog>, cmd: ServeCmd) -> Result<()> {
    let uploads_dir: PathBuf = cmd.public_dir.join("uploads");
    let images = DiskImageStore::open(&uploads_dir, "/uploads")
        .await
        .with_context(|| format!("creating upload dir {}", uploads_dir.display()))?;
    let addr: SocketAddr = format!("{}:{}", cmd.host, cmd.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cmd.host, cmd.port))?;

    let state = api_server::AppState {
        decks,
        catalog,
        images: Arc::new(images),
    };
    let opts = api_server::ServeOptions {
        public_dir: cmd.public_dir,
        max_body_bytes: cmd.max_upload_mb * 1024 * 1024,
    };
    api_server::run(state, opts, addr).await
}

async fn catalog_cmd(kind: &CatalogKind, db_path: &Path, cmd: CatalogCmd) -> Result<()> {
    match cmd {
        CatalogCmd::List => {
            let catalog = open_catalog(kind, db_path).await?;
            for c in catalog.list_cards().await? {
                println!("{}\t{}\t{}/{}/{}\t{}", c.id, c.name, c.cost, c.attack, c.health, c.text);
            }
        }
        CatalogCmd::Seed { from } => {
            let cards = match from {
                Some(path) => read_cards(&path)?,
                None => builtin_cards()?,
            };
            let catalog = open_sqlite(db_path).await?;
            let n = catalog.seed(&cards).await?;
            println!("seeded {n} card(s) into {}", db_path.display());
        }
    }
    Ok(())
}

async fn deck_cmd(repo: Arc<dyn DeckRepository>, cmd: DeckCmd) -> Result<()> {
    match cmd {
        DeckCmd::List => {
            for d in repo.list_decks().await? {
                let image = d.image.as_deref().unwrap_or("-");
                println!("{}\t{}\t{}\tcards={}\timage={}", d.id, d.name, d.description, d.cards.len(), image);
            }
        }
    }
    Ok(())
}

fn read_cards(path: &Path) -> Result<Vec<Card>> {
    let data = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cards: Vec<Card> = serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cards)
}
