use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Memory,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CatalogKind {
    Static,
    Sqlite,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "deckbuilder", version, about = "Deckbuilder card catalog and deck API")]
pub struct Cli {
    /// Deck storage backend
    #[arg(long, value_enum, env = "DECKBUILDER_STORE", default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Directory for the JSON deck store and the default catalog database
    #[arg(long, env = "DECKBUILDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where the card catalog comes from
    #[arg(long, value_enum, env = "DECKBUILDER_CATALOG", default_value_t = CatalogKind::Static)]
    pub catalog: CatalogKind,

    /// SQLite catalog path (defaults to <data-dir>/catalog.sqlite3)
    #[arg(long, env = "DECKBUILDER_CATALOG_DB")]
    pub catalog_db: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeCmd),
    /// Card catalog operations
    #[command(subcommand)]
    Catalog(CatalogCmd),
    /// Deck operations
    #[command(subcommand)]
    Deck(DeckCmd),
}

#[derive(Debug, Args, Clone)]
pub struct ServeCmd {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Static files root; uploads land in <public-dir>/uploads
    #[arg(long, env = "DECKBUILDER_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Request body limit for deck uploads, in MiB
    #[arg(long, env = "DECKBUILDER_MAX_UPLOAD_MB", default_value_t = 25)]
    pub max_upload_mb: usize,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CatalogCmd {
    List,
    /// Upsert cards into the SQLite catalog
    Seed {
        /// JSON array of cards; the built-in list when omitted
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum DeckCmd {
    List,
}
