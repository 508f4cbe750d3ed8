use deckbuilder_core::{Card, CardCatalog, CoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Card catalog stored in an embedded SQLite database.
///
/// The service only ever reads it; rows get there through [`SqliteCatalog::seed`].
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let catalog = Self { pool };
        catalog.ensure_schema().await?;
        Ok(catalog)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        // Each connection to :memory: is its own database, so keep exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let catalog = Self { pool };
        catalog.ensure_schema().await?;
        Ok(catalog)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS cards (
          id      TEXT PRIMARY KEY,
          img     TEXT NOT NULL,
          name    TEXT NOT NULL,
          cost    TEXT NOT NULL,
          attack  TEXT NOT NULL,
          health  TEXT NOT NULL,
          text    TEXT NOT NULL
        );
        "#;

        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }

    /// Upserts `cards` by id. Existing rows keep their position in the listing.
    pub async fn seed(&self, cards: &[Card]) -> Result<usize, CoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| CoreError::Storage("tx"))?;
        for c in cards {
            sqlx::query(
                r#"
                INSERT INTO cards (id, img, name, cost, attack, health, text)
                VALUES (?,?,?,?,?,?,?)
                ON CONFLICT(id) DO UPDATE SET
                  img=excluded.img, name=excluded.name, cost=excluded.cost,
                  attack=excluded.attack, health=excluded.health, text=excluded.text
                "#,
            )
            .bind(&c.id)
            .bind(&c.img)
            .bind(&c.name)
            .bind(&c.cost)
            .bind(&c.attack)
            .bind(&c.health)
            .bind(&c.text)
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("insert card"))?;
        }
        tx.commit()
            .await
            .map_err(|_| CoreError::Storage("tx commit"))?;
        Ok(cards.len())
    }
}

#[async_trait::async_trait]
impl CardCatalog for SqliteCatalog {
    async fn list_cards(&self) -> Result<Vec<Card>, CoreError> {
        let rows = sqlx::query(
            "SELECT id,img,name,cost,attack,health,text FROM cards ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list cards"))?;
        Ok(rows.into_iter().map(row_into_card).collect())
    }
}

fn row_into_card(row: SqliteRow) -> Card {
    Card {
        id: row.get("id"),
        img: row.get("img"),
        name: row.get("name"),
        cost: row.get("cost"),
        attack: row.get("attack"),
        health: row.get("health"),
        text: row.get("text"),
    }
}
