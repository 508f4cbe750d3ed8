use chrono::{DateTime, Utc};
use deckbuilder_core::{repo::DeckRepository, Card, CoreError, Deck, DeckFields, IdSequence};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tokio::task;

pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    next_id: u64,
    decks: Vec<Deck>,
}

#[derive(Clone)]
struct State {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    ids: IdSequence,
    decks: Vec<Deck>,
}

impl State {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            ids: IdSequence::default(),
            decks: Vec::new(),
        }
    }

    fn to_image(&self) -> FileImage {
        FileImage {
            version: FILE_VERSION,
            created_at: self.created_at,
            updated_at: self.updated_at,
            next_id: self.ids.peek(),
            decks: self.decks.clone(),
        }
    }

    fn from_image(img: FileImage) -> Self {
        // Files edited by hand may carry a stale counter; never hand out an id already on disk.
        let highest = img
            .decks
            .iter()
            .filter_map(|d| d.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            created_at: img.created_at,
            updated_at: img.updated_at,
            ids: IdSequence::starting_at(img.next_id.max(highest + 1)),
            decks: img.decks,
        }
    }
}

/// Deck repository persisted to a single JSON file.
///
/// Every mutation rewrites the file atomically (temp file + rename) and drops a
/// timestamped copy into the backups directory, keeping the newest `max_backups`.
pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
    writer: Mutex<()>,
}

impl JsonStore {
    pub async fn open_in(root: &Path) -> Result<Self, CoreError> {
        let (file, backups) = paths::store_files(root);
        Self::open_with(file, backups, 10).await
    }

    pub async fn open_with(path: PathBuf, backups_dir: PathBuf, max_backups: usize) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path).await?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the state, writes the copy, and only then makes it current.
    ///
    /// A failed write leaves both the file and the in-memory state as they were.
    async fn commit<T, F>(&self, change: F) -> Result<T, CoreError>
    where
        T: Send,
        F: FnOnce(&mut State) -> Result<T, CoreError> + Send,
    {
        // Held across copy, write and swap so mutations apply in order.
        let _guard = self.writer.lock().await;
        let mut next = self.state.read().clone();
        let out = change(&mut next)?;
        next.updated_at = Utc::now();

        let snapshot = next.to_image();
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;
        task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|_| CoreError::Storage("io"))?;

        *self.state.write() = next;
        Ok(out)
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

async fn load_or_init(path: &Path) -> Result<State, CoreError> {
    if path.exists() {
        let p = path.to_path_buf();
        let img: FileImage = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            let v = serde_json::from_str::<FileImage>(&buf)?;
            Ok::<FileImage, std::io::Error>(v)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))
        .and_then(|r| r.map_err(|_| CoreError::Storage("corrupt store file")))?;
        Ok(State::from_image(img))
    } else {
        let st = State::new_empty();
        write_atomic(path, &encode(&st.to_image())?).map_err(|_| CoreError::Storage("io"))?;
        Ok(st)
    }
}

fn encode(img: &FileImage) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(img).map_err(|_| CoreError::Storage("serialize"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

fn write_with_backup(path: &Path, backups_dir: &Path, max_backups: usize, img: &FileImage) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img)?;

    // Backup goes first; the store file is written last so nothing lands there unless all else did.
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
    let backup_path = backups_dir.join(format!("decks-{ts}.json"));
    write_atomic(&backup_path, &json)?;
    rotate_backups(backups_dir, max_backups)?;

    write_atomic(path, &json)
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    // Names embed the timestamp, so lexical order is age order.
    entries.sort_by_key(|e| e.file_name());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

use async_trait::async_trait;

#[async_trait]
impl DeckRepository for JsonStore {
    async fn list_decks(&self) -> Result<Vec<Deck>, CoreError> {
        Ok(self.state.read().decks.clone())
    }

    async fn get_deck(&self, id: &str) -> Result<Deck, CoreError> {
        let s = self.state.read();
        s.decks
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(CoreError::NotFound("deck"))
    }

    async fn create_deck(&self, fields: DeckFields, image: Option<String>) -> Result<Deck, CoreError> {
        self.commit(move |s| {
            let deck = Deck::new(s.ids.next_id(), fields, image);
            s.decks.push(deck.clone());
            Ok(deck)
        })
        .await
    }

    async fn update_deck(
        &self,
        id: &str,
        fields: DeckFields,
        image: Option<String>,
    ) -> Result<Deck, CoreError> {
        self.commit(move |s| {
            let d = find_mut(s, id)?;
            d.apply(fields, image);
            Ok(d.clone())
        })
        .await
    }

    async fn add_card(&self, id: &str, card: Card) -> Result<Deck, CoreError> {
        self.commit(move |s| {
            let d = find_mut(s, id)?;
            d.cards.push(card);
            Ok(d.clone())
        })
        .await
    }

    async fn delete_deck(&self, id: &str) -> Result<(), CoreError> {
        self.commit(move |s| {
            let idx = s
                .decks
                .iter()
                .position(|d| d.id == id)
                .ok_or(CoreError::NotFound("deck"))?;
            s.decks.remove(idx);
            Ok(())
        })
        .await
    }
}

fn find_mut<'a>(s: &'a mut State, id: &str) -> Result<&'a mut Deck, CoreError> {
    s.decks
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or(CoreError::NotFound("deck"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckbuilder_core::builtin_cards;

    fn fields(name: &str) -> DeckFields {
        DeckFields::new(name, format!("{name} deck"))
    }

    #[tokio::test]
    async fn fresh_store_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_in(dir.path()).await.unwrap();

        assert!(store.path().exists());
        assert!(store.list_decks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn decks_and_counter_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let card = builtin_cards().unwrap().remove(0);
        {
            let store = JsonStore::open_in(dir.path()).await.unwrap();
            store.create_deck(fields("Aggro"), Some("/uploads/1.png".into())).await.unwrap();
            store.create_deck(fields("Control"), None).await.unwrap();
            store.add_card("1", card.clone()).await.unwrap();
            store.delete_deck("2").await.unwrap();
        }

        let store = JsonStore::open_in(dir.path()).await.unwrap();
        let decks = store.list_decks().await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].name, "Aggro");
        assert_eq!(decks[0].image.as_deref(), Some("/uploads/1.png"));
        assert_eq!(decks[0].cards, vec![card]);

        let next = store.create_deck(fields("Midrange"), None).await.unwrap();
        assert_eq!(next.id, "3");
    }

    #[tokio::test]
    async fn missing_deck_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_in(dir.path()).await.unwrap();
        store.create_deck(fields("Aggro"), None).await.unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.update_deck("7", fields("x"), None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.delete_deck("7").await.unwrap_err().is_not_found());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn backups_are_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let (file, backups) = paths::store_files(dir.path());
        let store = JsonStore::open_with(file, backups.clone(), 2).await.unwrap();
        for n in ["a", "b", "c", "d"] {
            store.create_deck(fields(n), None).await.unwrap();
        }

        let count = fs::read_dir(&backups).unwrap().count();
        assert!(count <= 2, "kept {count} backups");
    }

    #[test]
    fn counter_is_raised_past_ids_on_disk() {
        let now = Utc::now();
        let img = FileImage {
            version: FILE_VERSION,
            created_at: now,
            updated_at: now,
            next_id: 1,
            decks: vec![Deck::new("5".into(), fields("x"), None)],
        };
        let mut st = State::from_image(img);
        assert_eq!(st.ids.next_id(), "6");
    }

    #[tokio::test]
    async fn failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (file, backups) = paths::store_files(dir.path());
        let store = JsonStore::open_with(file, backups.clone(), 3).await.unwrap();
        store.create_deck(fields("Aggro"), None).await.unwrap();
        let on_disk = fs::read(store.path()).unwrap();

        // A plain file where the backups directory belongs makes every write fail.
        fs::remove_dir_all(&backups).unwrap();
        fs::write(&backups, b"not a directory").unwrap();

        let err = store.create_deck(fields("Control"), None).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert!(store.update_deck("1", fields("Tempo"), None).await.is_err());
        assert!(store.delete_deck("1").await.is_err());

        let decks = store.list_decks().await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].name, "Aggro");
        assert_eq!(fs::read(store.path()).unwrap(), on_disk);

        // The failed create did not consume an id.
        fs::remove_file(&backups).unwrap();
        let next = store.create_deck(fields("Control"), None).await.unwrap();
        assert_eq!(next.id, "2");
    }
}
