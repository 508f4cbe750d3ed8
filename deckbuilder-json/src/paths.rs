use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "deckbuilder", "Deckbuilder") {
        pd.data_dir().to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// (store file, backups dir) under `root`.
pub fn store_files(root: &Path) -> (PathBuf, PathBuf) {
    (root.join("decks.json"), root.join("backups"))
}
