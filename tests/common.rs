//! Test utilities & fixtures.
//! Saves are pointed at per-test temp directories; the directory guard must
//! outlive the store.

use std::path::PathBuf;

use veilspire::game::SaveStore;

/// A save store rooted in a fresh temp directory.
pub fn temp_store() -> (tempfile::TempDir, SaveStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SaveStore::new(Some(dir.path().to_path_buf()));
    (dir, store)
}

/// Write raw JSON as the save document inside `dir`.
#[allow(dead_code)] // Not every integration test writes raw documents.
pub fn write_raw_save(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("savegame.json");
    std::fs::write(&path, contents).expect("write save");
    path
}
