use std::path::{Path, PathBuf};

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "KONSPEKT_DATA_DIR";

/// Root directory for konspekt's persisted state.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("konspekt")
}

/// Path of the key-value storage file inside a data directory
pub fn get_storage_path(data_dir: &Path) -> PathBuf {
    data_dir.join("storage.json")
}
