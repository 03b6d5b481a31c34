//! Data directory layout for Confab.

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "CONFAB_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CONFAB_DATA_DIR` environment variable
/// 2. `~/.confab`
/// 3. `.confab` in the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".confab");
    }

    PathBuf::from(".confab")
}

/// Path of the store snapshot: `{data_dir}/{name}.json`.
pub fn snapshot_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{name}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_path() {
        let data_dir = PathBuf::from("/home/user/.confab");
        assert_eq!(
            snapshot_path(&data_dir, "chat-session"),
            PathBuf::from("/home/user/.confab/chat-session.json")
        );
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: no other test in this crate reads or writes this variable.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-confab");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-confab"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
