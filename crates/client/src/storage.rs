//! Cross-platform persisted client storage.
//!
//! - Web: `localStorage`
//! - Desktop: one file per key in the platform config directory:
//!   - Linux: `~/.config/huddle/`
//!   - macOS: `~/Library/Application Support/huddle/`
//!   - Windows: `%APPDATA%\huddle\`
//!
//! Values are stored as plain strings, the way the browser stores them.

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Read a value. `None` if the key is absent or storage is unavailable.
pub fn get_item(key: &str) -> Option<String> {
    load_raw(key)
}

/// Write a value. Returns `true` if the operation succeeded.
pub fn set_item(key: &str, value: &str) -> bool {
    save_raw(key, value)
}

pub fn remove_item(key: &str) {
    remove_raw(key);
}

/// The stored bearer token, if any. Surrounding whitespace is ignored and
/// an empty value counts as absent.
pub fn token() -> Option<String> {
    normalize_token(get_item(TOKEN_KEY)?)
}

fn normalize_token(raw: String) -> Option<String> {
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

pub fn set_token(token: &str) -> bool {
    set_item(TOKEN_KEY, token)
}

pub fn clear_token() {
    remove_item(TOKEN_KEY);
}

// =========================================
// Web (WASM) implementation
// =========================================

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn save_raw(key: &str, value: &str) -> bool {
    local_storage().is_some_and(|storage| storage.set_item(key, value).is_ok())
}

#[cfg(target_arch = "wasm32")]
fn load_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn remove_raw(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

// =========================================
// Desktop (native) implementation
// =========================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    pub(super) fn config_dir() -> Option<PathBuf> {
        let app_dir = dirs::config_dir()?.join("huddle");
        if !app_dir.exists() {
            std::fs::create_dir_all(&app_dir).ok()?;
        }
        Some(app_dir)
    }

    pub(super) fn file_path(dir: &Path, key: &str) -> PathBuf {
        // Sanitize key to be a valid filename
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        dir.join(safe_key)
    }

    pub(super) fn save_in(dir: &Path, key: &str, value: &str) -> bool {
        std::fs::write(file_path(dir, key), value).is_ok()
    }

    pub(super) fn load_in(dir: &Path, key: &str) -> Option<String> {
        std::fs::read_to_string(file_path(dir, key)).ok()
    }

    pub(super) fn remove_in(dir: &Path, key: &str) {
        let _ = std::fs::remove_file(file_path(dir, key));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn save_raw(key: &str, value: &str) -> bool {
    native::config_dir().is_some_and(|dir| native::save_in(&dir, key, value))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_raw(key: &str) -> Option<String> {
    native::load_in(&native::config_dir()?, key)
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_raw(key: &str) {
    if let Some(dir) = native::config_dir() {
        native::remove_in(&dir, key);
    }
}
