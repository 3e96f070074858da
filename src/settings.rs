//! Player preferences
//!
//! Persisted separately from any game state in LocalStorage. Game results
//! are never persisted; only how the player likes the games to behave.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all sound cues
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zen_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
