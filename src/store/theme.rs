use crate::database::KeyValueStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub is_dark: bool,
}

fn theme_value(is_dark: bool) -> &'static str {
    if is_dark {
        "dark"
    } else {
        "light"
    }
}

/// Dark/light preference, persisted as "dark" or "light".
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    is_dark: RwLock<bool>,
}

impl ThemeStore {
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let is_dark = match storage.get(THEME_KEY).await {
            Ok(value) => value.as_deref() == Some("dark"),
            Err(e) => {
                tracing::debug!("Could not read theme preference: {}", e);
                false
            }
        };

        Self {
            storage,
            is_dark: RwLock::new(is_dark),
        }
    }

    pub async fn state(&self) -> ThemeState {
        ThemeState {
            is_dark: *self.is_dark.read().await,
        }
    }

    pub async fn toggle(&self) -> ThemeState {
        let mut is_dark = self.is_dark.write().await;
        let next = !*is_dark;
        self.persist(next).await;
        *is_dark = next;
        ThemeState { is_dark: next }
    }

    pub async fn set(&self, dark: bool) -> ThemeState {
        let mut is_dark = self.is_dark.write().await;
        self.persist(dark).await;
        *is_dark = dark;
        ThemeState { is_dark: dark }
    }

    async fn persist(&self, is_dark: bool) {
        if let Err(e) = self.storage.set(THEME_KEY, theme_value(is_dark)).await {
            tracing::warn!("Failed to persist theme preference: {}", e);
        }
    }
}
