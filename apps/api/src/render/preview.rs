//! Revocable in-memory preview handles for generated PDFs.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// What the UI receives to display a document inline.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewHandle {
    pub token: Uuid,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PreviewEntry {
    filename: String,
    bytes: Bytes,
    expires_at: DateTime<Utc>,
}

/// Shared preview registry. Cheap to clone; all clones see the same entries.
#[derive(Clone)]
pub struct PreviewStore {
    entries: Arc<RwLock<HashMap<Uuid, PreviewEntry>>>,
    ttl: Duration,
}

impl PreviewStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Registers `bytes` and returns a handle valid for the store's TTL.
    pub async fn issue(&self, filename: String, bytes: Bytes) -> PreviewHandle {
        let token = Uuid::new_v4();
        let expires_at = Utc::now() + self.ttl;

        let mut entries = self.entries.write().await;
        let now = Utc::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            token,
            PreviewEntry {
                filename,
                bytes,
                expires_at,
            },
        );
        debug!(%token, live = entries.len(), "Preview issued");

        PreviewHandle {
            token,
            url: format!("/api/v1/previews/{token}"),
            expires_at,
        }
    }

    /// Returns `(filename, bytes)` for a live handle. Expired handles are evicted.
    pub async fn get(&self, token: Uuid) -> Option<(String, Bytes)> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(&token) {
                Some(e) if e.expires_at > now => {
                    return Some((e.filename.clone(), e.bytes.clone()))
                }
                None => return None,
                Some(_) => {}
            }
        }
        self.entries.write().await.remove(&token);
        None
    }

    /// Revokes a handle. Returns false if it was unknown.
    pub async fn revoke(&self, token: Uuid) -> bool {
        self.entries.write().await.remove(&token).is_some()
    }
}
