//! REST-bridge implementation of the `Host` trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use maestro_core::documents::{Actor, Item, Playlist, User};
use maestro_core::error::DomainError;
use maestro_core::host::{DocumentRef, Host, SoundCommand, SoundEndRegistry, SoundKey};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tracing::debug;

use crate::paths;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Host reached through its REST bridge.
#[derive(Debug, Clone)]
pub struct HttpHost {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
    sound_end: Arc<SoundEndRegistry>,
}

impl HttpHost {
    /// Creates a host for the bridge at `base_url`, acting as `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: &str,
        user_id: &str,
        sound_end: Arc<SoundEndRegistry>,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("bridge client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            user_id: user_id.to_owned(),
            sound_end,
        })
    }

    /// The registry fed by the host's "sound ended" events.
    #[must_use]
    pub fn sound_end_registry(&self) -> Arc<SoundEndRegistry> {
        Arc::clone(&self.sound_end)
    }

    /// Absolute URL for a bridge path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Response, DomainError> {
        debug!(%method, path, "bridge request");
        let mut request = self.client.request(method, self.url(path)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("bridge request to {path} failed: {e}")))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, DomainError> {
        let response = self.send(Method::GET, path, query, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check(path, response)?;
        response
            .json()
            .await
            .map(Some)
            .map_err(|e| DomainError::Infrastructure(format!("bridge response from {path}: {e}")))
    }

    async fn fetch_required<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        self.fetch(path, &[])
            .await?
            .ok_or_else(|| DomainError::Infrastructure(format!("bridge has no {path}")))
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), DomainError> {
        let response = self.send(method, path, &[], body).await?;
        check(path, response).map(|_| ())
    }
}

fn check(path: &str, response: Response) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DomainError::Infrastructure(format!(
            "bridge returned {status} for {path}"
        )))
    }
}

fn to_body(value: &impl Serialize) -> Result<Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::Infrastructure(format!("bridge request body: {e}")))
}

#[async_trait]
impl Host for HttpHost {
    fn current_user_id(&self) -> &str {
        &self.user_id
    }

    async fn users(&self) -> Result<Vec<User>, DomainError> {
        self.fetch_required(paths::USERS).await
    }

    async fn settings(&self) -> Result<Value, DomainError> {
        Ok(self.fetch(paths::SETTINGS, &[]).await?.unwrap_or(Value::Null))
    }

    async fn store_settings(&self, settings: &Value) -> Result<(), DomainError> {
        self.command(Method::PUT, paths::SETTINGS, Some(settings))
            .await
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, DomainError> {
        self.fetch_required(paths::PLAYLISTS).await
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, DomainError> {
        self.fetch(&paths::playlist(playlist_id), &[]).await
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist, DomainError> {
        let body = json!({ "name": name });
        let response = self
            .send(Method::POST, paths::PLAYLISTS, &[], Some(&body))
            .await?;
        check(paths::PLAYLISTS, response)?
            .json()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("bridge created playlist: {e}")))
    }

    async fn actor(&self, actor_id: &str) -> Result<Option<Actor>, DomainError> {
        self.fetch(&paths::actor(actor_id), &[]).await
    }

    async fn actors(&self) -> Result<Vec<Actor>, DomainError> {
        self.fetch_required(paths::ACTORS).await
    }

    async fn item(
        &self,
        actor_id: Option<&str>,
        item_id: &str,
    ) -> Result<Option<Item>, DomainError> {
        let query: Vec<(&str, &str)> = actor_id.map(|a| ("actor", a)).into_iter().collect();
        self.fetch(&paths::item(item_id), &query).await
    }

    async fn set_flags(&self, document: &DocumentRef, patch: &Value) -> Result<(), DomainError> {
        self.command(Method::PATCH, &paths::flags(document), Some(patch))
            .await
    }

    async fn play_sound(&self, key: &SoundKey) -> Result<(), DomainError> {
        self.command(Method::POST, &paths::sound_play(key), None)
            .await
    }

    async fn play_playlist(&self, playlist_id: &str) -> Result<(), DomainError> {
        self.command(Method::POST, &paths::playlist_play(playlist_id), None)
            .await
    }

    async fn stop_playlist(&self, playlist_id: &str) -> Result<(), DomainError> {
        self.command(Method::POST, &paths::playlist_stop(playlist_id), None)
            .await
    }

    async fn update_sound(
        &self,
        key: &SoundKey,
        command: SoundCommand,
    ) -> Result<(), DomainError> {
        let body = to_body(&command)?;
        self.command(Method::PATCH, &paths::sound(key), Some(&body))
            .await
    }

    fn sound_ended(&self, key: &SoundKey) -> oneshot::Receiver<()> {
        self.sound_end.subscribe(key)
    }
}
