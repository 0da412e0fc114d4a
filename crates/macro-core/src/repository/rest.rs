//! HTTP store
//!
//! Talks to the bot's REST backend. One collection per entity kind
//! (`/groups`, `/buttons`, `/contents`), each filterable by `guildId`, plus
//! the channel directory and the current-user endpoint.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::traits::{check_then_write, Channel, ChannelDirectory, Repository, SessionProvider, Upserted};
use crate::config::{EditorConfig, UpsertStrategy};
use crate::domain::{CurrentUser, DomainError, DomainResult, Entity, EntityKind};

/// Unreserved characters stay literal in path segments and query values
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    strategy: UpsertStrategy,
}

impl RestStore {
    pub fn new(config: &EditorConfig) -> DomainResult<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_millis(config.request_timeout_ms));

        let client = builder
            .build()
            .map_err(|e| DomainError::Internal(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            strategy: config.upsert_strategy,
        })
    }

    // ========================================================================
    // URLs
    // ========================================================================

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }

    fn entity_url(&self, kind: EntityKind, id: Uuid) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    fn list_url(&self, kind: EntityKind, guild_id: &str) -> String {
        format!("{}?guildId={}", self.collection_url(kind), encode(guild_id))
    }

    fn channels_url(&self, guild_id: &str) -> String {
        format!("{}/channels?guildId={}", self.base_url, encode(guild_id))
    }

    fn channel_url(&self, guild_id: &str, channel_id: &str) -> String {
        format!(
            "{}/channels/{}?guildId={}",
            self.base_url,
            encode(channel_id),
            encode(guild_id)
        )
    }

    fn current_user_url(&self) -> String {
        format!("{}/auth/me", self.base_url)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn send(&self, request: RequestBuilder) -> DomainResult<Response> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    /// Decode a JSON body; `None` for an empty one
    async fn read_json<R: DeserializeOwned>(response: Response) -> DomainResult<Option<R>> {
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| DomainError::Decode(e.to_string()))
    }

    async fn get_optional<R: DeserializeOwned>(&self, url: String) -> DomainResult<Option<R>> {
        match self.send(self.client.get(&url)).await {
            Ok(response) => Self::read_json(response).await,
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write<T: Entity + Serialize + DeserializeOwned>(
        &self,
        request: RequestBuilder,
        entity: &T,
    ) -> DomainResult<T> {
        let response = self.send(request.json(entity)).await?;
        match response.text().await {
            Ok(body) => Ok(written_entity(&body, entity)),
            Err(e) => {
                warn!(entity = %T::KIND, id = %entity.id(), error = %e, "write response unreadable, keeping sent record");
                Ok(entity.clone())
            }
        }
    }
}

/// The record echoed by a write, or the sent one when the body is empty
/// (204) or does not decode.
fn written_entity<T: Entity + DeserializeOwned>(body: &str, sent: &T) -> T {
    if body.trim().is_empty() {
        return sent.clone();
    }
    match serde_json::from_str(body) {
        Ok(echoed) => echoed,
        Err(e) => {
            warn!(entity = %T::KIND, id = %sent.id(), error = %e, "write response did not decode, keeping sent record");
            sent.clone()
        }
    }
}

fn status_error(status: StatusCode, body: String) -> DomainError {
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body
    };
    match status {
        StatusCode::NOT_FOUND => DomainError::NotFound(message),
        StatusCode::CONFLICT => DomainError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => DomainError::InvalidInput(message),
        _ => DomainError::Status { code: status.as_u16(), message },
    }
}

#[async_trait(?Send)]
impl<T> Repository<T> for RestStore
where
    T: Entity + Serialize + DeserializeOwned + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<T>> {
        self.get_optional(self.entity_url(T::KIND, id)).await
    }

    async fn create(&self, entity: &T) -> DomainResult<T> {
        self.write(self.client.post(self.collection_url(T::KIND)), entity).await
    }

    async fn update(&self, entity: &T) -> DomainResult<T> {
        self.write(self.client.put(self.entity_url(T::KIND, entity.id())), entity).await
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.send(self.client.delete(self.entity_url(T::KIND, id))).await?;
        Ok(())
    }

    async fn list_by_guild(&self, guild_id: &str) -> DomainResult<Vec<T>> {
        let response = self.send(self.client.get(self.list_url(T::KIND, guild_id))).await?;
        Ok(Self::read_json(response).await?.unwrap_or_default())
    }

    async fn upsert(&self, entity: &T) -> DomainResult<Upserted> {
        match self.strategy {
            UpsertStrategy::CheckThenWrite => check_then_write(self, entity).await,
            UpsertStrategy::Replace => {
                self.write(self.client.put(self.entity_url(T::KIND, entity.id())), entity)
                    .await?;
                Ok(Upserted::Replaced)
            }
        }
    }
}

#[async_trait(?Send)]
impl ChannelDirectory for RestStore {
    async fn list_channels(&self, guild_id: &str) -> DomainResult<Vec<Channel>> {
        let response = self.send(self.client.get(self.channels_url(guild_id))).await?;
        Ok(Self::read_json(response).await?.unwrap_or_default())
    }

    async fn channel_name(&self, guild_id: &str, channel_id: &str) -> DomainResult<Option<String>> {
        let channel: Option<Channel> = self.get_optional(self.channel_url(guild_id, channel_id)).await?;
        Ok(channel.map(|c| c.name))
    }
}

#[async_trait(?Send)]
impl SessionProvider for RestStore {
    async fn current_user(&self) -> DomainResult<Option<CurrentUser>> {
        match self.send(self.client.get(self.current_user_url())).await {
            Ok(response) => Self::read_json(response).await,
            Err(DomainError::Status { code: 401, .. }) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GroupRecord;

    fn store(base: &str) -> RestStore {
        let config = EditorConfig { api_base_url: base.to_string(), ..EditorConfig::default() };
        RestStore::new(&config).unwrap()
    }

    #[test]
    fn test_entity_urls() {
        let store = store("http://localhost:8080/api/v1/");
        let id = Uuid::nil();

        assert_eq!(store.collection_url(EntityKind::Button), "http://localhost:8080/api/v1/buttons");
        assert_eq!(
            store.entity_url(EntityKind::Content, id),
            "http://localhost:8080/api/v1/contents/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            store.list_url(EntityKind::Group, "1234"),
            "http://localhost:8080/api/v1/groups?guildId=1234"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let store = store("http://api");
        assert_eq!(store.channels_url("a b&c"), "http://api/channels?guildId=a%20b%26c");
        assert_eq!(store.channel_url("g", "x/y"), "http://api/channels/x%2Fy?guildId=g");
        assert_eq!(store.current_user_url(), "http://api/auth/me");
    }

    #[test]
    fn test_write_echo_fallbacks() {
        let sent = GroupRecord { id: Uuid::new_v4(), name: "sent".into(), index: 0, guild_id: "g".into() };
        let echoed = GroupRecord { name: "echoed".into(), ..sent.clone() };
        let echo_body = serde_json::to_string(&echoed).unwrap();

        assert_eq!(written_entity(&echo_body, &sent), echoed);
        assert_eq!(written_entity("", &sent), sent);
        assert_eq!(written_entity("<html>bad gateway</html>", &sent), sent);
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert_eq!(
            status_error(StatusCode::CONFLICT, "dup".into()),
            DomainError::Conflict("dup".into())
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, String::new()),
            DomainError::Status { code: 502, message: "Bad Gateway".into() }
        );
    }
}
