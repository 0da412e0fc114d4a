//! Repository Layer - Core Traits
//!
//! Abstract interfaces to the remote store and the external directories the
//! editor consumes. Implementations can be HTTP, in-memory, etc.
//!
//! Futures are not required to be `Send`: the editor runs on a single UI
//! thread and the browser HTTP client is not thread-safe.

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{ButtonRecord, ContentRecord, CurrentUser, DomainResult, Entity, GroupRecord};

/// Which write an upsert ended up issuing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
    /// Single insert-or-replace call; the store does not say which
    Replaced,
}

/// Core repository trait for CRUD operations
///
/// Generic over any persisted record type.
#[async_trait(?Send)]
pub trait Repository<T: Entity> {
    /// Find record by ID. `Ok(None)` when the store reports it absent.
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<T>>;

    /// Create a new record
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Replace an existing record
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete record by ID
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// All records of this kind belonging to a guild
    async fn list_by_guild(&self, guild_id: &str) -> DomainResult<Vec<T>>;

    /// Create-or-update. Stores with a native insert-or-replace primitive
    /// override this to collapse the round trips.
    async fn upsert(&self, entity: &T) -> DomainResult<Upserted> {
        check_then_write(self, entity).await
    }
}

/// Existence check followed by update or create.
///
/// A failed lookup is treated as "absent" and falls through to a create, and
/// an update that finds the record gone is retried as a create. Other write
/// errors propagate.
///
/// No version token guards the window between the two calls, so a concurrent
/// editor of the same guild can be overwritten (last write wins per entity).
pub async fn check_then_write<T, R>(repo: &R, entity: &T) -> DomainResult<Upserted>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    let exists = match repo.find_by_id(entity.id()).await {
        Ok(found) => found.is_some(),
        Err(e) if e.is_not_found() => false,
        Err(e) => {
            warn!(entity = %T::KIND, id = %entity.id(), error = %e, "existence check failed, creating");
            false
        }
    };

    if exists {
        match repo.update(entity).await {
            Ok(_) => return Ok(Upserted::Updated),
            Err(e) if e.is_not_found() => {
                warn!(entity = %T::KIND, id = %entity.id(), "record vanished before update, creating");
            }
            Err(e) => return Err(e),
        }
    }
    repo.create(entity).await?;
    Ok(Upserted::Created)
}

/// Everything the editor persists
pub trait MacroStore:
    Repository<GroupRecord> + Repository<ButtonRecord> + Repository<ContentRecord>
{
}

impl<S> MacroStore for S where
    S: Repository<GroupRecord> + Repository<ButtonRecord> + Repository<ContentRecord> + ?Sized
{
}

/// A guild text channel
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// External channel directory
#[async_trait(?Send)]
pub trait ChannelDirectory {
    /// Channels of a guild, without the "no channel" sentinel
    async fn list_channels(&self, guild_id: &str) -> DomainResult<Vec<Channel>>;

    /// Display name of one channel, `None` if the directory does not know it
    async fn channel_name(&self, guild_id: &str, channel_id: &str) -> DomainResult<Option<String>>;
}

/// External authentication/session provider
#[async_trait(?Send)]
pub trait SessionProvider {
    async fn current_user(&self) -> DomainResult<Option<CurrentUser>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, StoreCall};
    use crate::EntityKind;

    fn group() -> GroupRecord {
        GroupRecord { id: Uuid::new_v4(), name: "g".into(), index: 0, guild_id: "guild".into() }
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back_to_create() {
        let store = InMemoryStore::new();
        store.fail_lookups(true).await;
        let record = group();

        let outcome = Repository::<GroupRecord>::upsert(&store, &record).await.unwrap();

        assert_eq!(outcome, Upserted::Created);
        assert!(store.get::<GroupRecord>(record.id).await.is_some());
        assert_eq!(
            store.calls().await,
            vec![StoreCall::Find(EntityKind::Group, record.id), StoreCall::Create(EntityKind::Group, record.id)]
        );
    }

    #[tokio::test]
    async fn test_existing_record_is_updated() {
        let store = InMemoryStore::new();
        let mut record = group();
        store.insert(record.clone()).await;
        record.name = "renamed".into();

        let outcome = Repository::<GroupRecord>::upsert(&store, &record).await.unwrap();

        assert_eq!(outcome, Upserted::Updated);
        assert_eq!(store.get::<GroupRecord>(record.id).await.unwrap().name, "renamed");
    }

    #[tokio::test]
    async fn test_failed_create_after_failed_lookup_propagates() {
        let store = InMemoryStore::new();
        store.fail_lookups(true).await;
        store.fail_nth_write(EntityKind::Group, 1).await;

        assert!(Repository::<GroupRecord>::upsert(&store, &group()).await.is_err());
        assert_eq!(store.count::<GroupRecord>().await, 0);
    }
}
