//! In-memory store
//!
//! Keeps records in hash maps, logs every call it receives, and can be told
//! to fail specific operations. Backs the reconciler, session and resolver
//! tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::traits::{Channel, ChannelDirectory, Repository, SessionProvider};
use crate::domain::{
    ButtonRecord, ContentRecord, CurrentUser, DomainError, DomainResult, Entity, EntityKind, GroupRecord,
};

/// One call observed by the store, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Find(EntityKind, Uuid),
    Create(EntityKind, Uuid),
    Update(EntityKind, Uuid),
    Delete(EntityKind, Uuid),
    List(EntityKind),
    ChannelName(String),
    ListChannels,
}

#[derive(Default)]
pub struct MemoryState {
    groups: HashMap<Uuid, GroupRecord>,
    buttons: HashMap<Uuid, ButtonRecord>,
    contents: HashMap<Uuid, ContentRecord>,
    channels: Vec<Channel>,
    user: Option<CurrentUser>,
    calls: Vec<StoreCall>,
    /// (kind, 1-based write number) pairs that must fail
    failing_writes: HashSet<(EntityKind, usize)>,
    writes: HashMap<EntityKind, usize>,
    failing_channels: HashSet<String>,
    failing_lookups: bool,
    unavailable: bool,
}

/// Per-record access to the right table
pub trait MemoryTable: Entity {
    fn table(state: &MemoryState) -> &HashMap<Uuid, Self>;
    fn table_mut(state: &mut MemoryState) -> &mut HashMap<Uuid, Self>;
}

impl MemoryTable for GroupRecord {
    fn table(state: &MemoryState) -> &HashMap<Uuid, Self> {
        &state.groups
    }
    fn table_mut(state: &mut MemoryState) -> &mut HashMap<Uuid, Self> {
        &mut state.groups
    }
}

impl MemoryTable for ButtonRecord {
    fn table(state: &MemoryState) -> &HashMap<Uuid, Self> {
        &state.buttons
    }
    fn table_mut(state: &mut MemoryState) -> &mut HashMap<Uuid, Self> {
        &mut state.buttons
    }
}

impl MemoryTable for ContentRecord {
    fn table(state: &MemoryState) -> &HashMap<Uuid, Self> {
        &state.contents
    }
    fn table_mut(state: &mut MemoryState) -> &mut HashMap<Uuid, Self> {
        &mut state.contents
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channels(channels: Vec<Channel>) -> Self {
        Self {
            state: Mutex::new(MemoryState { channels, ..MemoryState::default() }),
        }
    }

    /// Make the `nth` (1-based) create/update of `kind` fail
    pub async fn fail_nth_write(&self, kind: EntityKind, nth: usize) {
        self.state.lock().await.failing_writes.insert((kind, nth));
    }

    pub async fn fail_channel(&self, channel_id: &str) {
        self.state.lock().await.failing_channels.insert(channel_id.to_string());
    }

    /// Answer every `find_by_id` with a server error
    pub async fn fail_lookups(&self, failing: bool) {
        self.state.lock().await.failing_lookups = failing;
    }

    /// Fail every list call, as an unreachable store would
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    pub async fn set_user(&self, user: Option<CurrentUser>) {
        self.state.lock().await.user = user;
    }

    pub async fn insert<T: MemoryTable>(&self, record: T) {
        T::table_mut(&mut *self.state.lock().await).insert(record.id(), record);
    }

    pub async fn get<T: MemoryTable>(&self, id: Uuid) -> Option<T> {
        T::table(&*self.state.lock().await).get(&id).cloned()
    }

    pub async fn count<T: MemoryTable>(&self) -> usize {
        T::table(&*self.state.lock().await).len()
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

impl MemoryState {
    fn write_allowed(&mut self, kind: EntityKind, id: Uuid) -> DomainResult<()> {
        let count = self.writes.entry(kind).or_insert(0);
        *count += 1;
        if self.failing_writes.contains(&(kind, *count)) {
            return Err(DomainError::Transport(format!("injected failure writing {kind} {id}")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl<T: MemoryTable> Repository<T> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<T>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Find(T::KIND, id));
        if state.failing_lookups {
            return Err(DomainError::Status { code: 500, message: "injected lookup failure".into() });
        }
        Ok(T::table(&state).get(&id).cloned())
    }

    async fn create(&self, entity: &T) -> DomainResult<T> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Create(T::KIND, entity.id()));
        state.write_allowed(T::KIND, entity.id())?;
        let table = T::table_mut(&mut state);
        if table.contains_key(&entity.id()) {
            return Err(DomainError::Conflict(format!("{} {} already exists", T::KIND, entity.id())));
        }
        table.insert(entity.id(), entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, entity: &T) -> DomainResult<T> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Update(T::KIND, entity.id()));
        state.write_allowed(T::KIND, entity.id())?;
        match T::table_mut(&mut state).get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(DomainError::NotFound(format!("{} {}", T::KIND, entity.id()))),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Delete(T::KIND, id));
        match T::table_mut(&mut state).remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("{} {}", T::KIND, id))),
        }
    }

    async fn list_by_guild(&self, guild_id: &str) -> DomainResult<Vec<T>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::List(T::KIND));
        if state.unavailable {
            return Err(DomainError::Transport("store unavailable".into()));
        }
        Ok(T::table(&state)
            .values()
            .filter(|r| r.guild_id() == guild_id)
            .cloned()
            .collect())
    }
}

#[async_trait(?Send)]
impl ChannelDirectory for InMemoryStore {
    async fn list_channels(&self, _guild_id: &str) -> DomainResult<Vec<Channel>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::ListChannels);
        if state.unavailable {
            return Err(DomainError::Transport("store unavailable".into()));
        }
        Ok(state.channels.clone())
    }

    async fn channel_name(&self, _guild_id: &str, channel_id: &str) -> DomainResult<Option<String>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::ChannelName(channel_id.to_string()));
        if state.failing_channels.contains(channel_id) {
            return Err(DomainError::Transport(format!("injected failure resolving {channel_id}")));
        }
        Ok(state
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .map(|c| c.name.clone()))
    }
}

#[async_trait(?Send)]
impl SessionProvider for InMemoryStore {
    async fn current_user(&self) -> DomainResult<Option<CurrentUser>> {
        Ok(self.state.lock().await.user.clone())
    }
}
