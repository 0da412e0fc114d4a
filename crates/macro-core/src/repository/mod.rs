//! Repository Layer
//!
//! Abstract persistence for the macro tree plus the external directories
//! (channels, current user) the editor reads from.

mod memory;
mod rest;
mod traits;

pub use memory::{InMemoryStore, MemoryState, MemoryTable, StoreCall};
pub use rest::RestStore;
pub use traits::{
    check_then_write, Channel, ChannelDirectory, MacroStore, Repository, SessionProvider, Upserted,
};

use crate::domain::{ButtonRecord, ContentRecord, DomainResult, Group, GroupRecord};
use crate::tree::assemble;

/// Fetch the three flat collections of a guild and assemble them into an
/// ordered tree. An empty vector means the guild has nothing stored yet.
pub async fn load_tree<S>(store: &S, guild_id: &str) -> DomainResult<Vec<Group>>
where
    S: MacroStore + ?Sized,
{
    let groups = Repository::<GroupRecord>::list_by_guild(store, guild_id).await?;
    let buttons = Repository::<ButtonRecord>::list_by_guild(store, guild_id).await?;
    let contents = Repository::<ContentRecord>::list_by_guild(store, guild_id).await?;

    tracing::debug!(
        guild_id,
        groups = groups.len(),
        buttons = buttons.len(),
        contents = contents.len(),
        "loaded records"
    );

    Ok(assemble(groups, buttons, contents))
}
