//! Editor Session
//!
//! One guild's editing state: the tree, the channel name cache and the
//! save-in-progress flag.

use tracing::{info, warn};

use crate::channels::ChannelNameResolver;
use crate::config::EditorConfig;
use crate::reconcile::{apply_outcome, Reconciler, SaveError, SavePlan, SaveReport};
use crate::repository::{load_tree, ChannelDirectory, MacroStore};
use crate::tree::{seed_groups, MacroTree};

/// Where the initial tree came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    /// Nothing stored for the guild
    SeededEmpty,
    /// The store could not be read
    SeededAfterError,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub tree: MacroTree,
    pub channels: ChannelNameResolver,
    pub source: LoadSource,
    saving: bool,
}

impl EditorSession {
    /// Load a guild's tree. Never fails: an empty or unreadable store yields
    /// the seeded example tree.
    pub async fn load<S>(store: &S, guild_id: &str, config: &EditorConfig) -> Self
    where
        S: MacroStore + ?Sized,
    {
        let (tree, source) = match load_tree(store, guild_id).await {
            Ok(groups) if !groups.is_empty() => {
                info!(guild_id, groups = groups.len(), "macro tree loaded");
                (MacroTree::from_loaded(guild_id, groups), LoadSource::Stored)
            }
            Ok(_) => {
                info!(guild_id, "no stored macros, showing example");
                (MacroTree::new(guild_id, seed_groups(guild_id)), LoadSource::SeededEmpty)
            }
            Err(e) => {
                warn!(guild_id, error = %e, "failed to load macros, showing example");
                (MacroTree::new(guild_id, seed_groups(guild_id)), LoadSource::SeededAfterError)
            }
        };

        Self {
            tree,
            channels: ChannelNameResolver::new(config.unknown_channel_label.clone()),
            source,
            saving: false,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Raise the saving flag and snapshot what to write
    pub fn begin_save(&mut self) -> Result<SavePlan, SaveError> {
        if self.saving {
            return Err(SaveError::AlreadySaving);
        }
        let plan = SavePlan::from_tree(&mut self.tree)?;
        self.saving = true;
        Ok(plan)
    }

    /// Clear the saving flag whatever the outcome
    pub fn finish_save(&mut self, result: &Result<SaveReport, SaveError>) {
        self.saving = false;
        apply_outcome(&mut self.tree, result);
    }

    pub async fn save<S>(&mut self, store: &S) -> Result<SaveReport, SaveError>
    where
        S: MacroStore + ?Sized,
    {
        let plan = self.begin_save()?;
        let result = Reconciler::new(store).execute(&plan).await;
        self.finish_save(&result);
        result
    }

    /// Resolve names for every channel referenced anywhere in the tree
    pub async fn resolve_channels<D>(&mut self, directory: &D) -> usize
    where
        D: ChannelDirectory + ?Sized,
    {
        let guild_id = self.tree.guild_id().to_string();
        self.channels
            .resolve_missing(directory, &guild_id, self.tree.contents())
            .await
    }
}
