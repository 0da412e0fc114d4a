//! Persistence Reconciler
//!
//! Renumbers the tree, then pushes it to the remote store in three sequential
//! upsert passes (groups, buttons, contents) followed by a delete pass for
//! tombstoned entities. The first failure stops the save; anything written
//! before it stays written.

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::{ButtonRecord, ContentRecord, DomainError, Entity, EntityKind, GroupRecord};
use crate::repository::{MacroStore, Repository, Upserted};
use crate::tree::{MacroTree, Tombstone};

// ============================================================================
// Plan
// ============================================================================

/// Everything one save will write, in write order
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan {
    pub guild_id: String,
    pub groups: Vec<GroupRecord>,
    pub buttons: Vec<ButtonRecord>,
    pub contents: Vec<ContentRecord>,
    /// Contents first, then buttons, then groups
    pub deletions: Vec<Tombstone>,
}

impl SavePlan {
    /// Normalize the tree and flatten it into records
    pub fn from_tree(tree: &mut MacroTree) -> Result<Self, SaveError> {
        let guild_id = tree.guild_id().trim().to_string();
        if guild_id.is_empty() {
            return Err(SaveError::MissingGuild);
        }

        tree.normalize();

        let mut plan = Self {
            guild_id: guild_id.clone(),
            groups: Vec::new(),
            buttons: Vec::new(),
            contents: Vec::new(),
            deletions: tree.tombstones().to_vec(),
        };
        for group in tree.groups() {
            plan.groups.push(group.to_record(&guild_id));
            for button in &group.buttons {
                plan.buttons.push(button.to_record(&guild_id));
                for content in &button.contents {
                    plan.contents.push(content.to_record(&guild_id));
                }
            }
        }
        plan.deletions.sort_by_key(|t| match t.kind {
            EntityKind::Content => 0,
            EntityKind::Button => 1,
            EntityKind::Group => 2,
        });

        Ok(plan)
    }

    pub fn write_count(&self) -> usize {
        self.groups.len() + self.buttons.len() + self.contents.len()
    }
}

// ============================================================================
// Outcome
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    /// Ids whose remote delete succeeded (or were already gone)
    pub deleted: Vec<Uuid>,
    /// Every upserted entity, in write order
    pub written: Vec<(EntityKind, Uuid)>,
}

impl SaveReport {
    fn record(&mut self, kind: EntityKind, id: Uuid, outcome: Upserted) {
        match outcome {
            Upserted::Created => self.created += 1,
            Upserted::Updated => self.updated += 1,
            Upserted::Replaced => self.replaced += 1,
        }
        self.written.push((kind, id));
    }
}

/// Why a save did not complete. Displays as the generic message shown to
/// the user; the cause is available through `source()`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("Save failed: no guild selected")]
    MissingGuild,
    #[error("A save is already in progress")]
    AlreadySaving,
    #[error("Save failed")]
    Write {
        kind: EntityKind,
        id: Uuid,
        #[source]
        source: DomainError,
        /// Writes that landed before the failure
        committed: SaveReport,
    },
}

impl SaveError {
    pub fn committed(&self) -> Option<&SaveReport> {
        match self {
            SaveError::Write { committed, .. } => Some(committed),
            _ => None,
        }
    }
}

/// Fold a finished save back into the tree it was planned from
pub fn apply_outcome(tree: &mut MacroTree, result: &Result<SaveReport, SaveError>) {
    match result {
        Ok(report) => {
            tree.absorb_writes(&report.written);
            tree.clear_tombstones(&report.deleted);
        }
        Err(e) => {
            if let Some(committed) = e.committed() {
                tree.absorb_writes(&committed.written);
            }
        }
    }
}

// ============================================================================
// Reconciler
// ============================================================================

pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: MacroStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run a plan against the store, strictly sequentially
    pub async fn execute(&self, plan: &SavePlan) -> Result<SaveReport, SaveError> {
        let mut report = SaveReport::default();

        for record in &plan.groups {
            upsert(self.store, record, &mut report).await?;
        }
        for record in &plan.buttons {
            upsert(self.store, record, &mut report).await?;
        }
        for record in &plan.contents {
            upsert(self.store, record, &mut report).await?;
        }

        for tombstone in &plan.deletions {
            let outcome = match tombstone.kind {
                EntityKind::Group => Repository::<GroupRecord>::delete(self.store, tombstone.id).await,
                EntityKind::Button => Repository::<ButtonRecord>::delete(self.store, tombstone.id).await,
                EntityKind::Content => Repository::<ContentRecord>::delete(self.store, tombstone.id).await,
            };
            match outcome {
                Ok(()) => debug!(entity = %tombstone.kind, id = %tombstone.id, "deleted"),
                Err(e) if e.is_not_found() => {
                    debug!(entity = %tombstone.kind, id = %tombstone.id, "already deleted")
                }
                Err(source) => {
                    error!(entity = %tombstone.kind, id = %tombstone.id, error = %source, "delete failed");
                    return Err(SaveError::Write {
                        kind: tombstone.kind,
                        id: tombstone.id,
                        source,
                        committed: report,
                    });
                }
            }
            report.deleted.push(tombstone.id);
        }

        info!(
            guild_id = %plan.guild_id,
            created = report.created,
            updated = report.updated,
            replaced = report.replaced,
            deleted = report.deleted.len(),
            "save complete"
        );
        Ok(report)
    }

    /// Plan, execute and fold the outcome back into `tree`
    pub async fn save(&self, tree: &mut MacroTree) -> Result<SaveReport, SaveError> {
        let plan = SavePlan::from_tree(tree)?;
        let result = self.execute(&plan).await;
        apply_outcome(tree, &result);
        result
    }
}

async fn upsert<T, R>(repo: &R, record: &T, report: &mut SaveReport) -> Result<(), SaveError>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    match Repository::<T>::upsert(repo, record).await {
        Ok(outcome) => {
            debug!(entity = %T::KIND, id = %record.id(), ?outcome, "upserted");
            report.record(T::KIND, record.id(), outcome);
            Ok(())
        }
        Err(source) => {
            error!(entity = %T::KIND, id = %record.id(), error = %source, "upsert failed");
            Err(SaveError::Write {
                kind: T::KIND,
                id: record.id(),
                source,
                committed: report.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, StoreCall};
    use crate::tree::tests::{indices_contiguous, tree_with};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_save_renumbers_and_writes_everything() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[2, 0, 3]);
        // scramble positions without touching indices
        tree.groups_mut().swap(0, 2);
        tree.groups_mut()[0].buttons.swap(0, 2);

        let report = Reconciler::new(&store).save(&mut tree).await.unwrap();

        assert!(indices_contiguous(&tree));
        assert_eq!(report.created, 3 + 5 + 5);
        assert_eq!(store.count::<GroupRecord>().await, 3);
        for (i, group) in tree.groups().iter().enumerate() {
            let stored = store.get::<GroupRecord>(group.id).await.unwrap();
            assert_eq!(stored.index, i);
            assert_eq!(stored.guild_id, "guild-1");
        }
    }

    #[tokio::test]
    async fn test_existence_decides_create_or_update() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[1]);
        let existing = tree.groups()[0].id;
        store.insert(tree.groups()[0].to_record("guild-1")).await;
        let fresh = tree.add_group();

        Reconciler::new(&store).save(&mut tree).await.unwrap();

        let mut per_id: HashMap<Uuid, Vec<StoreCall>> = HashMap::new();
        for call in store.calls().await {
            match call {
                StoreCall::Create(_, id) | StoreCall::Update(_, id) => {
                    per_id.entry(id).or_default().push(call)
                }
                _ => {}
            }
        }
        assert_eq!(per_id[&existing], vec![StoreCall::Update(EntityKind::Group, existing)]);
        assert_eq!(per_id[&fresh], vec![StoreCall::Create(EntityKind::Group, fresh)]);
        assert!(per_id.values().all(|calls| calls.len() == 1));
    }

    #[tokio::test]
    async fn test_failed_existence_checks_still_save() {
        let store = InMemoryStore::new();
        store.fail_lookups(true).await;
        let mut tree = tree_with(&[2]);

        let report = Reconciler::new(&store).save(&mut tree).await.unwrap();

        assert_eq!(report.created, 1 + 2 + 2);
        assert_eq!(store.count::<GroupRecord>().await, 1);
        assert_eq!(store.count::<ButtonRecord>().await, 2);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_prior_writes() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[5]);
        store.fail_nth_write(EntityKind::Button, 3).await;

        let err = Reconciler::new(&store).save(&mut tree).await.unwrap_err();

        let buttons = &tree.groups()[0].buttons;
        assert!(store.get::<ButtonRecord>(buttons[0].id).await.is_some());
        assert!(store.get::<ButtonRecord>(buttons[1].id).await.is_some());
        for button in &buttons[2..] {
            assert!(store.get::<ButtonRecord>(button.id).await.is_none());
        }
        assert_eq!(store.count::<ContentRecord>().await, 0);
        match &err {
            SaveError::Write { kind, id, committed, .. } => {
                assert_eq!(*kind, EntityKind::Button);
                assert_eq!(*id, buttons[2].id);
                assert_eq!(committed.written.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.to_string(), "Save failed");

        // committed entities are now known remotely
        assert!(tree.is_persisted(buttons[1].id));
        assert!(!tree.is_persisted(buttons[2].id));
    }

    #[tokio::test]
    async fn test_removed_entities_are_deleted_on_next_save() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[2, 1]);
        Reconciler::new(&store).save(&mut tree).await.unwrap();

        let doomed_group = tree.groups()[1].id;
        let doomed_button = tree.groups()[0].buttons[0].id;
        tree.remove_group(doomed_group);
        tree.remove_button(doomed_button);

        let report = Reconciler::new(&store).save(&mut tree).await.unwrap();

        // group + its button + content, then the lone button + its content
        assert_eq!(report.deleted.len(), 5);
        assert!(store.get::<GroupRecord>(doomed_group).await.is_none());
        assert!(store.get::<ButtonRecord>(doomed_button).await.is_none());
        assert_eq!(store.count::<ButtonRecord>().await, 1);
        assert_eq!(store.count::<ContentRecord>().await, 1);
        assert!(tree.tombstones().is_empty());
    }

    #[tokio::test]
    async fn test_unsaved_removal_needs_no_delete() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[1]);
        let gid = tree.groups()[0].id;
        tree.remove_group(gid);

        let report = Reconciler::new(&store).save(&mut tree).await.unwrap();
        assert!(report.deleted.is_empty());
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_missing_record_counts_as_done() {
        let store = InMemoryStore::new();
        let mut tree = tree_with(&[1]);
        Reconciler::new(&store).save(&mut tree).await.unwrap();
        let gid = tree.groups()[0].id;
        Repository::<GroupRecord>::delete(&store, gid).await.unwrap();

        tree.remove_group(gid);
        let report = Reconciler::new(&store).save(&mut tree).await.unwrap();
        assert!(report.deleted.contains(&gid));
        assert!(tree.tombstones().is_empty());
    }

    #[test]
    fn test_plan_requires_guild() {
        let mut tree = MacroTree::new("  ", Vec::new());
        assert!(matches!(SavePlan::from_tree(&mut tree), Err(SaveError::MissingGuild)));
    }

    #[test]
    fn test_plan_deletes_children_first() {
        let mut tree = MacroTree::from_loaded("g", tree_with(&[1]).groups().to_vec());
        let gid = tree.groups()[0].id;
        tree.remove_group(gid);

        let plan = SavePlan::from_tree(&mut tree).unwrap();
        let kinds: Vec<EntityKind> = plan.deletions.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Content, EntityKind::Button, EntityKind::Group]);
        assert_eq!(plan.write_count(), 0);
    }
}
