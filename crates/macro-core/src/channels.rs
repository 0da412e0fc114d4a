//! Channel Name Cache
//!
//! Resolves content channel ids to display names through the external
//! directory, issuing at most one lookup per uncached id.

use std::collections::{HashMap, HashSet};

use crate::domain::{Content, DomainResult};
use crate::repository::{Channel, ChannelDirectory};

/// Id of the "no channel" option prepended to channel lists
pub const NO_CHANNEL_ID: &str = "";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelNameResolver {
    names: HashMap<String, String>,
    in_flight: HashSet<String>,
    unknown_label: String,
}

impl ChannelNameResolver {
    pub fn new(unknown_label: impl Into<String>) -> Self {
        Self { unknown_label: unknown_label.into(), ..Self::default() }
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Resolved name, or the unknown label for empty and unresolved ids
    pub fn display_name(&self, id: &str) -> &str {
        match self.names.get(id) {
            Some(name) if !id.is_empty() => name,
            _ => &self.unknown_label,
        }
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Distinct non-empty ids that are neither cached nor already requested,
    /// in first-seen order
    pub fn missing_ids<'a>(&self, contents: impl IntoIterator<Item = &'a Content>) -> Vec<String> {
        let mut seen = HashSet::new();
        contents
            .into_iter()
            .map(|c| c.channel_id.as_str())
            .filter(|id| !id.is_empty())
            .filter(|id| !self.names.contains_key(*id) && !self.in_flight.contains(*id))
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect()
    }

    /// Like [`missing_ids`](Self::missing_ids), but marks the returned ids as
    /// requested so a concurrent pass does not fetch them again
    pub fn claim_missing<'a>(&mut self, contents: impl IntoIterator<Item = &'a Content>) -> Vec<String> {
        let ids = self.missing_ids(contents);
        self.in_flight.extend(ids.iter().cloned());
        ids
    }

    /// Record the outcome of one lookup. Failed or unknown ids stay
    /// unresolved and become eligible again on the next pass.
    pub fn complete(&mut self, id: &str, outcome: DomainResult<Option<String>>) {
        self.in_flight.remove(id);
        match outcome {
            Ok(Some(name)) => {
                self.names.insert(id.to_string(), name);
            }
            Ok(None) => {
                tracing::debug!(channel_id = %id, "channel not known to directory");
            }
            Err(e) => {
                tracing::warn!(channel_id = %id, error = %e, "channel name lookup failed");
            }
        }
    }

    /// Fetch every missing name sequentially. Returns how many resolved.
    pub async fn resolve_missing<'a, D>(
        &mut self,
        directory: &D,
        guild_id: &str,
        contents: impl IntoIterator<Item = &'a Content>,
    ) -> usize
    where
        D: ChannelDirectory + ?Sized,
    {
        let ids = self.claim_missing(contents);
        let mut resolved = 0;
        for id in ids {
            let outcome = directory.channel_name(guild_id, &id).await;
            if matches!(outcome, Ok(Some(_))) {
                resolved += 1;
            }
            self.complete(&id, outcome);
        }
        resolved
    }
}

/// Channel choices for a content's selector, "no channel" first.
///
/// A failed listing degrades to just the sentinel.
pub async fn channel_options<D>(directory: &D, guild_id: &str, no_channel_label: &str) -> Vec<Channel>
where
    D: ChannelDirectory + ?Sized,
{
    let mut options = vec![Channel { id: NO_CHANNEL_ID.to_string(), name: no_channel_label.to_string() }];
    match directory.list_channels(guild_id).await {
        Ok(channels) => options.extend(channels.into_iter().filter(|c| c.id != NO_CHANNEL_ID)),
        Err(e) => tracing::warn!(guild_id, error = %e, "channel listing failed"),
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, StoreCall};
    use uuid::Uuid;

    fn content(channel: &str) -> Content {
        let mut c = Content::new(0, Uuid::new_v4());
        c.channel_id = channel.into();
        c
    }

    fn directory() -> InMemoryStore {
        InMemoryStore::with_channels(vec![
            Channel { id: "c1".into(), name: "general".into() },
            Channel { id: "c2".into(), name: "notice".into() },
        ])
    }

    #[test]
    fn test_missing_ids_dedupes_and_skips_empty() {
        let mut resolver = ChannelNameResolver::new("unknown");
        resolver.insert("c3", "cached");
        let contents = [content("c1"), content(""), content("c1"), content("c3"), content("c2")];

        assert_eq!(resolver.missing_ids(&contents), vec!["c1".to_string(), "c2".to_string()]);
    }

    #[test]
    fn test_claimed_ids_are_not_reissued() {
        let mut resolver = ChannelNameResolver::new("unknown");
        let contents = [content("c1")];

        assert_eq!(resolver.claim_missing(&contents).len(), 1);
        assert!(resolver.claim_missing(&contents).is_empty());
        assert!(resolver.is_in_flight("c1"));
    }

    #[test]
    fn test_display_name_fallback() {
        let mut resolver = ChannelNameResolver::new("unknown");
        resolver.insert("c1", "general");

        assert_eq!(resolver.display_name("c1"), "general");
        assert_eq!(resolver.display_name("c9"), "unknown");
        assert_eq!(resolver.display_name(""), "unknown");
    }

    #[tokio::test]
    async fn test_resolve_issues_one_lookup_per_id() {
        let store = directory();
        let mut resolver = ChannelNameResolver::new("unknown");
        let contents = [content("c1"), content("c1"), content("c2")];

        let resolved = resolver.resolve_missing(&store, "guild", &contents).await;
        assert_eq!(resolved, 2);
        assert_eq!(resolver.name("c2"), Some("notice"));

        resolver.resolve_missing(&store, "guild", &contents).await;
        let lookups = store
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, StoreCall::ChannelName(_)))
            .count();
        assert_eq!(lookups, 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_block_others() {
        let store = directory();
        store.fail_channel("c1").await;
        let mut resolver = ChannelNameResolver::new("unknown");
        let contents = [content("c1"), content("c2")];

        assert_eq!(resolver.resolve_missing(&store, "guild", &contents).await, 1);
        assert_eq!(resolver.display_name("c1"), "unknown");
        assert_eq!(resolver.display_name("c2"), "notice");
        assert!(!resolver.is_in_flight("c1"));
        assert_eq!(resolver.missing_ids(&contents), vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn test_channel_options_sentinel_first() {
        let store = directory();
        let options = channel_options(&store, "guild", "(no channel)").await;
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].id, NO_CHANNEL_ID);

        store.set_unavailable(true).await;
        let options = channel_options(&store, "guild", "(no channel)").await;
        assert_eq!(options, vec![Channel { id: String::new(), name: "(no channel)".into() }]);
    }
}
