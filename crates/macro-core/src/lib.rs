//! Macro Core
//!
//! Everything behind the message button editor that has to be right: the
//! ordered Group → Button → Content tree, the drag session and drop engine,
//! channel name resolution, and reconciling the tree with the remote store.

pub mod channels;
pub mod config;
pub mod domain;
pub mod drag;
pub mod reconcile;
pub mod repository;
pub mod session;
pub mod tree;

pub use channels::{channel_options, ChannelNameResolver, NO_CHANNEL_ID};
pub use config::{ConfigError, EditorConfig, UpsertStrategy};
pub use domain::*;
pub use drag::{DragSession, DraggableItem, DropAction, ItemKind, ItemPosition, PointerSample};
pub use reconcile::{apply_outcome, Reconciler, SaveError, SavePlan, SaveReport};
pub use repository::{
    load_tree, Channel, ChannelDirectory, InMemoryStore, MacroStore, Repository, RestStore, SessionProvider,
};
pub use session::{EditorSession, LoadSource};
pub use tree::{summary, MacroTree, Tombstone};
