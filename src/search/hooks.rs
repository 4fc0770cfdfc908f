//! Content lifecycle events and their queue actions
//!
//! Every mutation of an item, or of its parent or child, queues the affected
//! item. Only deletion of the item itself queues a removal; when a relative is
//! deleted the surviving item is re-indexed instead.

use std::fmt;
use std::str::FromStr;

use super::errors::{SearchError, SearchResult};
use super::manager::IdSource;
use super::queue::IndexingQueue;
use super::types::IndexAction;

/// Which item a mutation happened to, relative to the item being notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Own,
    Parent,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Insert,
    Update,
    Delete,
    DeletePermanent,
}

/// A named lifecycle event such as `update` or `parent:delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifecycleEvent {
    pub relation: Relation,
    pub mutation: Mutation,
}

impl LifecycleEvent {
    #[must_use]
    pub const fn new(relation: Relation, mutation: Mutation) -> Self {
        Self { relation, mutation }
    }

    /// Queue action this event triggers
    #[must_use]
    pub fn action(self) -> IndexAction {
        match (self.relation, self.mutation) {
            (Relation::Own, Mutation::Delete | Mutation::DeletePermanent) => IndexAction::Delete,
            _ => IndexAction::Index,
        }
    }
}

impl FromStr for LifecycleEvent {
    type Err = SearchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || SearchError::UnknownEvent(name.to_string());

        let (relation, mutation) = match name.split_once(':') {
            Some(("parent", rest)) => (Relation::Parent, rest),
            Some(("child", rest)) => (Relation::Child, rest),
            Some(_) => return Err(unknown()),
            None => (Relation::Own, name),
        };
        let mutation = match (relation, mutation) {
            (_, "insert") => Mutation::Insert,
            (_, "update") => Mutation::Update,
            (_, "delete") => Mutation::Delete,
            (Relation::Own, "delete_permanent") => Mutation::DeletePermanent,
            _ => return Err(unknown()),
        };
        Ok(Self::new(relation, mutation))
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mutation = match self.mutation {
            Mutation::Insert => "insert",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
            Mutation::DeletePermanent => "delete_permanent",
        };
        match self.relation {
            Relation::Own => f.write_str(mutation),
            Relation::Parent => write!(f, "parent:{mutation}"),
            Relation::Child => write!(f, "child:{mutation}"),
        }
    }
}

/// Receives lifecycle notifications and queues the matching index action
#[derive(Clone)]
pub struct LifecycleHooks {
    queue: IndexingQueue,
}

impl LifecycleHooks {
    #[must_use]
    pub fn new(queue: IndexingQueue) -> Self {
        Self { queue }
    }

    pub async fn dispatch<'a>(
        &self,
        event: LifecycleEvent,
        item: impl Into<IdSource<'a>>,
    ) -> SearchResult<()> {
        tracing::debug!(event = %event, "Content lifecycle event received");
        match event.action() {
            IndexAction::Index => self.queue.enqueue_index(item).await,
            IndexAction::Delete => self.queue.enqueue_delete(item).await,
        }
    }

    /// Parse `name` and dispatch it; unknown names are rejected
    pub async fn dispatch_named<'a>(
        &self,
        name: &str,
        item: impl Into<IdSource<'a>>,
    ) -> SearchResult<()> {
        let event: LifecycleEvent = name.parse()?;
        self.dispatch(event, item).await
    }
}
