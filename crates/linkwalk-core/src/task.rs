//! Expansion tasks and their provenance tree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::signal::ControlSignal;

pub type TaskId = Uuid;

/// One pending (or executed) query submission.
///
/// Tasks are immutable once created. The root task of an execution has no
/// parent and no signal; every other task records the signal that produced
/// it and links back to the task whose query was rewritten.
#[derive(Debug)]
pub struct ExpandTask {
    pub id: TaskId,
    pub parent: Option<Arc<ExpandTask>>,
    pub query: String,
    pub signal: Option<ControlSignal>,
    pub created_at: DateTime<Utc>,
}

impl ExpandTask {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &ExpandTask> {
        std::iter::successors(self.parent.as_deref(), |t| t.parent.as_deref())
    }

    /// Number of rewrites between this task and the root.
    pub fn depth_in_tree(&self) -> usize {
        self.ancestors().count()
    }
}

/// Factory for tasks of one execution.
#[derive(Debug, Default)]
pub struct TaskTree {
    created: usize,
}

impl TaskTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        parent: Option<Arc<ExpandTask>>,
        query: String,
        signal: Option<ControlSignal>,
    ) -> Arc<ExpandTask> {
        self.created += 1;
        Arc::new(ExpandTask {
            id: Uuid::new_v4(),
            parent,
            query,
            signal,
            created_at: Utc::now(),
        })
    }

    pub fn root(&mut self, query: String) -> Arc<ExpandTask> {
        self.create(None, query, None)
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_chain() {
        let mut tree = TaskTree::new();
        let root = tree.root("SELECT * WHERE { ?s <p> ?o }".into());
        let child = tree.create(
            Some(root.clone()),
            "SELECT * WHERE { <a> <p> ?o }".into(),
            Some(ControlSignal::new("a", "p")),
        );
        let grandchild = tree.create(Some(child.clone()), "q2".into(), None);

        assert!(root.is_root());
        assert!(!child.is_root());
        assert_eq!(grandchild.depth_in_tree(), 2);
        let ids: Vec<_> = grandchild.ancestors().map(|t| t.id).collect();
        assert_eq!(ids, vec![child.id, root.id]);
        assert_eq!(tree.created(), 3);
        assert_ne!(root.id, child.id);
    }
}
