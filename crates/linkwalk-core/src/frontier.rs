//! Ordered worklist of pending expansion tasks.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::task::ExpandTask;

/// Where new tasks are inserted. Tasks are always taken from the head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierPolicy {
    /// Append at the tail (FIFO).
    #[default]
    BreadthFirst,
    /// Prepend at the head (LIFO).
    DepthFirst,
}

#[derive(Debug, Default)]
pub struct FrontierQueue {
    tasks: VecDeque<Arc<ExpandTask>>,
    policy: FrontierPolicy,
}

impl FrontierQueue {
    pub fn new(policy: FrontierPolicy) -> Self {
        Self {
            tasks: VecDeque::new(),
            policy,
        }
    }

    pub fn policy(&self) -> FrontierPolicy {
        self.policy
    }

    pub fn push(&mut self, task: Arc<ExpandTask>) {
        match self.policy {
            FrontierPolicy::BreadthFirst => self.tasks.push_back(task),
            FrontierPolicy::DepthFirst => self.tasks.push_front(task),
        }
    }

    pub fn pop(&mut self) -> Option<Arc<ExpandTask>> {
        self.tasks.pop_front()
    }

    pub fn peek(&self) -> Option<&Arc<ExpandTask>> {
        self.tasks.front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ExpandTask>> {
        self.tasks.iter()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
