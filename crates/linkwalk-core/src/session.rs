//! Per-execution state and the stop signal.

use std::sync::Arc;

use linkwalk_sparql::BgpQuery;
use tokio::sync::watch;

use crate::frontier::{FrontierPolicy, FrontierQueue};
use crate::registry::PatternRegistry;
use crate::results::ResultCollector;
use crate::task::TaskTree;
use crate::visited::VisitedIndex;

/// All mutable state of one top-level query execution.
///
/// Created when a query starts, dropped when it stops, fails or restarts;
/// nothing survives from one execution to the next.
#[derive(Debug)]
pub struct ExecutionSession {
    pub generation: u64,
    pub visited: VisitedIndex,
    pub frontier: FrontierQueue,
    pub tasks: TaskTree,
    pub results: ResultCollector,
    stopped: bool,
}

impl ExecutionSession {
    pub fn new(original: &BgpQuery, policy: FrontierPolicy, generation: u64) -> Self {
        let registry = Arc::new(PatternRegistry::from_original(original));
        Self {
            generation,
            visited: VisitedIndex::new(registry),
            frontier: FrontierQueue::new(policy),
            tasks: TaskTree::new(),
            results: ResultCollector::new(),
            stopped: false,
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        self.visited.registry()
    }

    /// Drop pending work and visited state; collected results are kept.
    pub fn clear(&mut self) {
        self.frontier.clear();
        self.visited.clear();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Clear the session the first time it is stopped. Returns false if it
    /// had already been stopped.
    pub(crate) fn mark_stopped(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.clear();
        self.stopped = true;
        true
    }
}

/// Cloneable handle that stops the current execution from anywhere.
///
/// Stopping bumps the execution generation; the driver notices, abandons
/// the in-flight request and discards whatever it would have produced.
#[derive(Debug, Clone)]
pub struct StopHandle {
    generation: Arc<watch::Sender<u64>>,
}

impl StopHandle {
    pub(crate) fn new(generation: Arc<watch::Sender<u64>>) -> Self {
        Self { generation }
    }

    pub fn stop(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }
}

/// Resolves once the generation moves past `generation`.
pub(crate) async fn superseded(rx: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *rx.borrow_and_update() != generation {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Solution;
    use crate::signal::ControlSignal;
    use linkwalk_sparql::parse_query;
    use std::time::Duration;

    #[test]
    fn fresh_session_registers_patterns() {
        let q = parse_query("SELECT * WHERE { ?s <p> ?o . ?o <q> ?z }").expect("parse");
        let mut session = ExecutionSession::new(&q, FrontierPolicy::BreadthFirst, 0);
        assert_eq!(session.registry().len(), 2);

        session
            .visited
            .mark_as_visited(&ControlSignal::new("a", "q"))
            .expect("mark");
        let root = session.tasks.root("SELECT * WHERE { ?s <p> ?o }".into());
        session.frontier.push(root);
        session.clear();
        assert!(session.visited.is_empty());
        assert!(session.frontier.is_empty());
        assert!(!session.is_stopped());
    }

    #[test]
    fn stopping_is_reported_once() {
        let q = parse_query("SELECT * WHERE { ?s <p> ?o }").expect("parse");
        let mut session = ExecutionSession::new(&q, FrontierPolicy::DepthFirst, 3);
        session.results.extend(vec![Solution::new()]);

        assert!(session.mark_stopped());
        assert!(session.is_stopped());
        assert!(!session.mark_stopped());
        assert_eq!(session.results.len(), 1);
    }

    #[tokio::test]
    async fn stop_wakes_waiter() {
        let (tx, mut rx) = watch::channel(0u64);
        let handle = StopHandle::new(Arc::new(tx));

        let waiter = tokio::spawn(async move {
            superseded(&mut rx, 0).await;
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.stop();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("woken")
            .expect("joined");
        assert_eq!(handle.generation(), 1);
    }
}
