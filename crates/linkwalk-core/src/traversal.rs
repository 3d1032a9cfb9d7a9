//! The traversal driver.
//!
//! `start` submits the original query; every later `step` takes one task
//! off the frontier, checks it against the visited index, and submits it.
//! Control signals coming back from a submission are deduplicated against
//! the visited index, rewritten into continuation queries, and queued.
//!
//! A task is only dequeued after the previous submission resolved or was
//! abandoned by a stop, so the frontier and visited index are never touched
//! by two submissions at once.

use std::sync::Arc;

use linkwalk_sparql::{parse_query, BgpQuery};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{TraversalConfig, TraversalMode};
use crate::error::TraversalError;
use crate::rewriter;
use crate::session::{superseded, ExecutionSession, StopHandle};
use crate::signal::ControlSignal;
use crate::task::{ExpandTask, TaskId};
use crate::transport::{Transport, TransportOutcome};

// ============================================================================
// Events
// ============================================================================

/// Progress notifications for whoever renders the execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TraversalEvent {
    Started { generation: u64 },
    Expanded {
        task: TaskId,
        solutions: usize,
        queued: usize,
        pending: usize,
    },
    Exhausted { solutions: usize },
    Stopped,
    Failed { message: String },
}

pub type TraversalEventHandler = Box<dyn Fn(&TraversalEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One task was submitted and its signals absorbed.
    Expanded {
        task: TaskId,
        solutions: usize,
        queued: usize,
    },
    /// Nothing left on the frontier that must be expanded.
    Exhausted,
    /// The execution was stopped; pending work was discarded.
    Stopped,
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Exhausted | StepOutcome::Stopped)
    }
}

// ============================================================================
// Driver
// ============================================================================

pub struct Traversal {
    config: TraversalConfig,
    transport: Arc<dyn Transport>,
    generation_tx: Arc<watch::Sender<u64>>,
    generation_rx: watch::Receiver<u64>,
    session: Option<ExecutionSession>,
    handlers: Vec<TraversalEventHandler>,
}

impl Traversal {
    pub fn new(config: TraversalConfig, transport: Arc<dyn Transport>) -> Self {
        let (tx, rx) = watch::channel(0u64);
        Self {
            config,
            transport,
            generation_tx: Arc::new(tx),
            generation_rx: rx,
            session: None,
            handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&ExecutionSession> {
        self.session.as_ref()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(self.generation_tx.clone())
    }

    pub fn on_event(&mut self, handler: TraversalEventHandler) {
        self.handlers.push(handler);
    }

    fn emit(&self, event: TraversalEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// True while there is frontier work left in a live execution.
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !self.is_stale(s.generation) && !s.frontier.is_empty())
    }

    fn is_stale(&self, generation: u64) -> bool {
        *self.generation_rx.borrow() != generation
    }

    /// Begin a fresh execution: new session, endpoint configuration, then
    /// submission of the original query.
    pub async fn start(&mut self) -> Result<StepOutcome, TraversalError> {
        let original = match parse_query(&self.config.query) {
            Ok(query) => query,
            Err(e) => {
                self.session = None;
                return Err(self.fail(e.into()));
            }
        };
        let generation = *self.generation_rx.borrow();

        let mut session = ExecutionSession::new(&original, self.config.policy, generation);
        let root = session.tasks.root(self.config.query.clone());
        info!(
            generation,
            patterns = session.registry().len(),
            max_depth = self.config.max_depth,
            "query execution started"
        );
        self.session = Some(session);
        self.emit(TraversalEvent::Started { generation });

        let mut rx = self.generation_rx.clone();
        let configured = tokio::select! {
            res = self.transport.configure(self.config.quantum, self.config.max_depth) => Some(res),
            _ = superseded(&mut rx, generation) => None,
        };
        match configured {
            None => return Ok(self.finish_stopped()),
            Some(Err(e)) => return Err(self.fail(e.into())),
            Some(Ok(())) => {}
        }

        self.execute(root).await
    }

    /// Expand the next frontier task that passes `must_expand`.
    pub async fn step(&mut self) -> Result<StepOutcome, TraversalError> {
        let generation = self
            .session
            .as_ref()
            .map(|s| s.generation)
            .ok_or(TraversalError::NotStarted)?;
        if self.is_stale(generation) {
            return Ok(self.finish_stopped());
        }

        let next = match self.next_expandable() {
            Ok(next) => next,
            Err(e) => return Err(self.fail(e)),
        };
        match next {
            Some(task) => self.execute(task).await,
            None => {
                let solutions = self.session.as_ref().map_or(0, |s| s.results.len());
                info!(solutions, "frontier exhausted");
                self.emit(TraversalEvent::Exhausted { solutions });
                Ok(StepOutcome::Exhausted)
            }
        }
    }

    /// `start`, then (in auto mode) `step` until the frontier is drained or
    /// the execution is stopped. In step mode only the original query runs.
    pub async fn run(&mut self) -> Result<StepOutcome, TraversalError> {
        let mut outcome = self.start().await?;
        if self.config.mode == TraversalMode::Step {
            return Ok(outcome);
        }
        while !outcome.is_terminal() {
            outcome = self.step().await?;
        }
        Ok(outcome)
    }

    /// Stop the current execution and discard its pending work.
    pub fn stop(&mut self) {
        self.generation_tx.send_modify(|g| *g += 1);
        self.finish_stopped();
    }

    fn next_expandable(&mut self) -> Result<Option<Arc<ExpandTask>>, TraversalError> {
        let session = self.session.as_mut().ok_or(TraversalError::NotStarted)?;
        while let Some(task) = session.frontier.pop() {
            let Some(signal) = &task.signal else {
                return Ok(Some(task));
            };
            if session.visited.must_expand(signal)? {
                return Ok(Some(task));
            }
            debug!(
                task = %task.id,
                node = %signal.node,
                depth = signal.depth,
                "dequeued task does not need expansion"
            );
        }
        Ok(None)
    }

    async fn execute(&mut self, task: Arc<ExpandTask>) -> Result<StepOutcome, TraversalError> {
        let generation = self
            .session
            .as_ref()
            .map(|s| s.generation)
            .ok_or(TraversalError::NotStarted)?;

        debug!(task = %task.id, depth = task.depth_in_tree(), "submitting query");
        let mut rx = self.generation_rx.clone();
        let result = tokio::select! {
            res = self.transport.execute(&task, &self.config.graph) => Some(res),
            _ = superseded(&mut rx, generation) => None,
        };

        let Some(result) = result else {
            return Ok(self.finish_stopped());
        };
        if self.is_stale(generation) {
            warn!(task = %task.id, "discarding result of a stopped execution");
            return Ok(self.finish_stopped());
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(e.into())),
        };
        match self.absorb(&task, outcome) {
            Ok(step) => Ok(step),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn absorb(
        &mut self,
        task: &Arc<ExpandTask>,
        outcome: TransportOutcome,
    ) -> Result<StepOutcome, TraversalError> {
        let session = self.session.as_mut().ok_or(TraversalError::NotStarted)?;
        let solutions = outcome.solutions.len();
        session.results.extend(outcome.solutions);

        let mut queued = 0;
        if !outcome.signals.is_empty() {
            let prior = parse_query(&task.query)?;
            for signal in outcome.signals {
                if admit(session, task, &prior, signal)? {
                    queued += 1;
                }
            }
        }
        let pending = session.frontier.len();

        self.emit(TraversalEvent::Expanded {
            task: task.id,
            solutions,
            queued,
            pending,
        });
        Ok(StepOutcome::Expanded {
            task: task.id,
            solutions,
            queued,
        })
    }

    /// Stopped is announced once per execution; later calls only report it.
    fn finish_stopped(&mut self) -> StepOutcome {
        let first = self.session.as_mut().map_or(true, |s| s.mark_stopped());
        if first {
            info!("query execution stopped");
            self.emit(TraversalEvent::Stopped);
        }
        StepOutcome::Stopped
    }

    fn fail(&mut self, err: TraversalError) -> TraversalError {
        if !err.is_fatal() {
            return err;
        }
        error!(error = %err, "query execution aborted");
        if let Some(session) = self.session.as_mut() {
            session.clear();
        }
        self.emit(TraversalEvent::Failed {
            message: err.to_string(),
        });
        err
    }
}

/// Record the signal in the visited index and queue its continuation,
/// unless the node was already reached at the same or a smaller depth.
fn admit(
    session: &mut ExecutionSession,
    parent: &Arc<ExpandTask>,
    prior: &BgpQuery,
    mut signal: ControlSignal,
) -> Result<bool, TraversalError> {
    // Signals may name the pattern by id; the rewriter matches signatures.
    if let Some(signature) = session
        .registry()
        .resolve(&signal.path_signature)
        .and_then(|id| session.registry().signature_of(id))
    {
        signal.path_signature = signature.to_string();
    }

    match session.visited.recorded_depth(&signal)? {
        None => session.visited.mark_as_visited(&signal)?,
        Some(recorded) if signal.depth < recorded => {
            session.visited.update_visited_depth(&signal)?
        }
        Some(recorded) => {
            debug!(node = %signal.node, depth = signal.depth, recorded, "already visited");
            return Ok(false);
        }
    }

    let next = rewriter::expand(prior, &signal)?;
    let child = session
        .tasks
        .create(Some(parent.clone()), next.to_sparql(), Some(signal));
    debug!(task = %child.id, parent = %parent.id, "continuation queued");
    session.frontier.push(child);
    Ok(true)
}
