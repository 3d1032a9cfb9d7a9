//! Linkwalk traversal core
//!
//! Incremental, link-traversal evaluation of BGP queries against a remote
//! endpoint. Each round trip yields control signals naming a resolved node;
//! the core rewrites the query that produced the signal into a narrower
//! *continuation* query and queues it for re-submission.
//!
//! ```text
//!  original query ──► PatternRegistry (ids for every path pattern)
//!        │
//!        ▼
//!   Transport.execute ──► solutions ──► ResultCollector
//!        │
//!        └─► control signals ──► VisitedIndex (dedupe / relax depth)
//!                                   │
//!                                   ▼
//!                            rewriter::expand ──► FrontierQueue
//!                                                    │
//!   Transport.execute ◄── must_expand? ◄── step() ◄──┘
//! ```
//!
//! All mutable state lives in an [`ExecutionSession`] that is created when a
//! query starts and discarded when it stops, fails or restarts. A stop bumps
//! an execution generation so results arriving for a superseded session are
//! dropped instead of enqueueing more work.

pub mod config;
pub mod error;
pub mod frontier;
pub mod registry;
pub mod results;
pub mod rewriter;
pub mod session;
pub mod signal;
pub mod task;
pub mod transport;
pub mod traversal;
pub mod visited;

pub use config::{ConfigError, TraversalConfig, TraversalMode};
pub use error::TraversalError;
pub use frontier::{FrontierPolicy, FrontierQueue};
pub use registry::{PatternId, PatternRegistry};
pub use results::{ResultCollector, ResultPager, Solution};
pub use rewriter::{expand, expand_query_text};
pub use session::{ExecutionSession, StopHandle};
pub use signal::ControlSignal;
pub use task::{ExpandTask, TaskId, TaskTree};
pub use transport::{HttpTransport, Transport, TransportError, TransportOutcome};
pub use traversal::{StepOutcome, Traversal, TraversalEvent, TraversalEventHandler};
pub use visited::{VisitKey, VisitedIndex};
