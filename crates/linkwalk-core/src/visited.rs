//! Depth-memoized visited index.
//!
//! Keyed by `(original pattern id, serialized context)` reduced to a fixed
//! width digest; each bucket maps node → best known depth. Recorded depths
//! only ever decrease.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use linkwalk_sparql::digest::fnv1a64_digest_parts;

use crate::error::TraversalError;
use crate::registry::PatternRegistry;
use crate::signal::ControlSignal;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitKey(String);

impl VisitKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub struct VisitedIndex {
    registry: Arc<PatternRegistry>,
    buckets: HashMap<VisitKey, HashMap<String, u32>>,
}

impl VisitedIndex {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self {
            registry,
            buckets: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn key_of(&self, signal: &ControlSignal) -> Result<VisitKey, TraversalError> {
        let id = self
            .registry
            .resolve(&signal.path_signature)
            .ok_or_else(|| TraversalError::UnknownPattern {
                signature: signal.path_signature.clone(),
            })?;
        let context = signal.context_key();
        Ok(VisitKey(fnv1a64_digest_parts([
            id.as_str(),
            context.as_str(),
        ])))
    }

    pub fn recorded_depth(&self, signal: &ControlSignal) -> Result<Option<u32>, TraversalError> {
        let key = self.key_of(signal)?;
        Ok(self
            .buckets
            .get(&key)
            .and_then(|nodes| nodes.get(&signal.node))
            .copied())
    }

    pub fn has_been_visited(&self, signal: &ControlSignal) -> Result<bool, TraversalError> {
        Ok(self.recorded_depth(signal)?.is_some())
    }

    /// Record `node → depth`, overwriting any previous value.
    pub fn mark_as_visited(&mut self, signal: &ControlSignal) -> Result<(), TraversalError> {
        let key = self.key_of(signal)?;
        self.buckets
            .entry(key)
            .or_default()
            .insert(signal.node.clone(), signal.depth);
        Ok(())
    }

    /// Relax the recorded depth to `min(recorded, signal.depth)`.
    pub fn update_visited_depth(&mut self, signal: &ControlSignal) -> Result<(), TraversalError> {
        let key = self.key_of(signal)?;
        let recorded = self
            .buckets
            .get_mut(&key)
            .and_then(|nodes| nodes.get_mut(&signal.node))
            .ok_or_else(|| TraversalError::NotVisited {
                node: signal.node.clone(),
            })?;
        *recorded = (*recorded).min(signal.depth);
        Ok(())
    }

    /// Whether a dequeued signal must trigger a forced re-expansion.
    ///
    /// Below `max_depth` this is always false. At or beyond it, only the
    /// occurrence whose depth equals the recorded best depth for the node
    /// qualifies; a node with no recorded depth never does.
    pub fn must_expand(&self, signal: &ControlSignal) -> Result<bool, TraversalError> {
        if signal.depth < signal.max_depth {
            return Ok(false);
        }
        Ok(self.recorded_depth(signal)? == Some(signal.depth))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(HashMap::is_empty)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
