//! Stable identifiers for the path patterns of the original query.
//!
//! Continuation queries never alter predicates, so a pattern's canonical
//! signature is the same in every descendant of the original query. The
//! registry maps each distinct signature (in order of first appearance) to
//! an id `tp0`, `tp1`, ... and resolves either form back to that id.

use std::collections::HashMap;
use std::fmt;

use linkwalk_sparql::BgpQuery;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternId(String);

impl PatternId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    by_signature: HashMap<String, PatternId>,
    by_id: HashMap<PatternId, String>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for `original`, built in one pass.
    pub fn from_original(original: &BgpQuery) -> Self {
        let mut registry = Self::new();
        registry.register_original(original);
        registry
    }

    /// Assign ids to every path pattern of the original query. Variable
    /// predicates have no signature and are skipped. Re-registering a
    /// signature keeps its first id.
    pub fn register_original(&mut self, original: &BgpQuery) {
        for triple in &original.triples {
            let Some(signature) = triple.predicate.signature() else {
                continue;
            };
            if self.by_signature.contains_key(&signature) {
                continue;
            }
            let id = PatternId(format!("tp{}", self.by_id.len()));
            self.by_id.insert(id.clone(), signature.clone());
            self.by_signature.insert(signature, id);
        }
    }

    /// Resolve a signature or an already-assigned id to the original id.
    pub fn resolve(&self, signature_or_id: &str) -> Option<&PatternId> {
        if let Some(id) = self.by_signature.get(signature_or_id) {
            return Some(id);
        }
        self.by_id
            .get_key_value(&PatternId(signature_or_id.to_string()))
            .map(|(id, _)| id)
    }

    pub fn signature_of(&self, id: &PatternId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_signature.clear();
        self.by_id.clear();
    }
}
