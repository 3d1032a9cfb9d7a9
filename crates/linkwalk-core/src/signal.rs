//! Control signals emitted by the endpoint for resolved nodes.

use std::collections::BTreeMap;

use linkwalk_sparql::model::strip_var_sigil;
use serde::{Deserialize, Deserializer, Serialize};

/// A resolved-node notification.
///
/// `forward == true` means `node` fills the *subject* slot of the matched
/// pattern, otherwise the *object* slot. `context` holds every variable
/// binding accumulated along this traversal branch; its keys are variable
/// names without the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignal {
    pub node: String,
    /// Canonical path signature (or registered pattern id) of the pattern
    /// the node satisfies.
    #[serde(alias = "path_pattern_id", alias = "pathSignature")]
    pub path_signature: String,
    #[serde(default, deserialize_with = "deserialize_context")]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default, alias = "maxDepth")]
    pub max_depth: u32,
    #[serde(default = "default_forward")]
    pub forward: bool,
}

fn default_forward() -> bool {
    true
}

fn deserialize_context<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (strip_var_sigil(&k).to_string(), v))
        .collect())
}

impl ControlSignal {
    pub fn new(node: impl Into<String>, path_signature: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            path_signature: path_signature.into(),
            context: BTreeMap::new(),
            depth: 0,
            max_depth: 0,
            forward: true,
        }
    }

    pub fn with_binding(mut self, variable: &str, value: impl Into<String>) -> Self {
        self.context
            .insert(strip_var_sigil(variable).to_string(), value.into());
        self
    }

    pub fn at_depth(mut self, depth: u32, max_depth: u32) -> Self {
        self.depth = depth;
        self.max_depth = max_depth;
        self
    }

    pub fn backward(mut self) -> Self {
        self.forward = false;
        self
    }

    /// Deterministic serialization of the binding context (sorted keys).
    pub fn context_key(&self) -> String {
        serde_json::to_string(&self.context).unwrap_or_default()
    }
}
