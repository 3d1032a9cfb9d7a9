//! Execution configuration.
//!
//! Values come from (lowest to highest precedence) defaults, a JSON file,
//! `LINKWALK_*` environment variables, and CLI flags applied by the caller.

use std::path::Path;

use linkwalk_sparql::{is_supported_query, parse_query};
use serde::{Deserialize, Serialize};

use crate::frontier::FrontierPolicy;
use crate::results::DEFAULT_PAGE_SIZE;

/// Whether the frontier is drained automatically after each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    #[default]
    Auto,
    /// Each frontier item waits for an explicit `step()`.
    Step,
}

impl std::str::FromStr for TraversalMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TraversalMode::Auto),
            "step" | "manual" => Ok(TraversalMode::Step),
            other => Err(ConfigError::Invalid(format!(
                "unknown traversal mode `{other}` (expected `auto` or `step`)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraversalConfig {
    /// Base URL of the query endpoint.
    pub endpoint: String,
    /// Default graph the queries run against.
    pub graph: String,
    pub query: String,
    pub max_depth: u32,
    /// Server-side time quantum, in milliseconds.
    pub quantum: u64,
    pub mode: TraversalMode,
    pub policy: FrontierPolicy,
    pub page_size: usize,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            graph: String::new(),
            query: String::new(),
            max_depth: 3,
            quantum: 75,
            mode: TraversalMode::Auto,
            policy: FrontierPolicy::BreadthFirst,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TraversalConfig {
    /// Defaults overridden by `LINKWALK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a JSON document (camelCase keys; missing keys take defaults).
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = std::env::var("LINKWALK_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(graph) = std::env::var("LINKWALK_GRAPH") {
            self.graph = graph;
        }
        if let Ok(depth) = std::env::var("LINKWALK_MAX_DEPTH") {
            self.max_depth = depth.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("LINKWALK_MAX_DEPTH is not an integer: {depth}"))
            })?;
        }
        if let Ok(quantum) = std::env::var("LINKWALK_QUANTUM") {
            self.quantum = quantum.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("LINKWALK_QUANTUM is not an integer: {quantum}"))
            })?;
        }
        if let Ok(mode) = std::env::var("LINKWALK_MODE") {
            self.mode = mode.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < 1 {
            return Err(ConfigError::Invalid("maxDepth must be at least 1".into()));
        }
        if self.graph.trim().is_empty() {
            return Err(ConfigError::Invalid("no graph selected".into()));
        }
        if self.query.trim().is_empty() {
            return Err(ConfigError::Invalid("no query given".into()));
        }
        url::Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::Invalid(format!("endpoint `{}` is not a URL: {e}", self.endpoint))
        })?;
        if !is_supported_query(&self.query) {
            let reason = parse_query(&self.query)
                .err()
                .map(|e| format!(" ({e})"))
                .unwrap_or_default();
            return Err(ConfigError::Invalid(format!(
                "the query is malformed or is not a BGP query{reason}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> TraversalConfig {
        TraversalConfig {
            graph: "http://localhost:8080/sparql/dbpedia".into(),
            query: "SELECT ?y WHERE { ?x <http://ex/p> ?y }".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid_once_graph_and_query_are_set() {
        valid().validate().expect("valid");
    }

    #[test]
    fn rejects_zero_depth_and_bad_query() {
        let mut cfg = valid();
        cfg.max_depth = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = valid();
        cfg.query = "SELECT ?s WHERE { ?s <p> ?o OPTIONAL { ?o <q> ?z } }".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = valid();
        cfg.graph.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn query_intake_matches_the_supported_fragment() {
        for (query, supported) in [
            ("SELECT ?s WHERE { ?s <p> +1 , 1.5e3 , \"caf\\u00E9\" }", true),
            ("SELECT ?s WHERE { BIND(<a> AS ?s) ?s <p> ?o }", true),
            ("SELECT ?s WHERE { ?s <p> ?o } ORDER BY ?s", false),
            ("SELECT ?s WHERE { BIND(<a> AS ?s) }", false),
        ] {
            let mut cfg = valid();
            cfg.query = query.into();
            assert_eq!(is_supported_query(query), supported, "{query}");
            match cfg.validate() {
                Ok(()) => assert!(supported, "accepted: {query}"),
                Err(ConfigError::Invalid(msg)) => {
                    assert!(!supported, "rejected: {query}");
                    assert!(msg.contains("not a BGP query"), "{msg}");
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn loads_json_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"graph": "g", "query": "SELECT * WHERE {{ ?s <p> ?o }}", "maxDepth": 5, "mode": "step", "policy": "depth-first"}}"#
        )
        .expect("write");

        let cfg = TraversalConfig::from_json_file(file.path()).expect("load");
        assert_eq!(cfg.max_depth, 5);
        assert_eq!(cfg.mode, TraversalMode::Step);
        assert_eq!(cfg.policy, FrontierPolicy::DepthFirst);
        assert_eq!(cfg.quantum, 75);
        assert_eq!(cfg.endpoint, "http://localhost:8080");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("AUTO".parse::<TraversalMode>().expect("mode"), TraversalMode::Auto);
        assert_eq!("step".parse::<TraversalMode>().expect("mode"), TraversalMode::Step);
        assert!("sometimes".parse::<TraversalMode>().is_err());
    }
}
