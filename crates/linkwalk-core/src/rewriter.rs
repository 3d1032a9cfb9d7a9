//! Continuation-query rewriting.
//!
//! Given the query that produced a control signal, build the next query:
//!
//! 1. prefixes and projection are copied unchanged;
//! 2. every context binding becomes a `BIND(<value> AS ?var)` and marks
//!    `?var` as bound;
//! 3. the first triple whose predicate signature equals the signal's is
//!    advanced: its subject (forward) or object (backward) becomes the
//!    resolved node;
//! 4. any other triple whose subject and object are both bound (constants,
//!    or variables bound by the context) is dropped; the rest are kept.
//!
//! Exactly one triple is advanced per step, so a continuation never has
//! more triples than its parent.

use std::collections::HashSet;

use linkwalk_sparql::{parse_query, BgpQuery, Binding, Term, TriplePattern};

use crate::error::TraversalError;
use crate::signal::ControlSignal;

pub fn expand(prior: &BgpQuery, signal: &ControlSignal) -> Result<BgpQuery, TraversalError> {
    let mut bindings = Vec::with_capacity(signal.context.len());
    let mut bounded: HashSet<&str> = HashSet::with_capacity(signal.context.len());
    for (variable, value) in &signal.context {
        bindings.push(Binding::new(variable, value.clone()));
        bounded.insert(variable.as_str());
    }

    let mut triples = Vec::with_capacity(prior.triples.len());
    let mut pattern_found = false;
    for triple in &prior.triples {
        if !pattern_found && matches_signal(triple, signal) {
            pattern_found = true;
            triples.push(advance(triple, signal));
        } else if !is_fully_bounded(triple, &bounded) {
            triples.push(triple.clone());
        }
    }

    if !pattern_found {
        return Err(TraversalError::PatternNotFound {
            signature: signal.path_signature.clone(),
        });
    }

    Ok(BgpQuery {
        prefixes: prior.prefixes.clone(),
        select_vars: prior.select_vars.clone(),
        bindings,
        triples,
    })
}

/// Text-to-text variant: parse, expand, render.
pub fn expand_query_text(prior: &str, signal: &ControlSignal) -> Result<String, TraversalError> {
    let prior = parse_query(prior)?;
    Ok(expand(&prior, signal)?.to_sparql())
}

fn matches_signal(triple: &TriplePattern, signal: &ControlSignal) -> bool {
    triple
        .predicate
        .signature()
        .is_some_and(|sig| sig == signal.path_signature)
}

fn advance(triple: &TriplePattern, signal: &ControlSignal) -> TriplePattern {
    let node = Term::iri(signal.node.clone());
    if signal.forward {
        TriplePattern {
            subject: node,
            predicate: triple.predicate.clone(),
            object: triple.object.clone(),
        }
    } else {
        TriplePattern {
            subject: triple.subject.clone(),
            predicate: triple.predicate.clone(),
            object: node,
        }
    }
}

fn is_fully_bounded(triple: &TriplePattern, bounded: &HashSet<&str>) -> bool {
    let is_bound = |term: &Term| match term.as_variable() {
        Some(name) => bounded.contains(name),
        None => true,
    };
    is_bound(&triple.subject) && is_bound(&triple.object)
}
