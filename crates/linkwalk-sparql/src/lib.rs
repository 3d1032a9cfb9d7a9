//! Linkwalk SPARQL fragment
//!
//! This crate defines the query model the traversal core rewrites: flat
//! Basic Graph Pattern (BGP) `SELECT` queries with `BIND` clauses and
//! property-path predicates. It provides:
//!
//! - a typed model (`Term`, `PropertyPath`, `TriplePattern`, `BgpQuery`),
//! - a parser for the supported SPARQL 1.1 fragment (`parse_query`),
//! - SPARQL text rendering (`Display` on the model types), and
//! - the canonical path signature used to match control signals to
//!   triple patterns (`canonicalize`).
//!
//! Anything outside the fragment (FILTER, OPTIONAL, UNION, solution
//! modifiers, blank nodes) is rejected at parse time.

pub mod digest;
pub mod model;
pub mod parser;
pub mod path;
mod render;

pub use model::{BgpQuery, Binding, Literal, Predicate, PropertyPath, Term, TriplePattern};
pub use parser::{is_supported_query, parse_path, parse_query, ParseError};
pub use path::canonicalize;
