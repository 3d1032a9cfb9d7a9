//! Typed model for BGP queries.
//!
//! Variable names are stored without their leading `?`. IRIs are stored
//! fully expanded (prefixed names are resolved at parse time); the prefix
//! declarations are kept only so they can be re-emitted verbatim.

use serde::{Deserialize, Serialize};

/// `rdf:type`, the expansion of the `a` keyword.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    /// `None` means a plain `xsd:string` literal.
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            value: value.into(),
            language: None,
            // `"x"^^xsd:string` and `"x"` are the same term.
            datatype: (datatype != XSD_STRING).then_some(datatype),
        }
    }
}

/// A subject or object position.
///
/// Equality is structural: two terms of the same variant and value are
/// interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(String),
    Iri(String),
    Literal(Literal),
}

impl Term {
    pub fn var(name: impl AsRef<str>) -> Self {
        Term::Variable(strip_var_sigil(name.as_ref()).to_string())
    }

    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(value))
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

/// Recursive property-path algebra.
///
/// A plain IRI predicate is `Direct`; composite forms nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyPath {
    Direct(String),
    Inverse(Box<PropertyPath>),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
}

impl PropertyPath {
    pub fn direct(iri: impl Into<String>) -> Self {
        PropertyPath::Direct(iri.into())
    }

    pub fn inverse(inner: PropertyPath) -> Self {
        PropertyPath::Inverse(Box::new(inner))
    }

    pub fn one_or_more(inner: PropertyPath) -> Self {
        PropertyPath::OneOrMore(Box::new(inner))
    }

    pub fn zero_or_more(inner: PropertyPath) -> Self {
        PropertyPath::ZeroOrMore(Box::new(inner))
    }
}

/// The predicate position: either a variable or a (possibly trivial) path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    Variable(String),
    Path(PropertyPath),
}

impl Predicate {
    pub fn iri(value: impl Into<String>) -> Self {
        Predicate::Path(PropertyPath::Direct(value.into()))
    }

    /// Canonical path signature, or `None` for a variable predicate.
    pub fn signature(&self) -> Option<String> {
        match self {
            Predicate::Variable(_) => None,
            Predicate::Path(path) => Some(crate::path::canonicalize(path)),
        }
    }
}

impl From<PropertyPath> for Predicate {
    fn from(path: PropertyPath) -> Self {
        Predicate::Path(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Predicate,
    pub object: Term,
}

impl TriplePattern {
    pub fn new(subject: Term, predicate: impl Into<Predicate>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// `BIND(<value> AS ?variable)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub variable: String,
    pub value: String,
}

impl Binding {
    pub fn new(variable: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            variable: strip_var_sigil(variable.as_ref()).to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpQuery {
    /// `PREFIX name: <namespace>` declarations, in declaration order.
    pub prefixes: Vec<(String, String)>,
    /// Projected variables. Empty means `SELECT *`.
    pub select_vars: Vec<String>,
    /// Rendered before any triple.
    pub bindings: Vec<Binding>,
    pub triples: Vec<TriplePattern>,
}

impl BgpQuery {
    pub fn new(select_vars: Vec<String>, triples: Vec<TriplePattern>) -> Self {
        Self {
            prefixes: Vec::new(),
            select_vars: select_vars
                .iter()
                .map(|v| strip_var_sigil(v).to_string())
                .collect(),
            bindings: Vec::new(),
            triples,
        }
    }

    /// The textual SPARQL form.
    pub fn to_sparql(&self) -> String {
        self.to_string()
    }
}

/// `?x` / `$x` / `x` all name the variable `x`.
pub fn strip_var_sigil(name: &str) -> &str {
    name.strip_prefix('?')
        .or_else(|| name.strip_prefix('$'))
        .unwrap_or(name)
}
