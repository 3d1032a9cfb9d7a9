//! SPARQL text rendering.
//!
//! Output is a single `SELECT ... WHERE { ... }` group: every `BIND` first,
//! then the triples joined by ` . `. IRIs are always written in full.

use std::fmt;

use crate::model::{BgpQuery, Binding, Literal, Predicate, PropertyPath, Term, TriplePattern};

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\u{8}' => f.write_str("\\b")?,
                '\u{c}' => f.write_str("\\f")?,
                c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("\"")?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "?{name}"),
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

/// Binding strength, loosest first. A sub-path is parenthesized whenever it
/// binds more loosely than its slot requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Alternative,
    Sequence,
    /// `^elt`
    Inverse,
    /// `primary` or `primary+` / `primary*`
    Element,
    Primary,
}

fn level_of(path: &PropertyPath) -> Level {
    match path {
        PropertyPath::Alternative(_) => Level::Alternative,
        PropertyPath::Sequence(_) => Level::Sequence,
        PropertyPath::Inverse(_) => Level::Inverse,
        PropertyPath::OneOrMore(_) | PropertyPath::ZeroOrMore(_) => Level::Element,
        PropertyPath::Direct(_) => Level::Primary,
    }
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &PropertyPath, slot: Level) -> fmt::Result {
    let wrap = level_of(path) < slot;
    if wrap {
        f.write_str("(")?;
    }
    match path {
        PropertyPath::Direct(iri) => write!(f, "<{iri}>")?,
        PropertyPath::Inverse(inner) => {
            f.write_str("^")?;
            write_path(f, inner, Level::Element)?;
        }
        PropertyPath::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str("/")?;
                }
                write_path(f, item, Level::Inverse)?;
            }
        }
        PropertyPath::Alternative(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str("|")?;
                }
                write_path(f, item, Level::Sequence)?;
            }
        }
        PropertyPath::OneOrMore(inner) => {
            write_path(f, inner, Level::Primary)?;
            f.write_str("+")?;
        }
        PropertyPath::ZeroOrMore(inner) => {
            write_path(f, inner, Level::Primary)?;
            f.write_str("*")?;
        }
    }
    if wrap {
        f.write_str(")")?;
    }
    Ok(())
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_path(f, self, Level::Alternative)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Variable(name) => write!(f, "?{name}"),
            Predicate::Path(path) => write!(f, "{path}"),
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BIND(<{}> AS ?{})", self.value, self.variable)
    }
}

impl fmt::Display for BgpQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, namespace) in &self.prefixes {
            writeln!(f, "PREFIX {name}: <{namespace}>")?;
        }
        f.write_str("SELECT")?;
        if self.select_vars.is_empty() {
            f.write_str(" *")?;
        } else {
            for var in &self.select_vars {
                write!(f, " ?{var}")?;
            }
        }
        f.write_str(" WHERE {")?;
        for binding in &self.bindings {
            write!(f, " {binding}")?;
        }
        for (i, triple) in self.triples.iter().enumerate() {
            if i > 0 {
                f.write_str(" .")?;
            }
            write!(f, " {triple}")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyPath as P;

    #[test]
    fn renders_simple_select() {
        let q = BgpQuery::new(
            vec!["y".into()],
            vec![TriplePattern::new(Term::iri("a"), Predicate::iri("p"), Term::var("y"))],
        );
        assert_eq!(q.to_sparql(), "SELECT ?y WHERE { <a> <p> ?y }");
    }

    #[test]
    fn bindings_precede_triples() {
        let mut q = BgpQuery::new(
            vec!["z".into()],
            vec![
                TriplePattern::new(Term::var("x"), Predicate::iri("p"), Term::iri("a")),
                TriplePattern::new(Term::var("y"), Predicate::iri("q"), Term::var("z")),
            ],
        );
        q.bindings.push(Binding::new("y", "b"));
        assert_eq!(
            q.to_sparql(),
            "SELECT ?z WHERE { BIND(<b> AS ?y) ?x <p> <a> . ?y <q> ?z }"
        );
    }

    #[test]
    fn path_parenthesization() {
        let d = |s: &str| P::direct(s);
        assert_eq!(P::inverse(d("p")).to_string(), "^<p>");
        assert_eq!(P::inverse(P::inverse(d("p"))).to_string(), "^(^<p>)");
        assert_eq!(P::one_or_more(P::inverse(d("p"))).to_string(), "(^<p>)+");
        assert_eq!(
            P::Sequence(vec![P::Alternative(vec![d("a"), d("b")]), d("c")]).to_string(),
            "(<a>|<b>)/<c>"
        );
        assert_eq!(
            P::Alternative(vec![P::Sequence(vec![d("a"), d("b")]), d("c")]).to_string(),
            "<a>/<b>|<c>"
        );
        assert_eq!(
            P::zero_or_more(P::Sequence(vec![d("a"), d("b")])).to_string(),
            "(<a>/<b>)*"
        );
    }

    #[test]
    fn literal_escapes_and_tags() {
        let mut lit = Literal::plain("say \"hi\"");
        assert_eq!(lit.to_string(), r#""say \"hi\"""#);
        lit.language = Some("en".into());
        assert_eq!(lit.to_string(), r#""say \"hi\""@en"#);
    }

    #[test]
    fn control_characters_are_escaped() {
        let lit = Literal::plain("a\u{8}b\u{c}c\u{1}d\u{e9}");
        assert_eq!(lit.to_string(), "\"a\\bb\\fc\\u0001d\u{e9}\"");
    }
}
