//! Canonical property-path signatures.
//!
//! The signature is the only thing ever compared when matching a control
//! signal against a triple pattern. Rules:
//!
//! - `Direct(iri)`      → `iri` (no wrapper)
//! - `Inverse(x)`       → `Path(~x)`
//! - `Sequence(xs)`     → `Path(x1 / x2 / ...)`
//! - `Alternative(xs)`  → `Path(x1 | x2 | ...)`
//! - `OneOrMore(x)`     → `Path(x+)`
//! - `ZeroOrMore(x)`    → `Path(x*)`

use crate::model::PropertyPath;

pub fn canonicalize(path: &PropertyPath) -> String {
    let mut out = String::new();
    write_canonical(path, &mut out);
    out
}

fn write_canonical(path: &PropertyPath, out: &mut String) {
    match path {
        PropertyPath::Direct(iri) => out.push_str(iri),
        PropertyPath::Inverse(inner) => {
            out.push_str("Path(~");
            write_canonical(inner, out);
            out.push(')');
        }
        PropertyPath::Sequence(items) => write_joined(items, " / ", out),
        PropertyPath::Alternative(items) => write_joined(items, " | ", out),
        PropertyPath::OneOrMore(inner) => {
            out.push_str("Path(");
            write_canonical(inner, out);
            out.push_str("+)");
        }
        PropertyPath::ZeroOrMore(inner) => {
            out.push_str("Path(");
            write_canonical(inner, out);
            out.push_str("*)");
        }
    }
}

fn write_joined(items: &[PropertyPath], sep: &str, out: &mut String) {
    out.push_str("Path(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write_canonical(item, out);
    }
    out.push(')');
}
