//! Parser for the supported SPARQL fragment.
//!
//! Accepted shape:
//!
//! ```text
//! PREFIX ex: <http://example.org/>          (zero or more)
//! SELECT ?a ?b | SELECT *
//! WHERE {
//!   BIND(<iri> AS ?v)  |  BIND(IRI(<iri>) AS ?v)
//!   ?s ex:p/^ex:q+ ?o ; ex:r "lit"@en , 42 .
//! }
//! ```
//!
//! Triples may use the `;` and `,` abbreviations and the `a` keyword.
//! Prefixed names are expanded against the declared prefixes; an undeclared
//! prefix is a parse error. `BIND` clauses are collected ahead of the
//! triples regardless of where they appear in the group.

use nom::branch::alt;
use nom::bytes::complete::{
    escaped_transform, is_not, tag, tag_no_case, take_while, take_while1, take_while_m_n,
};
use nom::character::complete::{char as pchar, digit1, multispace1, one_of, satisfy};
use nom::combinator::{all_consuming, consumed, map, map_opt, not, opt, peek, recognize, value};
use nom::error::{Error as NomError, ErrorKind};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use thiserror::Error;

use crate::model::{
    strip_var_sigil, BgpQuery, Binding, Literal, Predicate, PropertyPath, Term, TriplePattern,
    RDF_TYPE, XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed query near `{near}`")]
    Syntax { near: String },
    #[error("unsupported query: {0}")]
    Unsupported(String),
}

type Prefixes = Vec<(String, String)>;

/// Parse a `SELECT` query over a single basic graph pattern.
pub fn parse_query(input: &str) -> Result<BgpQuery, ParseError> {
    let (rest, prefixes) = prologue(input).map_err(|e| syntax_error(input, e))?;
    let ctx = Ctx {
        prefixes: &prefixes,
    };

    let (_, (select_vars, items)) = all_consuming(|i| ctx.select_query(i))(rest)
        .map_err(|e| syntax_error(rest, e))?;

    let mut bindings = Vec::new();
    let mut triples = Vec::new();
    for item in items {
        match item {
            GroupItem::Bind(b) => bindings.push(b),
            GroupItem::Triples(ts) => triples.extend(ts),
        }
    }
    if triples.is_empty() {
        return Err(ParseError::Unsupported(
            "the WHERE group has no triple patterns".to_string(),
        ));
    }

    Ok(BgpQuery {
        prefixes,
        select_vars,
        bindings,
        triples,
    })
}

/// Parse a standalone property path (full IRIs only, or the `a` keyword).
pub fn parse_path(input: &str) -> Result<PropertyPath, ParseError> {
    let prefixes = Prefixes::new();
    let ctx = Ctx {
        prefixes: &prefixes,
    };
    let parsed = all_consuming(ws(|i| ctx.path_alt(i)))(input);
    parsed.map(|(_, p)| p).map_err(|e| syntax_error(input, e))
}

/// True iff `input` is a `SELECT` over a single BGP this crate can rewrite.
pub fn is_supported_query(input: &str) -> bool {
    parse_query(input).is_ok()
}

fn syntax_error(input: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    let at = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => input,
    };
    let near: String = at.trim_start().chars().take(40).collect();
    ParseError::Syntax {
        near: if near.is_empty() {
            "<end of input>".to_string()
        } else {
            near
        },
    }
}

enum GroupItem {
    Bind(Binding),
    Triples(Vec<TriplePattern>),
}

// =============================================================================
// Prologue
// =============================================================================

fn prologue(input: &str) -> IResult<&str, Prefixes> {
    many0(ws(prefix_decl))(input)
}

fn prefix_decl(input: &str) -> IResult<&str, (String, String)> {
    map(
        tuple((
            ws(keyword("PREFIX")),
            ws(terminated(opt(pn_prefix), pchar(':'))),
            ws(iriref),
        )),
        |(_, name, ns)| (name.unwrap_or_default().to_string(), ns),
    )(input)
}

// =============================================================================
// Query body (needs the prefix table)
// =============================================================================

struct Ctx<'p> {
    prefixes: &'p [(String, String)],
}

impl<'p> Ctx<'p> {
    fn select_query<'a>(&self, input: &'a str) -> IResult<&'a str, (Vec<String>, Vec<GroupItem>)> {
        let (input, _) = ws(keyword("SELECT"))(input)?;
        let (input, vars) = ws(select_list)(input)?;
        let (input, _) = opt(ws(keyword("WHERE")))(input)?;
        let (input, items) = delimited(
            ws(pchar('{')),
            many0(terminated(|i| self.group_item(i), opt(ws(pchar('.'))))),
            ws(pchar('}')),
        )(input)?;
        Ok((input, (vars, items)))
    }

    fn group_item<'a>(&self, input: &'a str) -> IResult<&'a str, GroupItem> {
        alt((
            map(|i| self.bind_clause(i), GroupItem::Bind),
            map(|i| self.triples_same_subject(i), GroupItem::Triples),
        ))(input)
    }

    fn bind_clause<'a>(&self, input: &'a str) -> IResult<&'a str, Binding> {
        let iri_call = preceded(
            ws(keyword("IRI")),
            delimited(ws(pchar('(')), |i| self.iri(i), ws(pchar(')'))),
        );
        map(
            tuple((
                ws(keyword("BIND")),
                ws(pchar('(')),
                ws(alt((iri_call, |i| self.iri(i)))),
                ws(keyword("AS")),
                ws(variable),
                ws(pchar(')')),
            )),
            |(_, _, value, _, variable, _)| Binding { variable, value },
        )(input)
    }

    fn triples_same_subject<'a>(&self, input: &'a str) -> IResult<&'a str, Vec<TriplePattern>> {
        let (input, subject) = ws(|i| self.subject(i))(input)?;
        let (input, first) = self.predicate_objects(input)?;
        let (input, more) = many0(preceded(
            ws(pchar(';')),
            opt(|i| self.predicate_objects(i)),
        ))(input)?;

        let mut triples = Vec::new();
        for (predicate, objects) in std::iter::once(first).chain(more.into_iter().flatten()) {
            for object in objects {
                triples.push(TriplePattern {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });
            }
        }
        Ok((input, triples))
    }

    fn predicate_objects<'a>(&self, input: &'a str) -> IResult<&'a str, (Predicate, Vec<Term>)> {
        pair(
            ws(|i| self.verb(i)),
            separated_list1(ws(pchar(',')), ws(|i| self.object(i))),
        )(input)
    }

    fn subject<'a>(&self, input: &'a str) -> IResult<&'a str, Term> {
        alt((map(variable, Term::Variable), map(|i| self.iri(i), Term::Iri)))(input)
    }

    fn object<'a>(&self, input: &'a str) -> IResult<&'a str, Term> {
        alt((
            map(variable, Term::Variable),
            map(|i| self.iri(i), Term::Iri),
            map(|i| self.literal(i), Term::Literal),
        ))(input)
    }

    fn verb<'a>(&self, input: &'a str) -> IResult<&'a str, Predicate> {
        alt((
            map(variable, Predicate::Variable),
            map(|i| self.path_alt(i), Predicate::Path),
        ))(input)
    }

    // --- property paths ---------------------------------------------------

    fn path_alt<'a>(&self, input: &'a str) -> IResult<&'a str, PropertyPath> {
        map(
            separated_list1(ws(pchar('|')), |i| self.path_seq(i)),
            |items| collapse(items, PropertyPath::Alternative),
        )(input)
    }

    fn path_seq<'a>(&self, input: &'a str) -> IResult<&'a str, PropertyPath> {
        map(
            separated_list1(ws(pchar('/')), |i| self.path_elt_or_inverse(i)),
            |items| collapse(items, PropertyPath::Sequence),
        )(input)
    }

    fn path_elt_or_inverse<'a>(&self, input: &'a str) -> IResult<&'a str, PropertyPath> {
        alt((
            map(preceded(ws(pchar('^')), |i| self.path_elt(i)), PropertyPath::inverse),
            |i| self.path_elt(i),
        ))(input)
    }

    /// The modifier must follow the primary directly: `<p> +1` is a path
    /// followed by the literal `+1`, not `<p>+` followed by `1`.
    fn path_elt<'a>(&self, input: &'a str) -> IResult<&'a str, PropertyPath> {
        map(
            pair(preceded(sp, |i| self.path_primary(i)), opt(one_of("+*"))),
            |(primary, modifier)| match modifier {
                Some('+') => PropertyPath::one_or_more(primary),
                Some('*') => PropertyPath::zero_or_more(primary),
                _ => primary,
            },
        )(input)
    }

    fn path_primary<'a>(&self, input: &'a str) -> IResult<&'a str, PropertyPath> {
        alt((
            map(|i| self.iri(i), PropertyPath::Direct),
            value(
                PropertyPath::Direct(RDF_TYPE.to_string()),
                terminated(pchar('a'), not(peek(satisfy(|c| is_name_char(c) || c == ':')))),
            ),
            delimited(ws(pchar('(')), |i| self.path_alt(i), preceded(sp, pchar(')'))),
        ))(input)
    }

    // --- terms ------------------------------------------------------------

    fn iri<'a>(&self, input: &'a str) -> IResult<&'a str, String> {
        alt((iriref, |i| self.prefixed_name(i)))(input)
    }

    fn prefixed_name<'a>(&self, input: &'a str) -> IResult<&'a str, String> {
        map_opt(
            tuple((opt(pn_prefix), pchar(':'), pn_local)),
            |(prefix, _, local)| self.expand(prefix.unwrap_or(""), local),
        )(input)
    }

    fn expand(&self, prefix: &str, local: &str) -> Option<String> {
        self.prefixes
            .iter()
            .rev()
            .find(|(name, _)| name == prefix)
            .map(|(_, ns)| format!("{ns}{local}"))
    }

    fn literal<'a>(&self, input: &'a str) -> IResult<&'a str, Literal> {
        alt((
            |i| self.string_literal(i),
            numeric_literal,
            boolean_literal,
        ))(input)
    }

    fn string_literal<'a>(&self, input: &'a str) -> IResult<&'a str, Literal> {
        let (input, value) = alt((
            long_string_lit("\"\"\""),
            long_string_lit("'''"),
            string_lit,
            single_string_lit,
        ))(input)?;
        let (input, suffix) = opt(alt((
            map(preceded(pchar('@'), lang_tag), LiteralSuffix::Lang),
            map(preceded(tag("^^"), |i| self.iri(i)), LiteralSuffix::Datatype),
        )))(input)?;
        let lit = match suffix {
            None => Literal::plain(value),
            Some(LiteralSuffix::Lang(lang)) => Literal {
                value,
                language: Some(lang.to_string()),
                datatype: None,
            },
            Some(LiteralSuffix::Datatype(dt)) => Literal::typed(value, dt),
        };
        Ok((input, lit))
    }
}

enum LiteralSuffix<'a> {
    Lang(&'a str),
    Datatype(String),
}

fn collapse(
    mut items: Vec<PropertyPath>,
    wrap: fn(Vec<PropertyPath>) -> PropertyPath,
) -> PropertyPath {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

// =============================================================================
// Lexical helpers
// =============================================================================

fn select_list(input: &str) -> IResult<&str, Vec<String>> {
    alt((value(Vec::new(), pchar('*')), many1(ws(variable))))(input)
}

fn variable(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(one_of("?$"), take_while1(is_name_char))),
        |s: &str| strip_var_sigil(s).to_string(),
    )(input)
}

fn iriref(input: &str) -> IResult<&str, String> {
    map(
        delimited(pchar('<'), take_while(is_iri_char), pchar('>')),
        |s: &str| s.to_string(),
    )(input)
}

fn is_iri_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

fn pn_prefix(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic()),
        take_while(|c: char| is_name_char(c) || c == '-' || c == '.'),
    ))(input)
}

/// Local part of a prefixed name. May contain `.` but never ends with one,
/// so `ex:a .` and `ex:a.` both end the triple.
fn pn_local(input: &str) -> IResult<&str, &str> {
    let end = input
        .char_indices()
        .find(|&(_, c)| !(is_name_char(c) || matches!(c, '-' | '.' | ':')))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let local = input[..end].trim_end_matches('.');
    Ok((&input[local.len()..], local))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn lang_tag(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        many0(pair(pchar('-'), take_while1(|c: char| c.is_ascii_alphanumeric()))),
    ))(input)
}

/// `INTEGER`, `DECIMAL` or `DOUBLE`, optionally signed. The lexical form
/// is kept as written.
fn numeric_literal(input: &str) -> IResult<&str, Literal> {
    let (rest, (text, datatype)) = consumed(preceded(
        opt(one_of("+-")),
        alt((
            value(XSD_DOUBLE, double_body),
            value(XSD_DECIMAL, decimal_body),
            value(XSD_INTEGER, digit1),
        )),
    ))(input)?;
    Ok((rest, Literal::typed(text, datatype)))
}

fn double_body(input: &str) -> IResult<&str, &str> {
    recognize(alt((
        recognize(tuple((digit1, pchar('.'), opt(digit1), exponent))),
        recognize(tuple((pchar('.'), digit1, exponent))),
        recognize(pair(digit1, exponent)),
    )))(input)
}

/// `1.` is an integer followed by the triple terminator.
fn decimal_body(input: &str) -> IResult<&str, &str> {
    recognize(tuple((opt(digit1), pchar('.'), digit1)))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn boolean_literal(input: &str) -> IResult<&str, Literal> {
    map(alt((keyword("true"), keyword("false"))), |s: &str| {
        Literal::typed(s.to_ascii_lowercase(), XSD_BOOLEAN)
    })(input)
}

/// The character after a `\` inside a string literal.
fn string_escape(input: &str) -> IResult<&str, char> {
    alt((
        value('\\', pchar('\\')),
        value('"', pchar('"')),
        value('\'', pchar('\'')),
        value('\n', pchar('n')),
        value('\t', pchar('t')),
        value('\r', pchar('r')),
        value('\u{8}', pchar('b')),
        value('\u{c}', pchar('f')),
        preceded(pchar('u'), hex_scalar(4)),
        preceded(pchar('U'), hex_scalar(8)),
    ))(input)
}

fn hex_scalar<'a>(digits: usize) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    map_opt(
        take_while_m_n(digits, digits, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    )
}

fn string_lit(input: &str) -> IResult<&str, String> {
    let esc = escaped_transform(is_not("\\\"\n\r"), '\\', string_escape);
    map(delimited(pchar('"'), opt(esc), pchar('"')), Option::unwrap_or_default)(input)
}

fn single_string_lit(input: &str) -> IResult<&str, String> {
    let esc = escaped_transform(is_not("\\'\n\r"), '\\', string_escape);
    map(delimited(pchar('\''), opt(esc), pchar('\'')), Option::unwrap_or_default)(input)
}

/// `"""..."""` or `'''...'''`. May span lines and hold lone quotes.
fn long_string_lit<'a>(delim: &'static str) -> impl Fn(&'a str) -> IResult<&'a str, String> {
    move |input: &'a str| {
        let (mut rest, _) = tag::<_, _, NomError<&'a str>>(delim)(input)?;
        let mut out = String::new();
        loop {
            if let Some(after) = rest.strip_prefix(delim) {
                return Ok((after, out));
            }
            let mut chars = rest.chars();
            match chars.next() {
                None => return Err(nom::Err::Error(NomError::new(rest, ErrorKind::Tag))),
                Some('\\') => {
                    let (after, c) = string_escape(chars.as_str())?;
                    out.push(c);
                    rest = after;
                }
                Some(c) => {
                    out.push(c);
                    rest = chars.as_str();
                }
            }
        }
    }
}

/// Case-insensitive keyword that is not the prefix of a longer name.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(kw), not(peek(satisfy(is_name_char))))
}

/// Whitespace and `#` comments.
fn sp(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(pair(pchar('#'), take_while(|c| c != '\n'))),
        ))),
    )(input)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(sp, inner, sp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::canonicalize;

    #[test]
    fn parses_minimal_select() {
        let q = parse_query("SELECT ?y WHERE { ?x <p> ?y }").expect("parse");
        assert_eq!(q.select_vars, vec!["y"]);
        assert!(q.bindings.is_empty());
        assert_eq!(
            q.triples,
            vec![TriplePattern::new(Term::var("x"), Predicate::iri("p"), Term::var("y"))]
        );
    }

    #[test]
    fn expands_prefixes_and_keeps_declarations() {
        let q = parse_query(
            "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
             SELECT * WHERE { ?x foaf:knows ?y . ?y a foaf:Person }",
        )
        .expect("parse");
        assert!(q.select_vars.is_empty());
        assert_eq!(
            q.prefixes,
            vec![("foaf".to_string(), "http://xmlns.com/foaf/0.1/".to_string())]
        );
        assert_eq!(
            q.triples[0].predicate,
            Predicate::iri("http://xmlns.com/foaf/0.1/knows")
        );
        assert_eq!(q.triples[1].predicate, Predicate::iri(RDF_TYPE));
        assert_eq!(q.triples[1].object, Term::iri("http://xmlns.com/foaf/0.1/Person"));
    }

    #[test]
    fn undeclared_prefix_is_rejected() {
        assert!(matches!(
            parse_query("SELECT ?x WHERE { ?x ex:p ?y }"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn prefixed_name_before_terminating_dot() {
        let q = parse_query("PREFIX ex: <http://ex/> SELECT ?x WHERE { ?x ex:p ex:o. ?o ex:q ?x }")
            .expect("parse");
        assert_eq!(q.triples.len(), 2);
        assert_eq!(q.triples[0].object, Term::iri("http://ex/o"));
    }

    #[test]
    fn semicolon_and_comma_abbreviations() {
        let q = parse_query("SELECT ?s WHERE { ?s <p> ?a , ?b ; <q> \"x\" ; }").expect("parse");
        let objects: Vec<_> = q.triples.iter().map(|t| t.object.clone()).collect();
        assert_eq!(
            objects,
            vec![Term::var("a"), Term::var("b"), Term::literal("x")]
        );
        assert!(q.triples.iter().all(|t| t.subject == Term::var("s")));
    }

    #[test]
    fn parses_property_path_operators() {
        let q = parse_query("SELECT ?y WHERE { ?x ^<p>/(<q>|<r>)+/<s>* ?y }").expect("parse");
        let sig = q.triples[0].predicate.signature().expect("path");
        assert_eq!(sig, "Path(Path(~p) / Path(Path(q | r)+) / Path(s*))");
    }

    #[test]
    fn bind_forms() {
        let q = parse_query(
            "SELECT ?z WHERE { BIND(<b> AS ?y) BIND(IRI(<c>) AS ?w) ?y <q> ?z }",
        )
        .expect("parse");
        assert_eq!(
            q.bindings,
            vec![Binding::new("y", "b"), Binding::new("w", "c")]
        );
    }

    #[test]
    fn literals() {
        let q = parse_query(
            "SELECT ?s WHERE { ?s <p> \"a\\\"b\"@en-GB , 'x' , \"\" , 42 , 1.5 , true }",
        )
        .expect("parse");
        let objects: Vec<_> = q.triples.into_iter().map(|t| t.object).collect();
        assert_eq!(
            objects[0],
            Term::Literal(Literal {
                value: "a\"b".into(),
                language: Some("en-GB".into()),
                datatype: None,
            })
        );
        assert_eq!(objects[1], Term::literal("x"));
        assert_eq!(objects[2], Term::literal(""));
        assert_eq!(objects[3], Term::Literal(Literal::typed("42", XSD_INTEGER)));
        assert_eq!(objects[4], Term::Literal(Literal::typed("1.5", XSD_DECIMAL)));
        assert_eq!(objects[5], Term::Literal(Literal::typed("true", XSD_BOOLEAN)));
    }

    #[test]
    fn rejects_outside_fragment() {
        for q in [
            "ASK { ?s ?p ?o }",
            "SELECT DISTINCT ?s WHERE { ?s <p> ?o }",
            "SELECT ?s WHERE { ?s <p> ?o FILTER(?o > 1) }",
            "SELECT ?s WHERE { ?s <p> ?o } LIMIT 10",
            "SELECT ?s WHERE { ?s <p> _:b }",
            "SELECT ?s WHERE { OPTIONAL { ?s <p> ?o } }",
        ] {
            assert!(!is_supported_query(q), "should reject: {q}");
        }
        assert!(matches!(
            parse_query("SELECT ?s WHERE { BIND(<a> AS ?s) }"),
            Err(ParseError::Unsupported(_))
        ));
    }

    #[test]
    fn comments_are_whitespace() {
        let q = parse_query("# header\nSELECT ?y # proj\nWHERE { ?x <p> ?y # t\n }")
            .expect("parse");
        assert_eq!(q.triples.len(), 1);
    }

    #[test]
    fn standalone_path() {
        let p = parse_path("^<http://ex/p>+").expect("path");
        assert_eq!(canonicalize(&p), "Path(~Path(http://ex/p+))");
    }

    #[test]
    fn signed_numbers_are_not_path_modifiers() {
        let q = parse_query("SELECT ?s WHERE { ?s <p> +1 . ?s <q> -2 . ?s (<r>) +3 }")
            .expect("parse");
        let expected = [("p", "+1"), ("q", "-2"), ("r", "+3")];
        for (triple, (pred, value)) in q.triples.iter().zip(expected) {
            assert_eq!(triple.predicate, Predicate::iri(pred));
            assert_eq!(triple.object, Term::Literal(Literal::typed(value, XSD_INTEGER)));
        }

        let q = parse_query("SELECT ?s WHERE { ?s <p>+ 1 . ?s (<q>)* ?o }").expect("parse");
        assert_eq!(q.triples[0].predicate.signature().expect("path"), "Path(p+)");
        assert_eq!(q.triples[0].object, Term::Literal(Literal::typed("1", XSD_INTEGER)));
        assert_eq!(q.triples[1].predicate.signature().expect("path"), "Path(q*)");
    }

    #[test]
    fn numeric_forms() {
        let q = parse_query("SELECT ?s WHERE { ?s <p> 1.5e3 , .5 , -1E-2 , 2e10 , +.25 , 7. }")
            .expect("parse");
        let objects: Vec<_> = q.triples.into_iter().map(|t| t.object).collect();
        assert_eq!(
            objects,
            vec![
                Term::Literal(Literal::typed("1.5e3", XSD_DOUBLE)),
                Term::Literal(Literal::typed(".5", XSD_DECIMAL)),
                Term::Literal(Literal::typed("-1E-2", XSD_DOUBLE)),
                Term::Literal(Literal::typed("2e10", XSD_DOUBLE)),
                Term::Literal(Literal::typed("+.25", XSD_DECIMAL)),
                Term::Literal(Literal::typed("7", XSD_INTEGER)),
            ]
        );
    }

    #[test]
    fn string_escapes_and_long_strings() {
        let q = parse_query(
            "SELECT ?s WHERE { ?s <p> \"caf\\u00E9\" , '\\U0001F600' , \"\\b\\f\" , \
             \"\"\"multi\nline \"quoted\" \"\"\" , '''it's'''@en }",
        )
        .expect("parse");
        let objects: Vec<_> = q.triples.into_iter().map(|t| t.object).collect();
        assert_eq!(objects[0], Term::literal("caf\u{e9}"));
        assert_eq!(objects[1], Term::literal("\u{1F600}"));
        assert_eq!(objects[2], Term::literal("\u{8}\u{c}"));
        assert_eq!(objects[3], Term::literal("multi\nline \"quoted\" "));
        assert_eq!(
            objects[4],
            Term::Literal(Literal {
                value: "it's".into(),
                language: Some("en".into()),
                datatype: None,
            })
        );
        assert!(parse_query("SELECT ?s WHERE { ?s <p> \"\\uD800\" }").is_err());
        assert!(parse_query("SELECT ?s WHERE { ?s <p> \"\"\"open }").is_err());
    }

    #[test]
    fn escaped_literals_survive_rendering() {
        let text = "SELECT ?s WHERE { ?s <p> \"tab\\there\\b\\u0001\" , -4.5e-1 }";
        let q = parse_query(text).expect("parse");
        assert_eq!(parse_query(&q.to_sparql()).expect("reparse"), q);
    }
}
