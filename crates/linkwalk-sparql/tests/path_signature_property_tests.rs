use linkwalk_sparql::model::{XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER};
use linkwalk_sparql::{
    canonicalize, parse_path, parse_query, BgpQuery, Literal, Predicate, PropertyPath, Term,
    TriplePattern,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn iri_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,3}".prop_map(|s| format!("http://ex.org/{s}"))
}

/// Literal objects in every lexical form the parser accepts: signed
/// numbers, language tags, datatypes and strings that need escaping.
fn literal_strategy() -> impl Strategy<Value = Literal> {
    let text = "[a-z \"'\\\\\t\n\r\u{8}\u{c}\u{1}\u{e9}\u{1F600}]{0,8}";
    prop_oneof![
        text.prop_map(Literal::plain),
        (text, "[a-z]{2}(-[A-Z]{2})?").prop_map(|(value, lang)| Literal {
            value,
            language: Some(lang),
            datatype: None,
        }),
        (text, iri_strategy()).prop_map(|(value, dt)| Literal::typed(value, dt)),
        "[+-]?[0-9]{1,4}".prop_map(|v| Literal::typed(v, XSD_INTEGER)),
        "[+-]?[0-9]{0,3}\\.[0-9]{1,3}".prop_map(|v| Literal::typed(v, XSD_DECIMAL)),
        "[+-]?[0-9]{1,3}(\\.[0-9]{0,2})?[eE][+-]?[0-9]{1,2}"
            .prop_map(|v| Literal::typed(v, XSD_DOUBLE)),
    ]
}

fn object_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        Just(Term::var("o")),
        iri_strategy().prop_map(Term::Iri),
        literal_strategy().prop_map(Term::Literal),
    ]
}

/// Composite lists always have at least two items (the parser never builds
/// singleton sequences or alternatives).
fn path_strategy() -> impl Strategy<Value = PropertyPath> {
    let leaf = iri_strategy().prop_map(PropertyPath::Direct);
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(PropertyPath::inverse),
            inner.clone().prop_map(PropertyPath::one_or_more),
            inner.clone().prop_map(PropertyPath::zero_or_more),
            prop::collection::vec(inner.clone(), 2..4).prop_map(PropertyPath::Sequence),
            prop::collection::vec(inner, 2..4).prop_map(PropertyPath::Alternative),
        ]
    })
}

proptest! {
    #[test]
    fn canonicalize_is_deterministic(path in path_strategy()) {
        let cloned = path.clone();
        prop_assert_eq!(canonicalize(&path), canonicalize(&cloned));
    }

    #[test]
    fn distinct_paths_have_distinct_signatures(a in path_strategy(), b in path_strategy()) {
        if a != b {
            prop_assert_ne!(canonicalize(&a), canonicalize(&b));
        } else {
            prop_assert_eq!(canonicalize(&a), canonicalize(&b));
        }
    }

    #[test]
    fn rendered_path_parses_back_to_same_signature(path in path_strategy()) {
        let text = path.to_string();
        let reparsed = parse_path(&text).expect("rendered path should parse");
        prop_assert_eq!(canonicalize(&reparsed), canonicalize(&path));
        prop_assert_eq!(reparsed, path);
    }

    #[test]
    fn rendered_literal_objects_parse_back(
        objects in prop::collection::vec((path_strategy(), object_strategy()), 1..5),
    ) {
        let triples = objects
            .into_iter()
            .map(|(p, o)| TriplePattern::new(Term::var("s"), Predicate::Path(p), o))
            .collect();
        let query = BgpQuery::new(vec!["s".into()], triples);
        let reparsed = parse_query(&query.to_sparql()).expect("rendered query should parse");
        prop_assert_eq!(reparsed, query);
    }

    #[test]
    fn bare_signed_numbers_keep_their_predicate(
        path in path_strategy(),
        number in "[+-][0-9]{1,4}",
    ) {
        let text = format!("SELECT ?s WHERE {{ ?s {path} {number} }}");
        let query = parse_query(&text).expect("query should parse");
        prop_assert_eq!(&query.triples[0].predicate, &Predicate::Path(path));
        prop_assert_eq!(
            &query.triples[0].object,
            &Term::Literal(Literal::typed(number, XSD_INTEGER))
        );
    }

    #[test]
    fn rendered_query_parses_back(paths in prop::collection::vec(path_strategy(), 1..4)) {
        let triples = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                TriplePattern::new(
                    Term::var(format!("v{i}")),
                    Predicate::Path(p),
                    Term::var(format!("v{}", i + 1)),
                )
            })
            .collect();
        let query = BgpQuery::new(vec!["v0".into()], triples);
        let reparsed = parse_query(&query.to_sparql()).expect("rendered query should parse");
        prop_assert_eq!(reparsed, query);
    }
}

#[test]
fn fixture_signatures_do_not_collide() {
    let d = |s: &str| PropertyPath::direct(format!("http://ex.org/{s}"));
    let fixtures = vec![
        d("p"),
        d("q"),
        PropertyPath::inverse(d("p")),
        PropertyPath::inverse(PropertyPath::inverse(d("p"))),
        PropertyPath::one_or_more(d("p")),
        PropertyPath::zero_or_more(d("p")),
        PropertyPath::one_or_more(PropertyPath::zero_or_more(d("p"))),
        PropertyPath::Sequence(vec![d("p"), d("q")]),
        PropertyPath::Sequence(vec![d("q"), d("p")]),
        PropertyPath::Alternative(vec![d("p"), d("q")]),
        PropertyPath::Sequence(vec![d("p"), PropertyPath::Sequence(vec![d("q"), d("r")])]),
        PropertyPath::Sequence(vec![d("p"), d("q"), d("r")]),
        PropertyPath::Alternative(vec![PropertyPath::Sequence(vec![d("p"), d("q")]), d("r")]),
        PropertyPath::Sequence(vec![PropertyPath::Alternative(vec![d("p"), d("q")]), d("r")]),
    ];

    let mut seen: HashMap<String, &PropertyPath> = HashMap::new();
    for f in &fixtures {
        if let Some(prev) = seen.insert(canonicalize(f), f) {
            panic!("signature collision between {prev:?} and {f:?}");
        }
    }
}
