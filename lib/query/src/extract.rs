//! The textual grammar shared by all decomposition routines.
//!
//! The grammar is deliberately narrow: it recognizes the query shapes produced by the store
//! facade and by typical client code, not the complete SPARQL grammar. In particular, the `WHERE`
//! clause boundary is the text between the first `{` and the last `}`, and `GRAPH` blocks may
//! not contain nested braces outside of string literals.

use crate::parts::{
    FilterOperator, FilterPattern, PatternTerm, PatternTermKind, QuadPatternPart,
    TriplePatternPart,
};
use rdf_memo_model::vocab::{rdf, xsd};
use rdf_memo_model::Namespaces;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub(crate) const IRI: &str = r"<[^<>\s]*>";
pub(crate) const VAR: &str = r"[?$][A-Za-z0-9_]+\b";
const BNODE: &str = r"_:[A-Za-z0-9_](?:[A-Za-z0-9_\-.]*[A-Za-z0-9_\-])?";
pub(crate) const PNAME: &str =
    r"(?:[A-Za-z][A-Za-z0-9_\-]*)?:[A-Za-z0-9_](?:[A-Za-z0-9_\-.]*[A-Za-z0-9_\-])?";
const STRING: &str = r#""(?:[^"\\]|\\.)*""#;
const LANG: &str = r"[A-Za-z]+(?:-[A-Za-z0-9]+)*";
const NUMERIC: &str = r"[+-]?[0-9]+(?:\.[0-9]+)?";
const BOOLEAN: &str = r"(?:true|false)\b";

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn literal() -> String {
    format!(r"{STRING}(?:\^\^(?:{IRI}|{PNAME})|@{LANG})?")
}

pub(crate) static PREFIX_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i:PREFIX)\s+((?:[A-Za-z][A-Za-z0-9_\-]*)?):\s*<([^<>\s]*)>")
});

static DATASET_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"(?i:FROM)\s+((?i:NAMED)\s+)?({IRI}|{PNAME})"))
});

static TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    let subject = format!("{IRI}|{VAR}|{BNODE}|{PNAME}");
    let predicate = format!(r"{IRI}|{VAR}|{PNAME}|a\b");
    let object = format!(
        "{IRI}|{VAR}|{BNODE}|{}|{PNAME}|{NUMERIC}|{BOOLEAN}",
        literal()
    );
    compile(&format!(r"({subject})\s*({predicate})\s*({object})"))
});

static QUAD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i:GRAPH)\s*({IRI}|{VAR}|{PNAME})\s*\{{((?:[^{{}}"]|{STRING})*)\}}"#
    ))
});

static RELATIONAL_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    let operand = format!(
        "{}|{IRI}|{BNODE}|{NUMERIC}|{BOOLEAN}|{PNAME}",
        literal()
    );
    compile(&format!(
        r"(?i:FILTER)\s*\(\s*({VAR})\s*(!=|<=|>=|=|<|>)\s*({operand})\s*\)"
    ))
});

static REGEX_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i:FILTER)\s*\(?\s*(?i:REGEX)\s*\(\s*({VAR})\s*,\s*"((?:[^"\\]|\\.)*)"\s*(?:,\s*"((?:[^"\\]|\\.)*)"\s*)?\)\s*\)?"#
    ))
});

static LITERAL_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^"((?:[^"\\]|\\.)*)"(?:\^\^({IRI}|{PNAME})|@({LANG}))?$"#
    ))
});

static INTEGER: LazyLock<Regex> = LazyLock::new(|| compile(r"^[+-]?[0-9]+$"));

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[+-]?[0-9]+\.[0-9]+$"));

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| compile(r"[?$]([A-Za-z0-9_]+)"));

/// Resolves the textual components of patterns into [PatternTerm]s.
///
/// Prefixed names are expanded with the prefixes declared by the query first and the configured
/// namespaces second. Unknown prefixes are kept verbatim.
pub(crate) struct TermResolver<'a> {
    prefixes: &'a BTreeMap<String, String>,
    namespaces: &'a Namespaces,
}

impl<'a> TermResolver<'a> {
    pub(crate) fn new(prefixes: &'a BTreeMap<String, String>, namespaces: &'a Namespaces) -> Self {
        Self {
            prefixes,
            namespaces,
        }
    }

    fn expand(&self, prefixed_name: &str) -> String {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            if let Some(namespace) = self.prefixes.get(prefix) {
                return format!("{namespace}{local}");
            }
        }
        self.namespaces
            .extend_uri(prefixed_name)
            .unwrap_or_else(|| prefixed_name.to_owned())
    }

    /// Returns the IRI of an `<iri>` or `prefix:local` token.
    pub(crate) fn iri(&self, raw: &str) -> String {
        match raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Some(iri) => iri.to_owned(),
            None => self.expand(raw),
        }
    }

    /// Classifies a single pattern component.
    pub(crate) fn classify(&self, raw: &str) -> PatternTerm {
        let raw = raw.trim();
        if raw.starts_with('<') && raw.ends_with('>') {
            return PatternTerm::uri(self.iri(raw));
        }
        if let Some(captures) = LITERAL_PARTS.captures(raw) {
            let value = unescape(captures.get(1).map_or("", |m| m.as_str()));
            if let Some(datatype) = captures.get(2) {
                return PatternTerm {
                    datatype: Some(self.iri(datatype.as_str())),
                    ..PatternTerm::new(value, PatternTermKind::TypedLiteral)
                };
            }
            return PatternTerm {
                language: captures.get(3).map(|m| m.as_str().to_owned()),
                ..PatternTerm::new(value, PatternTermKind::Literal)
            };
        }
        if let Some(id) = raw.strip_prefix("_:") {
            return PatternTerm::new(id, PatternTermKind::BlankNode);
        }
        if let Some(name) = raw.strip_prefix('?').or_else(|| raw.strip_prefix('$')) {
            return PatternTerm::variable(name);
        }
        if raw == "a" {
            return PatternTerm::uri(rdf::TYPE);
        }
        if INTEGER.is_match(raw) {
            return typed(raw, xsd::INTEGER);
        }
        if DECIMAL.is_match(raw) {
            return typed(raw, xsd::DECIMAL);
        }
        if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
            return typed(raw.to_ascii_lowercase(), xsd::BOOLEAN);
        }
        if raw.contains(':') {
            return PatternTerm::uri(self.expand(raw));
        }
        PatternTerm::variable(raw)
    }
}

fn typed(value: impl Into<String>, datatype: &str) -> PatternTerm {
    PatternTerm {
        datatype: Some(datatype.to_owned()),
        ..PatternTerm::new(value, PatternTermKind::TypedLiteral)
    }
}

/// Reverts the escaping of a string between double quotes.
pub(crate) fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some(escaped @ ('"' | '\'' | '\\')) => result.push(escaped),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Extracts the `PREFIX name: <uri>` declarations.
pub(crate) fn extract_prefixes(query: &str) -> BTreeMap<String, String> {
    PREFIX_DECLARATION
        .captures_iter(query)
        .map(|captures| (captures[1].to_owned(), captures[2].to_owned()))
        .collect()
}

/// Removes the `PREFIX` declarations and surrounding whitespace.
pub(crate) fn strip_prologue(query: &str) -> String {
    PREFIX_DECLARATION.replace_all(query, "").trim().to_owned()
}

/// Extracts the graphs of `FROM <uri>` and `FROM NAMED <uri>` clauses.
pub(crate) fn extract_dataset(text: &str, resolver: &TermResolver<'_>) -> (Vec<String>, Vec<String>) {
    let mut graphs = Vec::new();
    let mut named_graphs = Vec::new();
    for captures in DATASET_CLAUSE.captures_iter(text) {
        let graph = resolver.iri(&captures[2]);
        let target = if captures.get(1).is_some() {
            &mut named_graphs
        } else {
            &mut graphs
        };
        if !target.contains(&graph) {
            target.push(graph);
        }
    }
    (graphs, named_graphs)
}

/// Returns the text between the first `{` and the last `}`.
pub(crate) fn where_clause(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start + 1..end])
}

/// Returns the text before the first `{`.
pub(crate) fn before_where_clause(text: &str) -> &str {
    text.find('{').map_or(text, |start| &text[..start])
}

/// Returns the text after the last `}`.
pub(crate) fn after_where_clause(text: &str) -> &str {
    text.rfind('}').map_or("", |end| &text[end + 1..])
}

fn strip_filters(text: &str) -> Cow<'_, str> {
    match RELATIONAL_FILTER.replace_all(text, " ") {
        Cow::Borrowed(text) => REGEX_FILTER.replace_all(text, " "),
        Cow::Owned(text) => Cow::Owned(REGEX_FILTER.replace_all(&text, " ").into_owned()),
    }
}

/// Extracts the triple patterns of a block that contains no `GRAPH` blocks.
pub(crate) fn extract_triple_patterns(
    text: &str,
    resolver: &TermResolver<'_>,
) -> Vec<TriplePatternPart> {
    let text = strip_filters(text);
    TRIPLE
        .captures_iter(&text)
        .map(|captures| TriplePatternPart {
            subject: resolver.classify(&captures[1]),
            predicate: resolver.classify(&captures[2]),
            object: resolver.classify(&captures[3]),
        })
        .collect()
}

/// Extracts the triple patterns inside `GRAPH … { … }` blocks.
pub(crate) fn extract_quad_patterns(
    text: &str,
    resolver: &TermResolver<'_>,
) -> Vec<QuadPatternPart> {
    QUAD_BLOCK
        .captures_iter(text)
        .flat_map(|captures| {
            let graph = resolver.classify(&captures[1]);
            extract_triple_patterns(&captures[2], resolver)
                .into_iter()
                .map(move |triple| QuadPatternPart {
                    subject: triple.subject,
                    predicate: triple.predicate,
                    object: triple.object,
                    graph: graph.clone(),
                })
        })
        .collect()
}

/// Extracts either quad patterns or triple patterns from a block.
///
/// If the block contains a `GRAPH` block, only quad patterns are returned.
pub(crate) fn extract_patterns(
    text: &str,
    resolver: &TermResolver<'_>,
) -> (Vec<TriplePatternPart>, Vec<QuadPatternPart>) {
    let quads = extract_quad_patterns(text, resolver);
    if quads.is_empty() {
        (extract_triple_patterns(text, resolver), quads)
    } else {
        (Vec::new(), quads)
    }
}

/// Extracts relational and `regex` filters.
pub(crate) fn extract_filters(text: &str, resolver: &TermResolver<'_>) -> Vec<FilterPattern> {
    let mut filters = Vec::new();
    for captures in RELATIONAL_FILTER.captures_iter(text) {
        let Some(operator) = FilterOperator::parse(&captures[2]) else {
            continue;
        };
        filters.push((
            captures.get(0).map_or(0, |m| m.start()),
            FilterPattern::Relational {
                variable: captures[1][1..].to_owned(),
                operator,
                operand: resolver.classify(&captures[3]),
            },
        ));
    }
    for captures in REGEX_FILTER.captures_iter(text) {
        filters.push((
            captures.get(0).map_or(0, |m| m.start()),
            FilterPattern::Regex {
                variable: captures[1][1..].to_owned(),
                pattern: unescape(&captures[2]),
                flags: captures.get(3).map(|m| m.as_str().to_owned()),
            },
        ));
    }
    filters.sort_by_key(|(position, _)| *position);
    filters.into_iter().map(|(_, filter)| filter).collect()
}

/// Extracts all variable names in order of first appearance.
pub(crate) fn extract_variables(text: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for captures in VARIABLE.captures_iter(text) {
        let name = &captures[1];
        if !variables.iter().any(|v| v == name) {
            variables.push(name.to_owned());
        }
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_resolver<T>(f: impl FnOnce(&TermResolver<'_>) -> T) -> T {
        let prefixes = BTreeMap::from([("ex".to_owned(), "http://example.com/".to_owned())]);
        let namespaces = Namespaces::default();
        f(&TermResolver::new(&prefixes, &namespaces))
    }

    #[test]
    fn classifies_components() {
        with_resolver(|resolver| {
            assert_eq!(resolver.classify("<http://a/>"), PatternTerm::uri("http://a/"));
            assert_eq!(resolver.classify("?x"), PatternTerm::variable("x"));
            assert_eq!(resolver.classify("ex:foo"), PatternTerm::uri("http://example.com/foo"));
            assert_eq!(
                resolver.classify("foaf:name"),
                PatternTerm::uri("http://xmlns.com/foaf/0.1/name")
            );
            assert_eq!(resolver.classify("unknown:x"), PatternTerm::uri("unknown:x"));
            assert_eq!(resolver.classify("a"), PatternTerm::uri(rdf::TYPE));
            assert_eq!(
                resolver.classify("_:b1"),
                PatternTerm::new("b1", PatternTermKind::BlankNode)
            );
            assert_eq!(resolver.classify("42"), typed("42", xsd::INTEGER));
            assert_eq!(resolver.classify("4.2"), typed("4.2", xsd::DECIMAL));
            assert_eq!(resolver.classify("true"), typed("true", xsd::BOOLEAN));
            assert_eq!(resolver.classify("name"), PatternTerm::variable("name"));
        });
    }

    #[test]
    fn classifies_literals() {
        with_resolver(|resolver| {
            assert_eq!(
                resolver.classify(r#""a \"b\"""#),
                PatternTerm::new("a \"b\"", PatternTermKind::Literal)
            );
            assert_eq!(
                resolver.classify(r#""hallo"@DE"#).language.as_deref(),
                Some("de")
            );
            assert_eq!(
                resolver.classify(r#""1"^^xsd:integer"#),
                typed("1", xsd::INTEGER)
            );
            assert_eq!(
                resolver.classify(r#""1"^^<http://example.com/dt>"#),
                typed("1", "http://example.com/dt")
            );
        });
    }

    #[test]
    fn where_clause_spans_first_to_last_brace() {
        assert_eq!(
            where_clause("ASK { ?s ?p ?o { nested } }"),
            Some(" ?s ?p ?o { nested } ")
        );
        assert_eq!(where_clause("ASK } ?s {"), None);
        assert_eq!(where_clause("ASK ?s ?p ?o"), None);
    }

    #[test]
    fn quad_blocks_short_circuit_triples() {
        with_resolver(|resolver| {
            let (triples, quads) = extract_patterns(
                "GRAPH <http://g/> { ?s ?p ?o . } <http://a/> <http://b/> <http://c/> .",
                resolver,
            );
            assert!(triples.is_empty());
            assert_eq!(quads.len(), 1);
            assert_eq!(quads[0].graph, PatternTerm::uri("http://g/"));
        });
    }

    #[test]
    fn filters_do_not_leak_into_triples() {
        with_resolver(|resolver| {
            let text = r#"?s ?p ?o . FILTER (?s = <http://a/>) FILTER regex(?o, "^x", "i")"#;
            assert_eq!(extract_triple_patterns(text, resolver).len(), 1);
            let filters = extract_filters(text, resolver);
            assert_eq!(
                filters,
                vec![
                    FilterPattern::Relational {
                        variable: "s".to_owned(),
                        operator: FilterOperator::Equal,
                        operand: PatternTerm::uri("http://a/"),
                    },
                    FilterPattern::Regex {
                        variable: "o".to_owned(),
                        pattern: "^x".to_owned(),
                        flags: Some("i".to_owned()),
                    },
                ]
            );
        });
    }

    #[test]
    fn numeric_filter_operands_are_integers() {
        with_resolver(|resolver| {
            let filters = extract_filters("FILTER (?age > 40) FILTER (?name != \"Bob\")", resolver);
            assert_eq!(
                filters,
                vec![
                    FilterPattern::Relational {
                        variable: "age".to_owned(),
                        operator: FilterOperator::Greater,
                        operand: typed("40", xsd::INTEGER),
                    },
                    FilterPattern::Relational {
                        variable: "name".to_owned(),
                        operator: FilterOperator::NotEqual,
                        operand: PatternTerm::new("Bob", PatternTermKind::Literal),
                    },
                ]
            );
        });
    }

    #[test]
    fn variables_in_order_of_appearance() {
        assert_eq!(
            extract_variables("?b ?a ?b $c"),
            vec!["b".to_owned(), "a".to_owned(), "c".to_owned()]
        );
    }
}
