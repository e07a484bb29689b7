use crate::vocab::{rdf, rdfs, xsd};
use std::collections::BTreeMap;

/// A table of prefixes and the namespace IRIs they abbreviate.
///
/// The table is a plain value: components that need to shorten or extend IRIs receive it as part
/// of their configuration. [Namespaces::default] contains the namespaces that are commonly used
/// in RDF data.
///
/// ```
/// use rdf_memo_model::Namespaces;
///
/// let namespaces = Namespaces::default().with_prefix("ex", "http://example.com/");
/// assert_eq!(
///     namespaces.extend_uri("ex:foo").as_deref(),
///     Some("http://example.com/foo")
/// );
/// assert_eq!(
///     namespaces.shorten_uri("http://xmlns.com/foaf/0.1/name").as_deref(),
///     Some("foaf:name")
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.insert(prefix, namespace);
        self
    }

    /// Adds (or replaces) a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Returns the namespace registered for `prefix`.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Iterates over all `(prefix, namespace)` pairs ordered by prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    /// Turns a prefixed name (`prefix:local`) into a full IRI.
    ///
    /// Returns [None] if the value is not a prefixed name or the prefix is unknown.
    pub fn extend_uri(&self, prefixed_name: &str) -> Option<String> {
        let (prefix, local) = prefixed_name.split_once(':')?;
        if local.starts_with("//") {
            return None;
        }
        self.namespace(prefix)
            .map(|namespace| format!("{namespace}{local}"))
    }

    /// Turns an IRI into a prefixed name using the longest matching namespace.
    pub fn shorten_uri(&self, uri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| uri.len() > namespace.len() && uri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .map(|(prefix, namespace)| format!("{prefix}:{}", &uri[namespace.len()..]))
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::empty()
            .with_prefix("rdf", rdf::NAMESPACE)
            .with_prefix("rdfs", rdfs::NAMESPACE)
            .with_prefix("xsd", xsd::NAMESPACE)
            .with_prefix("owl", "http://www.w3.org/2002/07/owl#")
            .with_prefix("foaf", "http://xmlns.com/foaf/0.1/")
            .with_prefix("dc", "http://purl.org/dc/elements/1.1/")
            .with_prefix("dcterms", "http://purl.org/dc/terms/")
            .with_prefix("skos", "http://www.w3.org/2004/02/skos/core#")
            .with_prefix("schema", "http://schema.org/")
    }
}
