//! IRIs of the vocabularies the model and the query decomposer rely on.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.

    /// The namespace of the RDF vocabulary.
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// The datatype of language-tagged string values.
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    /// The class membership property, abbreviated as `a` in SPARQL.
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    //! [RDFS](https://www.w3.org/TR/rdf-schema/) vocabulary.

    /// The namespace of the RDFS vocabulary.
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
}

pub mod xsd {
    //! [XML Schema](https://www.w3.org/TR/xmlschema11-2/) datatypes.

    /// The namespace of the XML Schema datatypes.
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    /// Character strings.
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// Arbitrary-size integers.
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// Arbitrary-precision decimal numbers.
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `true` and `false`.
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// Gregorian calendar years.
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
    /// Absolute or relative URIs and IRIs.
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}
