use rdf_memo_model::{BlankNode, InvalidTermValue, Literal, NamedNode, Term, Variable};
use std::collections::BTreeMap;
use std::fmt;

/// The kind of a component of a triple pattern, as recognized by the decomposer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternTermKind {
    Uri,
    BlankNode,
    Literal,
    TypedLiteral,
    Variable,
}

impl PatternTermKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::BlankNode => "bnode",
            Self::Literal => "literal",
            Self::TypedLiteral => "typed-literal",
            Self::Variable => "var",
        }
    }
}

impl fmt::Display for PatternTermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single component of a triple pattern or a filter operand.
///
/// The `value` holds the IRI for `uri` (prefixed names are expanded when the prefix is known),
/// the identifier for `bnode`, the unescaped lexical form for literals and the name (without `?`)
/// for variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternTerm {
    pub value: String,
    pub kind: PatternTermKind,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl PatternTerm {
    pub fn new(value: impl Into<String>, kind: PatternTermKind) -> Self {
        Self {
            value: value.into(),
            kind,
            datatype: None,
            language: None,
        }
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Self::new(value, PatternTermKind::Uri)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, PatternTermKind::Variable)
    }

    pub fn is_variable(&self) -> bool {
        self.kind == PatternTermKind::Variable
    }

    pub fn is_uri(&self) -> bool {
        self.kind == PatternTermKind::Uri
    }

    /// Converts this component into a term of the model.
    pub fn to_term(&self) -> Result<Term, InvalidTermValue> {
        Ok(match self.kind {
            PatternTermKind::Uri => NamedNode::new(&self.value)?.into(),
            PatternTermKind::BlankNode => BlankNode::new(&self.value)?.into(),
            PatternTermKind::Literal | PatternTermKind::TypedLiteral => {
                let datatype = self.datatype.as_ref().map(NamedNode::new).transpose()?;
                Literal::new(&self.value, datatype, self.language.as_deref())?.into()
            }
            PatternTermKind::Variable => Variable::new(&self.value)?.into(),
        })
    }
}

/// A triple pattern found in a query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriplePatternPart {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

/// A triple pattern found inside a `GRAPH … { … }` block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadPatternPart {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
    pub graph: PatternTerm,
}

impl QuadPatternPart {
    /// Returns the triple pattern without the graph.
    pub fn triple(&self) -> TriplePatternPart {
        TriplePatternPart {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }
}

/// A relational operator in a `FILTER (?var OP operand)` expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        }
    }

    pub(crate) fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessOrEqual,
            ">=" => Self::GreaterOrEqual,
            _ => return None,
        })
    }
}

/// A filter expression the decomposer recognizes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterPattern {
    /// `FILTER (?variable OP operand)`
    Relational {
        variable: String,
        operator: FilterOperator,
        operand: PatternTerm,
    },
    /// `FILTER regex(?variable, "pattern"[, "flags"])`
    Regex {
        variable: String,
        pattern: String,
        flags: Option<String>,
    },
}

impl FilterPattern {
    /// The variable the filter constrains.
    pub fn variable(&self) -> &str {
        match self {
            Self::Relational { variable, .. } | Self::Regex { variable, .. } => variable,
        }
    }
}

/// The sort direction of an `ORDER BY` condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// An `ORDER BY` condition on a variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderCondition {
    pub variable: String,
    pub direction: OrderDirection,
}

/// The solution modifiers of a `SELECT` query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SolutionModifiers {
    pub distinct: bool,
    pub reduced: bool,
    pub order_by: Vec<OrderCondition>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// The form of an update or graph management query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateSubType {
    InsertData,
    InsertInto,
    DeleteData,
    DeleteWhere,
    DeleteFromWhere,
    DeletePrologWhere,
    WithDeleteWhere,
    WithDeleteInsertWhere,
    ClearGraph,
    CreateGraph,
    CreateSilentGraph,
    DropGraph,
    DropSilentGraph,
}

impl UpdateSubType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsertData => "insertData",
            Self::InsertInto => "insertInto",
            Self::DeleteData => "deleteData",
            Self::DeleteWhere => "deleteWhere",
            Self::DeleteFromWhere => "deleteFromWhere",
            Self::DeletePrologWhere => "deletePrologWhere",
            Self::WithDeleteWhere => "withDeleteWhere",
            Self::WithDeleteInsertWhere => "withDeleteInsertWhere",
            Self::ClearGraph => "clearGraph",
            Self::CreateGraph => "createGraph",
            Self::CreateSilentGraph => "createSilentGraph",
            Self::DropGraph => "dropGraph",
            Self::DropSilentGraph => "dropSilentGraph",
        }
    }

    /// Returns whether this sub type manages graphs instead of statements.
    pub fn is_graph_management(self) -> bool {
        matches!(
            self,
            Self::ClearGraph
                | Self::CreateGraph
                | Self::CreateSilentGraph
                | Self::DropGraph
                | Self::DropSilentGraph
        )
    }
}

impl fmt::Display for UpdateSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structural parts extracted from a query.
///
/// Not every part is filled for every shape: graph management queries only have a sub type and
/// graphs, `ASK` has no result variables, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParts {
    /// The sub type of update and graph management queries.
    pub sub_type: Option<UpdateSubType>,
    /// The prefixes declared in the prologue.
    pub prefixes: BTreeMap<String, String>,
    /// Graphs from `FROM`, `WITH`, `INTO` or `GRAPH` clauses.
    pub graphs: Vec<String>,
    /// Graphs from `FROM NAMED` clauses.
    pub named_graphs: Vec<String>,
    /// The text between the first `{` and the last `}` of the `WHERE` clause (or data block).
    pub where_clause: Option<String>,
    pub triple_pattern: Vec<TriplePatternPart>,
    pub quad_pattern: Vec<QuadPatternPart>,
    pub filter_pattern: Vec<FilterPattern>,
    /// All variables, in order of first appearance.
    pub variables: Vec<String>,
    /// The projected variables of `SELECT` and `DESCRIBE` queries.
    pub result_variables: Vec<String>,
    pub modifiers: SolutionModifiers,
}

impl QueryParts {
    /// Returns every graph IRI the query refers to, in order of appearance and without
    /// duplicates.
    ///
    /// This includes the graphs of quad patterns that name their graph with an IRI.
    pub fn referenced_graphs(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let quad_graphs = self
            .quad_pattern
            .iter()
            .filter(|quad| quad.graph.is_uri())
            .map(|quad| &quad.graph.value);
        for graph in self.graphs.iter().chain(&self.named_graphs).chain(quad_graphs) {
            if !result.contains(graph) {
                result.push(graph.clone());
            }
        }
        result
    }
}
