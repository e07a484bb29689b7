use crate::{statements_from_parts, QueryResult, QuerySolutions, Store, StoreError};
use rdf_memo_model::{NamedNode, Statement, Term};
use rdf_memo_query::{
    FilterOperator, FilterPattern, OrderDirection, Query, QueryError, QueryFactory, QueryParts,
    QueryShape, UpdateSubType,
};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

const REGEX_SIZE_LIMIT: usize = 1_000_000;

type Bindings = BTreeMap<String, Term>;

/// A [Store] that keeps statements in memory and answers the query text it receives by
/// decomposing it.
///
/// The store understands the query forms produced by the statement operations of [Store]:
/// `INSERT DATA`, `INSERT INTO`, `DELETE DATA`, `DELETE WHERE` with a single pattern, graph
/// management, and `ASK` and `SELECT` over a single (triple or quad) pattern with filters and
/// solution modifiers. Other forms fail with [QueryError::UnsupportedQueryForm].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    factory: QueryFactory,
    default_graph: BTreeSet<Statement>,
    named_graphs: BTreeMap<NamedNode, BTreeSet<Statement>>,
}

impl MemoryStore {
    /// Creates an empty store that uses `factory` to decompose queries.
    pub fn new(factory: QueryFactory) -> Self {
        Self {
            factory,
            ..Self::default()
        }
    }

    /// Returns the number of statements in all graphs.
    pub fn len(&self) -> usize {
        self.default_graph.len() + self.named_graphs.values().map(BTreeSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether `graph` exists.
    pub fn contains_graph(&self, graph: &NamedNode) -> bool {
        self.named_graphs.contains_key(graph)
    }

    fn graph_mut(&mut self, graph: Option<&NamedNode>) -> &mut BTreeSet<Statement> {
        match graph {
            Some(graph) => self.named_graphs.entry(graph.clone()).or_default(),
            None => &mut self.default_graph,
        }
    }

    fn update(&mut self, query: &Query) -> Result<QueryResult, StoreError> {
        let parts = query.parts()?;
        let sub_type = parts.sub_type.ok_or_else(|| unsupported(query))?;
        match sub_type {
            UpdateSubType::InsertData | UpdateSubType::InsertInto => {
                let statements = statements_from_parts(parts)?;
                tracing::debug!(statements = statements.len(), "Inserting statements");
                for statement in statements {
                    let graph = statement_graph(&statement, query)?;
                    self.graph_mut(graph.as_ref()).insert(as_triple(statement));
                }
            }
            UpdateSubType::DeleteData => {
                for statement in statements_from_parts(parts)? {
                    let graph = statement_graph(&statement, query)?;
                    self.graph_mut(graph.as_ref()).remove(&as_triple(statement));
                }
            }
            UpdateSubType::DeleteWhere => {
                let pattern = single_pattern(parts, query)?;
                let matching = self.evaluate(&pattern, parts)?;
                tracing::debug!(statements = matching.len(), "Deleting statements");
                for (statement, _) in matching {
                    let graph = statement.graph_name().cloned();
                    self.graph_mut(graph.as_ref()).remove(&as_triple(statement));
                }
            }
            UpdateSubType::ClearGraph => {
                if let Some(statements) = self.named_graphs.get_mut(&graph_of(parts, query)?) {
                    statements.clear();
                }
            }
            UpdateSubType::CreateGraph | UpdateSubType::CreateSilentGraph => {
                let graph = graph_of(parts, query)?;
                if self.named_graphs.contains_key(&graph) {
                    if sub_type == UpdateSubType::CreateGraph {
                        return Err(StoreError::GraphAlreadyExists(graph.into_string()));
                    }
                } else {
                    self.named_graphs.insert(graph, BTreeSet::new());
                }
            }
            UpdateSubType::DropGraph | UpdateSubType::DropSilentGraph => {
                let graph = graph_of(parts, query)?;
                if self.named_graphs.remove(&graph).is_none()
                    && sub_type == UpdateSubType::DropGraph
                {
                    return Err(StoreError::GraphDoesNotExist(graph.into_string()));
                }
            }
            UpdateSubType::DeleteFromWhere
            | UpdateSubType::DeletePrologWhere
            | UpdateSubType::WithDeleteWhere
            | UpdateSubType::WithDeleteInsertWhere => return Err(unsupported(query)),
        }
        Ok(QueryResult::Empty)
    }

    fn select(&self, query: &Query) -> Result<QueryResult, StoreError> {
        let parts = query.parts()?;
        let pattern = single_pattern(parts, query)?;
        let mut solutions = self
            .evaluate(&pattern, parts)?
            .into_iter()
            .map(|(_, bindings)| bindings)
            .collect::<Vec<_>>();

        let modifiers = &parts.modifiers;
        if !modifiers.order_by.is_empty() {
            solutions.sort_by(|left, right| {
                modifiers
                    .order_by
                    .iter()
                    .map(|condition| {
                        let ordering = left
                            .get(&condition.variable)
                            .cmp(&right.get(&condition.variable));
                        match condition.direction {
                            OrderDirection::Ascending => ordering,
                            OrderDirection::Descending => ordering.reverse(),
                        }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let variables = parts.result_variables.clone();
        let mut rows = solutions
            .into_iter()
            .map(|bindings| {
                variables
                    .iter()
                    .map(|variable| bindings.get(variable).cloned())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        if modifiers.distinct || modifiers.reduced {
            let mut seen = BTreeSet::new();
            rows.retain(|row| seen.insert(row.clone()));
        }
        let offset = usize::try_from(modifiers.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = modifiers
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        let rows = rows.into_iter().skip(offset).take(limit).collect();

        Ok(QueryResult::Solutions(QuerySolutions::new(variables, rows)))
    }

    fn ask(&self, query: &Query) -> Result<QueryResult, StoreError> {
        let parts = query.parts()?;
        let pattern = single_pattern(parts, query)?;
        Ok(QueryResult::Boolean(!self.evaluate(&pattern, parts)?.is_empty()))
    }

    /// Returns the statements (with their graph) matching `pattern` and the filters of `parts`.
    fn evaluate(
        &self,
        pattern: &Statement,
        parts: &QueryParts,
    ) -> Result<Vec<(Statement, Bindings)>, StoreError> {
        let filters = parts
            .filter_pattern
            .iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = Vec::new();
        for (graph, statements) in self.candidate_graphs(pattern, parts)? {
            for statement in statements {
                let statement = statement.with_graph(graph.cloned().map(Term::from));
                let Some(bindings) = bind(pattern, &statement) else {
                    continue;
                };
                if filters.iter().all(|filter| filter.evaluate(&bindings)) {
                    result.push((statement, bindings));
                }
            }
        }
        Ok(result)
    }

    fn candidate_graphs<'a>(
        &'a self,
        pattern: &Statement,
        parts: &QueryParts,
    ) -> Result<Vec<(Option<&'a NamedNode>, &'a BTreeSet<Statement>)>, StoreError> {
        Ok(match &pattern.graph {
            Some(Term::NamedNode(graph)) => self
                .named_graphs
                .get_key_value(graph)
                .map(|(graph, statements)| (Some(graph), statements))
                .into_iter()
                .collect(),
            Some(_) => self
                .named_graphs
                .iter()
                .map(|(graph, statements)| (Some(graph), statements))
                .collect(),
            None if parts.graphs.is_empty() => vec![(None, &self.default_graph)],
            None => {
                let mut graphs = Vec::new();
                for graph in &parts.graphs {
                    let graph = NamedNode::new(graph)?;
                    if let Some((graph, statements)) = self.named_graphs.get_key_value(&graph) {
                        graphs.push((Some(graph), statements));
                    }
                }
                graphs
            }
        })
    }
}

impl Store for MemoryStore {
    fn query(&mut self, query: &str) -> Result<QueryResult, StoreError> {
        let query = self.factory.create(query)?;
        tracing::trace!(shape = %query.shape(), "Executing query in memory");
        match query.shape() {
            QueryShape::Ask => self.ask(&query),
            QueryShape::Select => self.select(&query),
            QueryShape::Update | QueryShape::Graph => self.update(&query),
            QueryShape::Describe => Err(unsupported(&query)),
        }
    }
}

fn unsupported(query: &Query) -> StoreError {
    QueryError::UnsupportedQueryForm(query.text().to_owned()).into()
}

fn graph_of(parts: &QueryParts, query: &Query) -> Result<NamedNode, StoreError> {
    let graph = parts.graphs.first().ok_or_else(|| unsupported(query))?;
    Ok(NamedNode::new(graph)?)
}

/// Returns the named graph of a statement derived from an update. Blank node graphs and
/// variables cannot be stored.
fn statement_graph(statement: &Statement, query: &Query) -> Result<Option<NamedNode>, StoreError> {
    match &statement.graph {
        None => Ok(None),
        Some(Term::NamedNode(graph)) => Ok(Some(graph.clone())),
        Some(_) => Err(unsupported(query)),
    }
}

fn as_triple(statement: Statement) -> Statement {
    Statement {
        graph: None,
        ..statement
    }
}

/// Returns the only pattern of the query. Patterns that need a join are not supported.
fn single_pattern(parts: &QueryParts, query: &Query) -> Result<Statement, StoreError> {
    match (parts.triple_pattern.as_slice(), parts.quad_pattern.as_slice()) {
        ([triple], []) => Ok(Statement::new_triple(
            triple.subject.to_term()?,
            triple.predicate.to_term()?,
            triple.object.to_term()?,
        )),
        ([], [quad]) => Ok(Statement::new_quad(
            quad.subject.to_term()?,
            quad.predicate.to_term()?,
            quad.object.to_term()?,
            quad.graph.to_term()?,
        )),
        _ => Err(unsupported(query)),
    }
}

/// Binds the variables of `pattern` to the components of `statement`.
///
/// Returns [None] if a concrete component differs or a variable would be bound to two different
/// terms.
fn bind(pattern: &Statement, statement: &Statement) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    let pairs = [
        (Some(&pattern.subject), Some(&statement.subject)),
        (Some(&pattern.predicate), Some(&statement.predicate)),
        (Some(&pattern.object), Some(&statement.object)),
        (pattern.graph.as_ref(), statement.graph.as_ref()),
    ];
    for pair in pairs {
        match pair {
            (None, _) => {}
            (Some(Term::Variable(variable)), Some(term)) => {
                let Some(name) = variable.name() else {
                    continue;
                };
                if bindings
                    .insert(name.to_owned(), term.clone())
                    .is_some_and(|previous| &previous != term)
                {
                    return None;
                }
            }
            (Some(expected), Some(term)) if expected == term => {}
            _ => return None,
        }
    }
    Some(bindings)
}

/// A filter with its operand converted into a term and its regular expression compiled.
enum Filter {
    Relational {
        variable: String,
        operator: FilterOperator,
        operand: Term,
    },
    Regex {
        variable: String,
        regex: Option<Regex>,
    },
}

impl TryFrom<&FilterPattern> for Filter {
    type Error = StoreError;

    fn try_from(filter: &FilterPattern) -> Result<Self, Self::Error> {
        Ok(match filter {
            FilterPattern::Relational {
                variable,
                operator,
                operand,
            } => Self::Relational {
                variable: variable.clone(),
                operator: *operator,
                operand: operand.to_term()?,
            },
            FilterPattern::Regex {
                variable,
                pattern,
                flags,
            } => Self::Regex {
                variable: variable.clone(),
                regex: compile_pattern(pattern, flags.as_deref()),
            },
        })
    }
}

impl Filter {
    /// Evaluates the filter. Errors (unbound variables, invalid patterns, incomparable terms)
    /// evaluate to `false`.
    fn evaluate(&self, bindings: &Bindings) -> bool {
        match self {
            Self::Relational {
                variable,
                operator,
                operand,
            } => {
                let Some(value) = bindings.get(variable) else {
                    return false;
                };
                match operator {
                    FilterOperator::Equal => value == operand,
                    FilterOperator::NotEqual => value != operand,
                    FilterOperator::Less => compare(value, operand).is_some_and(Ordering::is_lt),
                    FilterOperator::Greater => {
                        compare(value, operand).is_some_and(Ordering::is_gt)
                    }
                    FilterOperator::LessOrEqual => {
                        compare(value, operand).is_some_and(Ordering::is_le)
                    }
                    FilterOperator::GreaterOrEqual => {
                        compare(value, operand).is_some_and(Ordering::is_ge)
                    }
                }
            }
            Self::Regex { variable, regex } => {
                match (regex, bindings.get(variable).and_then(lexical_form)) {
                    (Some(regex), Some(text)) => regex.is_match(&text),
                    _ => false,
                }
            }
        }
    }
}

/// Compares two literals numerically if both values are numbers and lexically otherwise.
fn compare(left: &Term, right: &Term) -> Option<Ordering> {
    let (Term::Literal(left), Term::Literal(right)) = (left, right) else {
        return None;
    };
    match (left.value().parse::<f64>(), right.value().parse::<f64>()) {
        (Ok(left), Ok(right)) => left.partial_cmp(&right),
        _ => Some(left.value().cmp(right.value())),
    }
}

fn lexical_form(term: &Term) -> Option<Cow<'_, str>> {
    match term {
        Term::NamedNode(node) => Some(Cow::Borrowed(node.as_str())),
        Term::Literal(literal) => Some(Cow::Borrowed(literal.value())),
        Term::BlankNode(_) | Term::Variable(_) => None,
    }
}

fn compile_pattern(pattern: &str, flags: Option<&str>) -> Option<Regex> {
    let mut pattern = Cow::Borrowed(pattern);
    let flags = flags.unwrap_or_default();
    if flags.contains('q') {
        pattern = regex::escape(&pattern).into();
    }
    let mut regex_builder = RegexBuilder::new(&pattern);
    regex_builder.size_limit(REGEX_SIZE_LIMIT);
    for flag in flags.chars() {
        match flag {
            's' => {
                regex_builder.dot_matches_new_line(true);
            }
            'm' => {
                regex_builder.multi_line(true);
            }
            'i' => {
                regex_builder.case_insensitive(true);
            }
            'x' => {
                regex_builder.ignore_whitespace(true);
            }
            'q' => (),
            _ => return None,
        }
    }
    regex_builder.build().ok()
}
