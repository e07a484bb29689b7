mod blank_node;
mod literal;
mod named_node;
mod parser;
mod statement;
mod term;
mod variable;

pub use blank_node::BlankNode;
pub use literal::{escape_string, Literal};
pub use named_node::{is_valid_iri, NamedNode};
pub use parser::{TermRecord, TermRecordKind, TripleRecord};
pub use statement::Statement;
pub use term::Term;
pub use variable::Variable;
