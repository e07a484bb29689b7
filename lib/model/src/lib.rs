mod error;
mod namespaces;
mod rdf;
pub mod vocab;

pub use error::*;
pub use namespaces::Namespaces;
pub use rdf::*;
